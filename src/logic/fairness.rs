//! Fairness tracking: who played in which round, and who has been waiting.

use crate::models::{ParticipantId, Team};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Last round each participant played. Absent means never played.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct FairnessTracker {
    last_played: HashMap<ParticipantId, u32>,
}

impl FairnessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark each participant as having played `round`. Repeating the call is a no-op.
    pub fn record_round_played<'a, I>(&mut self, participants: I, round: u32)
    where
        I: IntoIterator<Item = &'a ParticipantId>,
    {
        for p in participants {
            self.last_played.insert(p.clone(), round);
        }
    }

    pub fn last_played(&self, participant: &str) -> Option<u32> {
        self.last_played.get(participant).copied()
    }

    /// True when the participant did not play the round before `round`.
    pub fn is_idle(&self, participant: &str, round: u32) -> bool {
        match self.last_played(participant) {
            Some(last) => round == 0 || last != round - 1,
            None => true,
        }
    }

    /// True when the participant already finished a match of `round`.
    pub fn played_in(&self, participant: &str, round: u32) -> bool {
        self.last_played(participant) == Some(round)
    }

    /// Split `all` into (idle, recent) for `round`, keeping roster order in each half.
    pub fn idle_partition(
        &self,
        round: u32,
        all: &[ParticipantId],
    ) -> (Vec<ParticipantId>, Vec<ParticipantId>) {
        all.iter()
            .cloned()
            .partition(|p| self.is_idle(p, round))
    }

    /// How many of the team's two members are idle for `round`.
    pub fn idle_count(&self, team: &Team, round: u32) -> usize {
        team.players.iter().filter(|p| self.is_idle(p, round)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<ParticipantId> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn never_played_counts_as_idle() {
        let tracker = FairnessTracker::new();
        let all = names(&["Ana", "Ben", "Cid"]);
        let (idle, recent) = tracker.idle_partition(1, &all);
        assert_eq!(idle, all);
        assert!(recent.is_empty());
    }

    #[test]
    fn partition_is_stable_not_sorted_by_recency() {
        let mut tracker = FairnessTracker::new();
        let all = names(&["Ana", "Ben", "Cid", "Dee", "Eve"]);
        tracker.record_round_played(&names(&["Ben", "Dee"]), 3);
        tracker.record_round_played(&names(&["Eve"]), 1);
        tracker.record_round_played(&names(&["Ana"]), 2);

        let (idle, recent) = tracker.idle_partition(4, &all);
        assert_eq!(idle, names(&["Ana", "Cid", "Eve"]));
        assert_eq!(recent, names(&["Ben", "Dee"]));
    }

    #[test]
    fn recording_twice_is_idempotent() {
        let mut tracker = FairnessTracker::new();
        let ana = names(&["Ana"]);
        tracker.record_round_played(&ana, 2);
        let before = tracker.clone();
        tracker.record_round_played(&ana, 2);
        assert_eq!(tracker, before);
        assert!(tracker.played_in("Ana", 2));
        assert!(!tracker.is_idle("Ana", 3));
    }

    #[test]
    fn idle_count_per_team() {
        let mut tracker = FairnessTracker::new();
        tracker.record_round_played(&names(&["Ana"]), 1);
        let team = Team::new("Red", "Ana", "Ben");
        assert_eq!(tracker.idle_count(&team, 2), 1);
        assert_eq!(tracker.idle_count(&team, 3), 2);
    }
}
