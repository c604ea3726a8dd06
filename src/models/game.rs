//! Match (game), Side, and the per-side state for 2v2 court matches.

use crate::models::player::{ParticipantId, Team};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Lifecycle of a match. `Completed` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Active,
    Completed,
}

/// Two participants sharing one side of the court, plus their running score.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSide {
    pub players: [ParticipantId; 2],
    /// Team label in fixed-partner mode.
    pub label: Option<String>,
    pub color: Option<String>,
    pub score: u32,
}

impl MatchSide {
    pub fn pair(first: ParticipantId, second: ParticipantId) -> Self {
        Self {
            players: [first, second],
            label: None,
            color: None,
            score: 0,
        }
    }

    pub fn from_team(team: &Team) -> Self {
        Self {
            players: team.players.clone(),
            label: Some(team.label.clone()),
            color: team.color.clone(),
            score: 0,
        }
    }

    pub fn display_players(&self) -> String {
        self.players.join(" & ")
    }
}

/// A single court assignment for one round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    /// 1-based court number.
    pub court: u32,
    pub round: u32,
    pub side_a: MatchSide,
    pub side_b: MatchSide,
    pub status: MatchStatus,
    /// Set when the match moves to `Completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    pub fn new(id: MatchId, court: u32, round: u32, side_a: MatchSide, side_b: MatchSide) -> Self {
        Self {
            id,
            court,
            round,
            side_a,
            side_b,
            status: MatchStatus::Active,
            completed_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == MatchStatus::Active
    }

    pub fn side(&self, side: Side) -> &MatchSide {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut MatchSide {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    /// All four participants, side A first.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> {
        self.side_a.players.iter().chain(self.side_b.players.iter())
    }

    pub fn involves(&self, id: &str) -> bool {
        self.participants().any(|p| p == id)
    }

    /// Side with the higher score; `None` on a tie.
    pub fn winner(&self) -> Option<Side> {
        use std::cmp::Ordering::*;
        match self.side_a.score.cmp(&self.side_b.score) {
            Greater => Some(Side::A),
            Less => Some(Side::B),
            Equal => None,
        }
    }

    /// Mark completed and stamp the completion time.
    pub(crate) fn complete(&mut self, at: DateTime<Utc>) {
        self.status = MatchStatus::Completed;
        self.completed_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameMatch {
        GameMatch::new(
            Uuid::new_v4(),
            1,
            1,
            MatchSide::pair("Ana".into(), "Ben".into()),
            MatchSide::pair("Cid".into(), "Dee".into()),
        )
    }

    #[test]
    fn winner_follows_higher_score_and_ties_pass_through() {
        let mut m = sample();
        assert_eq!(m.winner(), None);
        m.side_b.score = 9;
        m.side_a.score = 7;
        assert_eq!(m.winner(), Some(Side::B));
        m.side_a.score = 9;
        assert_eq!(m.winner(), None);
    }

    #[test]
    fn participants_lists_side_a_then_side_b() {
        let m = sample();
        let names: Vec<_> = m.participants().cloned().collect();
        assert_eq!(names, vec!["Ana", "Ben", "Cid", "Dee"]);
        assert!(m.involves("Dee"));
        assert!(!m.involves("Eve"));
    }
}
