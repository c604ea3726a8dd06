//! Append-only log of completed matches, newest first.

use crate::models::game::{GameMatch, MatchId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: VecDeque<GameMatch>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a completed match. Only the round controller calls this.
    pub(crate) fn record(&mut self, game: GameMatch) {
        debug_assert!(!game.is_active());
        self.entries.push_front(game);
    }

    /// Completed matches, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &GameMatch> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&GameMatch> {
        self.entries.front()
    }

    pub fn get(&self, id: MatchId) -> Option<&GameMatch> {
        self.entries.iter().find(|m| m.id == id)
    }

    /// Completed matches belonging to `round`, newest first.
    pub fn for_round(&self, round: u32) -> impl Iterator<Item = &GameMatch> {
        self.entries.iter().filter(move |m| m.round == round)
    }
}
