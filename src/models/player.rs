//! Participant and Team data structures.

use serde::{Deserialize, Serialize};

/// Unique identifier for a participant: the trimmed display name.
pub type ParticipantId = String;

/// A fixed pair of participants (fixed-partner mode only).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub label: String,
    /// Display color tag chosen at setup (e.g. "#1d4ed8").
    #[serde(default)]
    pub color: Option<String>,
    pub players: [ParticipantId; 2],
}

impl Team {
    pub fn new(label: impl Into<String>, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            players: [first.into(), second.into()],
        }
    }

    /// Same team with a color tag.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn has_member(&self, id: &str) -> bool {
        self.players.iter().any(|p| p == id)
    }

    /// Players joined the way the match log prints them ("A & B").
    pub fn display_players(&self) -> String {
        self.players.join(" & ")
    }
}
