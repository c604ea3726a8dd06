//! Change notifications for a subscribing presentation layer.

use crate::models::MatchId;
use serde::{Deserialize, Serialize};

/// Buffered events per subscriber before the slowest one starts lagging.
pub const EVENT_CAPACITY: usize = 64;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TournamentEvent {
    RoundStarted { round: u32, match_ids: Vec<MatchId> },
    RoundRerolled { round: u32, match_ids: Vec<MatchId> },
    ScoreChanged { match_id: MatchId, side_a: u32, side_b: u32 },
    MatchCompleted { match_id: MatchId, round: u32 },
    RoundCompleted { round: u32 },
}
