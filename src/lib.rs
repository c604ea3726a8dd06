//! Court rotation tournament engine: models, scheduling and scoring logic, match recorder.

pub mod events;
pub mod logic;
pub mod models;
pub mod recorder;
pub mod settings;

pub use events::TournamentEvent;
pub use logic::{
    complete_match, complete_round, decrement_score, increment_score, reroll_round, set_score,
    start_tournament, FairnessTracker,
};
pub use models::{
    GameMatch, HistoryLog, MatchId, MatchSide, MatchStatus, ParticipantId, Roster, RosterInput,
    Side, Team, Tournament, TournamentConfig, TournamentError, TournamentFormat, TournamentId,
    TournamentSnapshot,
};
pub use recorder::{CompletedMatchRecord, CsvMatchLog, MatchLog, MatchRecorder, TournamentRecord};
pub use settings::Settings;
