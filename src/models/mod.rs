//! Data structures for a court rotation tournament: roster, matches, history, tournament state.

mod config;
mod game;
mod history;
mod player;
mod tournament;

pub use config::{Roster, RosterInput, TournamentConfig, TournamentFormat};
pub use game::{GameMatch, MatchId, MatchSide, MatchStatus, Side};
pub use history::HistoryLog;
pub use player::{ParticipantId, Team};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentSnapshot};
