//! Tournament business logic: fairness, scheduling, scoring, round lifecycle.

mod fairness;
mod rounds;
mod scheduler;
mod scoring;

pub use fairness::FairnessTracker;
pub use rounds::{complete_round, reroll_round, start_tournament};
pub use scheduler::{
    all_courts, schedule_individuals, schedule_round, schedule_teams, PLAYERS_PER_COURT,
    TEAMS_PER_COURT,
};
pub use scoring::{complete_match, decrement_score, increment_score, set_score};
