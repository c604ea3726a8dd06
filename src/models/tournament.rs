//! Tournament: the single mutable state of one tournament night.

use crate::events::{TournamentEvent, EVENT_CAPACITY};
use crate::logic::FairnessTracker;
use crate::models::config::{TournamentConfig, TournamentFormat};
use crate::models::game::{GameMatch, MatchId};
use crate::models::history::HistoryLog;
use crate::models::player::ParticipantId;
use crate::recorder::{MatchRecorder, TournamentRecord};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Entered score is outside `0..=target_points`.
    Validation { value: i64, target_points: u32 },
    /// Setup input rejected (empty or duplicate names, zero courts, ...).
    InvalidRoster(String),
    /// Not enough participants to fill a single court.
    InsufficientParticipants { available: usize, required: usize },
    /// Not enough teams to fill a single court.
    InsufficientTeams { available: usize, required: usize },
    /// No active match with this id (never existed, abandoned, or already completed).
    UnknownMatch(MatchId),
    /// The command does not apply to the tournament's current round state.
    InvalidState(&'static str),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::Validation { value, target_points } => {
                write!(f, "Score {} must be between 0 and {}", value, target_points)
            }
            TournamentError::InvalidRoster(msg) => write!(f, "{}", msg),
            TournamentError::InsufficientParticipants { available, required } => write!(
                f,
                "Need at least {} players to fill a court ({} available)",
                required, available
            ),
            TournamentError::InsufficientTeams { available, required } => write!(
                f,
                "Need at least {} teams to fill a court ({} available)",
                required, available
            ),
            TournamentError::UnknownMatch(id) => write!(f, "No active match with id {}", id),
            TournamentError::InvalidState(msg) => write!(f, "Invalid state for this action: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Full tournament state. Every command takes `&mut self`, so one tournament is
/// only ever changed by one command at a time.
#[derive(Debug)]
pub struct Tournament {
    pub id: TournamentId,
    pub created_at: DateTime<Utc>,
    pub(crate) config: TournamentConfig,
    pub(crate) fairness: FairnessTracker,
    /// 0 until started.
    pub(crate) round: u32,
    /// Active matches of the current round.
    pub(crate) matches: Vec<GameMatch>,
    pub(crate) history: HistoryLog,
    pub(crate) rng: StdRng,
    pub(crate) recorder: Option<MatchRecorder>,
    pub(crate) events: broadcast::Sender<TournamentEvent>,
}

impl Tournament {
    /// New tournament with OS-seeded randomness. Not started: call `start_tournament`.
    pub fn new(config: TournamentConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible pairings for a fixed seed.
    pub fn with_seed(config: TournamentConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: TournamentConfig, rng: StdRng) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            config,
            fairness: FairnessTracker::new(),
            round: 0,
            matches: Vec::new(),
            history: HistoryLog::new(),
            rng,
            recorder: None,
            events,
        }
    }

    /// Send records to `recorder` from now on, starting with the tournament info.
    pub fn attach_recorder(&mut self, recorder: MatchRecorder) {
        recorder.record_tournament(TournamentRecord::new(self.id, &self.config, self.created_at));
        self.recorder = Some(recorder);
    }

    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_started(&self) -> bool {
        self.round > 0
    }

    /// Active matches of the current round, in court order.
    pub fn matches(&self) -> &[GameMatch] {
        &self.matches
    }

    pub fn active_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn fairness(&self) -> &FairnessTracker {
        &self.fairness
    }

    /// Participants neither on court nor already done with the current round.
    pub fn sitting_out(&self) -> Vec<ParticipantId> {
        if !self.is_started() {
            return Vec::new();
        }
        self.config
            .participants()
            .into_iter()
            .filter(|p| {
                !self.matches.iter().any(|m| m.involves(p)) && !self.fairness.played_in(p, self.round)
            })
            .collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TournamentEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> TournamentSnapshot {
        TournamentSnapshot {
            id: self.id,
            name: self.config.name.clone(),
            format: self.config.format(),
            court_count: self.config.court_count,
            target_points: self.config.target_points,
            round: self.round,
            matches: self.matches.clone(),
            sitting_out: self.sitting_out(),
            history: self.history.iter().cloned().collect(),
        }
    }

    pub(crate) fn active_index(&self, id: MatchId) -> Result<usize, TournamentError> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(TournamentError::UnknownMatch(id))
    }

    pub(crate) fn active_match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, TournamentError> {
        let idx = self.active_index(id)?;
        Ok(&mut self.matches[idx])
    }

    /// No subscribers is not an error.
    pub(crate) fn publish(&self, event: TournamentEvent) {
        let _ = self.events.send(event);
    }
}

/// Serializable view of a tournament for API responses and subscribers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub court_count: u32,
    pub target_points: u32,
    pub round: u32,
    pub matches: Vec<GameMatch>,
    pub sitting_out: Vec<ParticipantId>,
    /// Newest first.
    pub history: Vec<GameMatch>,
}
