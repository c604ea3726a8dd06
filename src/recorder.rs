//! Best-effort hand-off of completed matches to an external log.
//!
//! Commands never wait on the log: records go through an unbounded channel to a
//! worker thread, and a failing write is logged there and dropped.

use crate::models::{
    GameMatch, MatchId, ParticipantId, Roster, Side, TournamentConfig, TournamentFormat,
    TournamentId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// What the external log receives for every completed match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CompletedMatchRecord {
    pub tournament_id: TournamentId,
    pub match_id: MatchId,
    pub round: u32,
    pub court: u32,
    pub side_a_players: Vec<ParticipantId>,
    pub side_a_score: u32,
    pub side_b_players: Vec<ParticipantId>,
    pub side_b_score: u32,
    /// `None` on a tie; passed through unresolved.
    pub winner: Option<Side>,
    pub completed_at: DateTime<Utc>,
}

impl CompletedMatchRecord {
    pub fn new(tournament_id: TournamentId, game: &GameMatch, completed_at: DateTime<Utc>) -> Self {
        Self {
            tournament_id,
            match_id: game.id,
            round: game.round,
            court: game.court,
            side_a_players: game.side_a.players.to_vec(),
            side_a_score: game.side_a.score,
            side_b_players: game.side_b.players.to_vec(),
            side_b_score: game.side_b.score,
            winner: game.winner(),
            completed_at,
        }
    }

    /// Winning side's players joined with " & ", or "Tie".
    pub fn winner_display(&self) -> String {
        match self.winner {
            Some(Side::A) => self.side_a_players.join(" & "),
            Some(Side::B) => self.side_b_players.join(" & "),
            None => "Tie".to_string(),
        }
    }
}

/// Tournament info written once, when the tournament is created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub tournament_id: TournamentId,
    pub name: String,
    pub format: TournamentFormat,
    pub participant_count: usize,
    pub court_count: u32,
    pub target_points: u32,
    pub created_at: DateTime<Utc>,
    /// One entry per player, or "Label: A & B" per team.
    pub roster: Vec<String>,
}

impl TournamentRecord {
    pub fn new(tournament_id: TournamentId, config: &TournamentConfig, created_at: DateTime<Utc>) -> Self {
        let roster = match &config.roster {
            Roster::Individuals(players) => players.clone(),
            Roster::Teams(teams) => teams
                .iter()
                .map(|t| format!("{}: {}", t.label, t.display_players()))
                .collect(),
        };
        Self {
            tournament_id,
            name: config.name.clone(),
            format: config.format(),
            participant_count: config.participants().len(),
            court_count: config.court_count,
            target_points: config.target_points,
            created_at,
            roster,
        }
    }
}

/// Errors writing to the external log. Only ever seen by the recorder worker.
#[derive(Debug)]
pub enum RecordError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::Io(e) => write!(f, "I/O error: {}", e),
            RecordError::Csv(e) => write!(f, "CSV error: {}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<std::io::Error> for RecordError {
    fn from(e: std::io::Error) -> Self {
        RecordError::Io(e)
    }
}

impl From<csv::Error> for RecordError {
    fn from(e: csv::Error) -> Self {
        RecordError::Csv(e)
    }
}

/// Destination for tournament and match records.
pub trait MatchLog: Send + 'static {
    fn record_tournament(&mut self, record: &TournamentRecord) -> Result<(), RecordError>;
    fn record_match(&mut self, record: &CompletedMatchRecord) -> Result<(), RecordError>;
}

const TOURNAMENT_HEADER: [&str; 8] = [
    "Tournament ID",
    "Tournament Name",
    "Tournament Type",
    "Number of Players",
    "Courts",
    "Points to Play",
    "Created At",
    "Roster",
];

const MATCH_HEADER: [&str; 10] = [
    "Tournament ID",
    "Match ID",
    "Round",
    "Court",
    "Team 1 Players",
    "Team 1 Score",
    "Team 2 Players",
    "Team 2 Score",
    "Winner",
    "Timestamp",
];

/// Appends to `tournament_info.csv` and `match_history.csv` in one directory.
#[derive(Clone, Debug)]
pub struct CsvMatchLog {
    dir: PathBuf,
}

impl CsvMatchLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn tournament_path(&self) -> PathBuf {
        self.dir.join("tournament_info.csv")
    }

    pub fn history_path(&self) -> PathBuf {
        self.dir.join("match_history.csv")
    }
}

impl MatchLog for CsvMatchLog {
    fn record_tournament(&mut self, record: &TournamentRecord) -> Result<(), RecordError> {
        let row = vec![
            record.tournament_id.to_string(),
            record.name.clone(),
            record.format.to_string(),
            record.participant_count.to_string(),
            record.court_count.to_string(),
            record.target_points.to_string(),
            record.created_at.to_rfc3339(),
            record.roster.join("; "),
        ];
        append_row(&self.tournament_path(), &TOURNAMENT_HEADER, &row)
    }

    fn record_match(&mut self, record: &CompletedMatchRecord) -> Result<(), RecordError> {
        let row = vec![
            record.tournament_id.to_string(),
            record.match_id.to_string(),
            record.round.to_string(),
            record.court.to_string(),
            record.side_a_players.join(" & "),
            record.side_a_score.to_string(),
            record.side_b_players.join(" & "),
            record.side_b_score.to_string(),
            record.winner_display(),
            record.completed_at.to_rfc3339(),
        ];
        append_row(&self.history_path(), &MATCH_HEADER, &row)
    }
}

/// Append one row, writing the header first when the file is new or empty.
fn append_row(path: &Path, header: &[&str], row: &[String]) -> Result<(), RecordError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let is_new = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    if is_new {
        writer.write_record(header)?;
    }
    writer.write_record(row)?;
    writer.flush()?;
    log::debug!("Appended row to {:?}", path);
    Ok(())
}

/// Message queued for the recorder worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecorderMessage {
    Tournament(TournamentRecord),
    Match(CompletedMatchRecord),
}

/// Cheap, cloneable handle; sending never blocks.
#[derive(Clone, Debug)]
pub struct MatchRecorder {
    tx: mpsc::UnboundedSender<RecorderMessage>,
}

impl MatchRecorder {
    /// Handle plus the receiving end, for callers that consume records themselves.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RecorderMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Start a worker thread that writes every record to `log`.
    pub fn spawn<L: MatchLog>(log: L) -> std::io::Result<Self> {
        let (recorder, rx) = Self::channel();
        std::thread::Builder::new()
            .name("match-recorder".into())
            .spawn(move || run_worker(log, rx))?;
        Ok(recorder)
    }

    pub fn record_tournament(&self, record: TournamentRecord) {
        self.dispatch(RecorderMessage::Tournament(record));
    }

    pub fn record_match(&self, record: CompletedMatchRecord) {
        self.dispatch(RecorderMessage::Match(record));
    }

    fn dispatch(&self, message: RecorderMessage) {
        if self.tx.send(message).is_err() {
            log::warn!("Match recorder has stopped; record dropped");
        }
    }
}

fn run_worker<L: MatchLog>(mut log: L, mut rx: mpsc::UnboundedReceiver<RecorderMessage>) {
    while let Some(message) = rx.blocking_recv() {
        let result = match &message {
            RecorderMessage::Tournament(r) => log.record_tournament(r),
            RecorderMessage::Match(r) => log.record_match(r),
        };
        if let Err(e) = result {
            log::error!("Failed to write {:?} to match log: {}", message_kind(&message), e);
        }
    }
    log::debug!("Match recorder stopped");
}

fn message_kind(message: &RecorderMessage) -> String {
    match message {
        RecorderMessage::Tournament(r) => format!("tournament {}", r.tournament_id),
        RecorderMessage::Match(r) => format!("match {}", r.match_id),
    }
}
