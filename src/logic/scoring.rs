//! Score entry and match completion for active matches.

use crate::events::TournamentEvent;
use crate::models::{GameMatch, MatchId, Side, Tournament, TournamentError};
use crate::recorder::CompletedMatchRecord;
use chrono::{DateTime, Utc};

/// Add one point to `side`.
pub fn increment_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    side: Side,
) -> Result<(), TournamentError> {
    let game = tournament.active_match_mut(match_id)?;
    let score = &mut game.side_mut(side).score;
    *score = score.saturating_add(1);
    score_changed(tournament, match_id);
    Ok(())
}

/// Take one point from `side`; never goes below zero.
pub fn decrement_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    side: Side,
) -> Result<(), TournamentError> {
    let game = tournament.active_match_mut(match_id)?;
    let score = &mut game.side_mut(side).score;
    if *score == 0 {
        return Ok(());
    }
    *score -= 1;
    score_changed(tournament, match_id);
    Ok(())
}

/// Set `side` to `value` and the other side to `target_points - value`.
///
/// Rejects values outside `0..=target_points` without touching the match.
pub fn set_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    side: Side,
    value: i64,
) -> Result<(), TournamentError> {
    let target_points = tournament.config.target_points;
    let idx = tournament.active_index(match_id)?;
    let entered = u32::try_from(value)
        .ok()
        .filter(|v| *v <= target_points)
        .ok_or(TournamentError::Validation { value, target_points })?;

    let game = &mut tournament.matches[idx];
    game.side_mut(side).score = entered;
    game.side_mut(side.opposite()).score = target_points - entered;
    score_changed(tournament, match_id);
    Ok(())
}

/// Complete one active match: it moves to the history log, its four participants
/// are marked as having played its round, and a record goes to the match recorder.
pub fn complete_match(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<CompletedMatchRecord, TournamentError> {
    let idx = tournament.active_index(match_id)?;
    let game = tournament.matches.remove(idx);
    let record = finish_match(tournament, game, Utc::now());
    log::info!(
        "Match {} (round {}, court {}) completed {}-{}",
        record.match_id,
        record.round,
        record.court,
        record.side_a_score,
        record.side_b_score
    );
    Ok(record)
}

/// Shared by single completion and round completion. `game` must already be out of
/// the active set.
pub(crate) fn finish_match(
    tournament: &mut Tournament,
    mut game: GameMatch,
    at: DateTime<Utc>,
) -> CompletedMatchRecord {
    game.complete(at);
    tournament
        .fairness
        .record_round_played(game.participants(), game.round);
    let record = CompletedMatchRecord::new(tournament.id, &game, at);
    let event = TournamentEvent::MatchCompleted {
        match_id: game.id,
        round: game.round,
    };
    tournament.history.record(game);
    if let Some(recorder) = &tournament.recorder {
        recorder.record_match(record.clone());
    }
    tournament.publish(event);
    record
}

fn score_changed(tournament: &Tournament, match_id: MatchId) {
    if let Some(game) = tournament.active_match(match_id) {
        log::debug!(
            "Match {} score {}-{}",
            match_id,
            game.side_a.score,
            game.side_b.score
        );
        tournament.publish(TournamentEvent::ScoreChanged {
            match_id,
            side_a: game.side_a.score,
            side_b: game.side_b.score,
        });
    }
}
