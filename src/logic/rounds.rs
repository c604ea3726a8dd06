//! Round lifecycle: start, re-roll, and complete-and-advance.

use crate::events::TournamentEvent;
use crate::logic::scheduler::{all_courts, schedule_round};
use crate::logic::scoring::finish_match;
use crate::models::{Tournament, TournamentError};
use crate::recorder::CompletedMatchRecord;
use chrono::Utc;

/// Start the tournament: schedule round 1.
///
/// Fails fast with `InsufficientParticipants` / `InsufficientTeams` when not even one
/// court can be filled; the tournament then stays unstarted.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.is_started() {
        return Err(TournamentError::InvalidState("tournament already started"));
    }
    let courts = all_courts(tournament.config.court_count);
    let matches = schedule_round(
        &tournament.config,
        &tournament.fairness,
        1,
        &courts,
        &mut tournament.rng,
    )?;
    tournament.round = 1;
    tournament.matches = matches;
    log::info!(
        "Tournament \"{}\" started: round 1 with {} match(es)",
        tournament.config.name,
        tournament.matches.len()
    );
    publish_round(tournament, false);
    Ok(())
}

/// Throw away the current round's active matches and draw new ones.
///
/// Abandoned matches never reach the history log and leave fairness untouched.
/// Courts whose match was already completed this round stay closed, and their
/// players are not drawn again.
pub fn reroll_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !tournament.is_started() {
        return Err(TournamentError::InvalidState("tournament not started"));
    }
    let round = tournament.round;
    let used: Vec<u32> = tournament.history.for_round(round).map(|m| m.court).collect();
    let open: Vec<u32> = all_courts(tournament.config.court_count)
        .into_iter()
        .filter(|c| !used.contains(c))
        .collect();
    if open.is_empty() {
        return Err(TournamentError::InvalidState("every court of this round is completed"));
    }

    let matches = schedule_round(
        &tournament.config,
        &tournament.fairness,
        round,
        &open,
        &mut tournament.rng,
    )?;
    let abandoned = std::mem::replace(&mut tournament.matches, matches);
    log::info!(
        "Round {} re-rolled: {} match(es) abandoned, {} drawn",
        round,
        abandoned.len(),
        tournament.matches.len()
    );
    publish_round(tournament, true);
    Ok(())
}

/// Complete every active match of the current round, advance the round counter, and
/// schedule the next round.
///
/// The next round is scheduled against fairness that already includes every match of
/// the finished round. If scheduling fails nothing is committed.
pub fn complete_round(
    tournament: &mut Tournament,
) -> Result<Vec<CompletedMatchRecord>, TournamentError> {
    if !tournament.is_started() {
        return Err(TournamentError::InvalidState("tournament not started"));
    }
    let round = tournament.round;
    let next_round = round + 1;

    let mut next_fairness = tournament.fairness.clone();
    for game in &tournament.matches {
        next_fairness.record_round_played(game.participants(), game.round);
    }
    let courts = all_courts(tournament.config.court_count);
    let next_matches = schedule_round(
        &tournament.config,
        &next_fairness,
        next_round,
        &courts,
        &mut tournament.rng,
    )?;

    let at = Utc::now();
    let finished: Vec<_> = tournament.matches.drain(..).collect();
    let records: Vec<CompletedMatchRecord> = finished
        .into_iter()
        .map(|game| finish_match(tournament, game, at))
        .collect();
    debug_assert_eq!(tournament.fairness, next_fairness);

    tournament.round = next_round;
    tournament.matches = next_matches;
    log::info!(
        "Round {} completed ({} match(es) closed); round {} has {} match(es)",
        round,
        records.len(),
        next_round,
        tournament.matches.len()
    );
    tournament.publish(TournamentEvent::RoundCompleted { round });
    publish_round(tournament, false);
    Ok(records)
}

fn publish_round(tournament: &Tournament, rerolled: bool) {
    let round = tournament.round;
    let match_ids = tournament.matches.iter().map(|m| m.id).collect();
    let event = if rerolled {
        TournamentEvent::RoundRerolled { round, match_ids }
    } else {
        TournamentEvent::RoundStarted { round, match_ids }
    };
    tournament.publish(event);
}
