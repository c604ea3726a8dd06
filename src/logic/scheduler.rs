//! Round generation: fill courts with the participants (or teams) who have waited longest.

use crate::logic::fairness::FairnessTracker;
use crate::models::{
    GameMatch, MatchId, MatchSide, ParticipantId, Roster, Team, TournamentConfig,
    TournamentError,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cmp::Reverse;

/// Individuals needed to fill one court (2v2).
pub const PLAYERS_PER_COURT: usize = 4;
/// Fixed teams needed to fill one court.
pub const TEAMS_PER_COURT: usize = 2;

/// Generate the matches of `round` on the given court numbers.
///
/// Participants who already finished a match of `round` are not drawn again, so the
/// same call serves a fresh round and a re-roll of a partly played one.
pub fn schedule_round<R: Rng + ?Sized>(
    config: &TournamentConfig,
    fairness: &FairnessTracker,
    round: u32,
    courts: &[u32],
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    match &config.roster {
        Roster::Individuals(players) => schedule_individuals(players, fairness, round, courts, rng),
        Roster::Teams(teams) => schedule_teams(teams, fairness, round, courts, rng),
    }
}

/// Americano rotation.
///
/// 1. Priority list = idle participants, then those who played last round (roster order in each).
/// 2. Each court takes the next 4; a short remainder sits out.
/// 3. The 4 are shuffled: first two form side A, last two side B.
pub fn schedule_individuals<R: Rng + ?Sized>(
    players: &[ParticipantId],
    fairness: &FairnessTracker,
    round: u32,
    courts: &[u32],
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    let eligible: Vec<ParticipantId> = players
        .iter()
        .filter(|p| !fairness.played_in(p, round))
        .cloned()
        .collect();
    let (idle, recent) = fairness.idle_partition(round, &eligible);
    let candidates: Vec<ParticipantId> = idle.into_iter().chain(recent).collect();

    let mut matches = Vec::new();
    for (chunk, &court) in candidates.chunks_exact(PLAYERS_PER_COURT).zip(courts) {
        let mut four = chunk.to_vec();
        four.shuffle(rng);
        matches.push(GameMatch::new(
            match_id(rng),
            court,
            round,
            MatchSide::pair(four[0].clone(), four[1].clone()),
            MatchSide::pair(four[2].clone(), four[3].clone()),
        ));
    }

    if matches.is_empty() {
        return Err(TournamentError::InsufficientParticipants {
            available: candidates.len(),
            required: PLAYERS_PER_COURT,
        });
    }

    let seated = matches.len() * PLAYERS_PER_COURT;
    if seated < candidates.len() {
        log::debug!(
            "Round {}: {} participant(s) sit out: {:?}",
            round,
            candidates.len() - seated,
            &candidates[seated..]
        );
    }
    Ok(matches)
}

/// Fixed-partner rotation: teams with more idle members go first, roster order breaks ties.
pub fn schedule_teams<R: Rng + ?Sized>(
    teams: &[Team],
    fairness: &FairnessTracker,
    round: u32,
    courts: &[u32],
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    let mut ranked: Vec<(&Team, usize)> = teams
        .iter()
        .filter(|t| !t.players.iter().any(|p| fairness.played_in(p, round)))
        .map(|t| (t, fairness.idle_count(t, round)))
        .collect();
    // sort_by_key is stable, so equal idle counts keep roster order
    ranked.sort_by_key(|&(_, idle)| Reverse(idle));

    let matches: Vec<GameMatch> = ranked
        .chunks_exact(TEAMS_PER_COURT)
        .zip(courts)
        .map(|(pair, &court)| {
            GameMatch::new(
                match_id(rng),
                court,
                round,
                MatchSide::from_team(pair[0].0),
                MatchSide::from_team(pair[1].0),
            )
        })
        .collect();

    if matches.is_empty() {
        return Err(TournamentError::InsufficientTeams {
            available: ranked.len(),
            required: TEAMS_PER_COURT,
        });
    }

    if matches.len() * TEAMS_PER_COURT < ranked.len() {
        let resting: Vec<&str> = ranked[matches.len() * TEAMS_PER_COURT..]
            .iter()
            .map(|(t, _)| t.label.as_str())
            .collect();
        log::debug!("Round {}: team(s) sit out: {:?}", round, resting);
    }
    Ok(matches)
}

/// Random (v4) match id drawn from the tournament's rng, so a seed fixes ids too.
pub fn match_id<R: Rng + ?Sized>(rng: &mut R) -> MatchId {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Court numbers 1..=count.
pub fn all_courts(count: u32) -> Vec<u32> {
    (1..=count).collect()
}
