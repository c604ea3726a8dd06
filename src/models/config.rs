//! Tournament setup input and the immutable per-tournament configuration.

use crate::models::player::{ParticipantId, Team};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How participants are grouped onto courts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Americano: partners are reshuffled every round.
    #[default]
    Individual,
    /// Teams of two stay together; only the opponents rotate.
    FixedPartner,
}

impl std::fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentFormat::Individual => write!(f, "Americano"),
            TournamentFormat::FixedPartner => write!(f, "Fixed Partner"),
        }
    }
}

/// Roster in declared order. The order matters: it breaks fairness ties.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Roster {
    Individuals(Vec<ParticipantId>),
    Teams(Vec<Team>),
}

/// What the setup screens hand over to the core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RosterInput {
    pub name: String,
    #[serde(default)]
    pub format: TournamentFormat,
    #[serde(default = "default_court_count")]
    pub court_count: u32,
    #[serde(default = "default_target_points")]
    pub target_points: u32,
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

fn default_court_count() -> u32 {
    1
}

/// Matches the setup form's default (the other offered option is 21).
fn default_target_points() -> u32 {
    16
}

/// Immutable configuration of one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub court_count: u32,
    pub target_points: u32,
    pub roster: Roster,
}

impl TournamentConfig {
    /// Validate setup input. Names are trimmed and must be unique (case-insensitive);
    /// teams must be disjoint. Minimum roster size is checked when scheduling.
    pub fn from_input(input: RosterInput) -> Result<Self, TournamentError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidRoster("Tournament name is required".into()));
        }
        if input.court_count == 0 {
            return Err(TournamentError::InvalidRoster("Court count must be at least 1".into()));
        }
        if input.target_points == 0 {
            return Err(TournamentError::InvalidRoster("Target points must be greater than 0".into()));
        }

        let mut seen = HashSet::new();
        let roster = match input.format {
            TournamentFormat::Individual => {
                if !input.teams.is_empty() {
                    return Err(TournamentError::InvalidRoster(
                        "Teams are only used in fixed-partner tournaments".into(),
                    ));
                }
                let players = input
                    .players
                    .iter()
                    .map(|p| unique_name(p, &mut seen))
                    .collect::<Result<Vec<_>, _>>()?;
                Roster::Individuals(players)
            }
            TournamentFormat::FixedPartner => {
                if !input.players.is_empty() {
                    return Err(TournamentError::InvalidRoster(
                        "Fixed-partner tournaments take teams, not individual players".into(),
                    ));
                }
                let mut teams = Vec::with_capacity(input.teams.len());
                for (i, team) in input.teams.into_iter().enumerate() {
                    let first = unique_name(&team.players[0], &mut seen)?;
                    let second = unique_name(&team.players[1], &mut seen)?;
                    let label = match team.label.trim() {
                        "" => format!("Team {}", i + 1),
                        l => l.to_string(),
                    };
                    teams.push(Team {
                        label,
                        color: team.color,
                        players: [first, second],
                    });
                }
                Roster::Teams(teams)
            }
        };

        Ok(Self {
            name: name.to_string(),
            court_count: input.court_count,
            target_points: input.target_points,
            roster,
        })
    }

    pub fn format(&self) -> TournamentFormat {
        match self.roster {
            Roster::Individuals(_) => TournamentFormat::Individual,
            Roster::Teams(_) => TournamentFormat::FixedPartner,
        }
    }

    /// Every participant in roster order (team members flattened in team order).
    pub fn participants(&self) -> Vec<ParticipantId> {
        match &self.roster {
            Roster::Individuals(players) => players.clone(),
            Roster::Teams(teams) => teams.iter().flat_map(|t| t.players.iter().cloned()).collect(),
        }
    }
}

fn unique_name(raw: &str, seen: &mut HashSet<String>) -> Result<ParticipantId, TournamentError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TournamentError::InvalidRoster("Player names cannot be empty".into()));
    }
    if !seen.insert(name.to_lowercase()) {
        return Err(TournamentError::InvalidRoster(format!(
            "Player \"{}\" appears more than once",
            name
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(players: &[&str]) -> RosterInput {
        RosterInput {
            name: "Friday night".into(),
            format: TournamentFormat::Individual,
            court_count: 2,
            target_points: 16,
            players: players.iter().map(|p| p.to_string()).collect(),
            teams: Vec::new(),
        }
    }

    #[test]
    fn trims_names_and_keeps_roster_order() {
        let cfg = TournamentConfig::from_input(input(&[" Ana ", "Ben", "Cid ", "Dee"])).unwrap();
        assert_eq!(cfg.participants(), vec!["Ana", "Ben", "Cid", "Dee"]);
        assert_eq!(cfg.format(), TournamentFormat::Individual);
    }

    #[test]
    fn rejects_case_insensitive_duplicates() {
        let err = TournamentConfig::from_input(input(&["Ana", "ana", "Ben", "Cid"])).unwrap_err();
        assert!(matches!(err, TournamentError::InvalidRoster(_)));
    }

    #[test]
    fn rejects_zero_courts_and_zero_target() {
        let mut i = input(&["Ana", "Ben", "Cid", "Dee"]);
        i.court_count = 0;
        assert!(TournamentConfig::from_input(i).is_err());
        let mut i = input(&["Ana", "Ben", "Cid", "Dee"]);
        i.target_points = 0;
        assert!(TournamentConfig::from_input(i).is_err());
    }

    #[test]
    fn teams_must_be_disjoint() {
        let i = RosterInput {
            name: "Pairs".into(),
            format: TournamentFormat::FixedPartner,
            court_count: 1,
            target_points: 21,
            players: Vec::new(),
            teams: vec![Team::new("Red", "Ana", "Ben"), Team::new("Blue", "Ben", "Cid")],
        };
        assert!(matches!(
            TournamentConfig::from_input(i),
            Err(TournamentError::InvalidRoster(_))
        ));
    }

    #[test]
    fn blank_team_labels_get_numbered() {
        let i = RosterInput {
            name: "Pairs".into(),
            format: TournamentFormat::FixedPartner,
            court_count: 1,
            target_points: 21,
            players: Vec::new(),
            teams: vec![Team::new("", "Ana", "Ben"), Team::new("Blue", "Cid", "Dee")],
        };
        let cfg = TournamentConfig::from_input(i).unwrap();
        match cfg.roster {
            Roster::Teams(teams) => {
                assert_eq!(teams[0].label, "Team 1");
                assert_eq!(teams[1].label, "Blue");
            }
            Roster::Individuals(_) => panic!("expected teams"),
        }
    }

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let i: RosterInput =
            serde_json::from_str(r#"{"name":"Quick","players":["A","B","C","D"]}"#).unwrap();
        assert_eq!(i.court_count, 1);
        assert_eq!(i.target_points, 16);
        assert_eq!(i.format, TournamentFormat::Individual);
    }
}
