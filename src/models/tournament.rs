//! TournamentState, settings, playoff format, and the crate error type.

use crate::models::cricket_match::{CricketMatch, MatchId, MatchState, PlayoffType, TournamentPhase, TBD};
use crate::models::stats::CricketTeamStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MAX_OVERS: u32 = 20;
pub const DEFAULT_MAX_WICKETS: u32 = 10;
pub const MIN_OVERS: u32 = 1;
pub const MAX_OVERS: u32 = 50;
pub const MIN_WICKETS: u32 = 1;
pub const MAX_WICKETS: u32 = 11;
pub const MIN_TEAMS: usize = 2;
pub const MAX_TEAMS: usize = 20;
pub const MAX_TEAM_NAME_LEN: usize = 10;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Bad input: team list, score entry, or settings. One message per problem.
    Validation(Vec<String>),
    /// Teams, format and settings are locked once matches are generated.
    SetupLocked,
    /// Matches have not been generated yet.
    NotGenerated,
    MatchNotFound(MatchId),
    TeamNotFound(String),
    /// A playoff match still has a TBD slot.
    TeamsNotResolved(MatchId),
    /// The match is not in a state that allows this action.
    InvalidTransition { match_id: MatchId, state: MatchState },
    TossAlreadySet(MatchId),
    InningsAlreadyRecorded { match_id: MatchId, team: String },
    /// Playoffs need at least 3 teams.
    NotEnoughTeamsForPlayoffs,
    /// Precondition: round-robin matches are still pending.
    RoundRobinIncomplete,
    /// Precondition: no TBD slot can be filled right now.
    NothingToResolve,
}

impl TournamentError {
    /// Preconditions are benign no-ops and carry no message for the user.
    pub fn is_precondition(&self) -> bool {
        matches!(self, TournamentError::RoundRobinIncomplete | TournamentError::NothingToResolve)
    }

    /// Messages to show the user; empty for preconditions.
    pub fn messages(&self) -> Vec<String> {
        match self {
            TournamentError::Validation(errors) => errors.clone(),
            e if e.is_precondition() => Vec::new(),
            e => vec![e.to_string()],
        }
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::Validation(errors) => write!(f, "{}", errors.join("; ")),
            TournamentError::SetupLocked => {
                write!(f, "Matches have already been generated; reset the tournament to change setup")
            }
            TournamentError::NotGenerated => write!(f, "Matches have not been generated yet"),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::TeamNotFound(name) => write!(f, "Team {} not found", name),
            TournamentError::TeamsNotResolved(id) => write!(f, "Teams for match {} are not decided yet", id),
            TournamentError::InvalidTransition { match_id, state } => {
                write!(f, "Match {} is {}", match_id, state)
            }
            TournamentError::TossAlreadySet(id) => write!(f, "Toss for match {} has already been recorded", id),
            TournamentError::InningsAlreadyRecorded { match_id, team } => {
                write!(f, "Innings of {} in match {} has already been recorded", team, match_id)
            }
            TournamentError::NotEnoughTeamsForPlayoffs => write!(f, "Need at least 3 teams for playoffs"),
            TournamentError::RoundRobinIncomplete => write!(f, "Round robin is not complete"),
            TournamentError::NothingToResolve => write!(f, "Nothing to resolve"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Result of an action as reported to the presentation layer.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ActionOutcome {
    pub fn ok() -> Self {
        Self { success: true, errors: None }
    }

    pub fn from_error(error: &TournamentError) -> Self {
        let messages = error.messages();
        Self {
            success: false,
            errors: if messages.is_empty() { None } else { Some(messages) },
        }
    }

    pub fn from_result<T>(result: &Result<T, TournamentError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::from_error(e),
        }
    }
}

/// Playoff bracket style.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayoffFormat {
    /// Semi-finals (1v4, 2v3) and a final.
    #[default]
    WorldCup,
    /// Qualifier 1, eliminator, qualifier 2, final.
    League,
}

/// Check match settings; one message per out-of-range value.
pub fn validate_settings(max_overs: u32, max_wickets: u32) -> Vec<String> {
    let mut errors = Vec::new();
    if !(MIN_OVERS..=MAX_OVERS).contains(&max_overs) {
        errors.push(format!("Overs must be between {} and {}", MIN_OVERS, MAX_OVERS));
    }
    if !(MIN_WICKETS..=MAX_WICKETS).contains(&max_wickets) {
        errors.push(format!("Wickets must be between {} and {}", MIN_WICKETS, MAX_WICKETS));
    }
    errors
}

/// Full tournament state. Owned by the caller and changed only through `logic::apply`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    pub teams: Vec<String>,
    /// Round-robin matches first, then the playoff bracket.
    pub matches: Vec<CricketMatch>,
    /// Round-robin aggregates keyed by team name.
    pub team_stats: BTreeMap<String, CricketTeamStats>,
    pub max_overs: u32,
    pub max_wickets: u32,
    pub phase: TournamentPhase,
    pub playoff_format: PlayoffFormat,
    /// Teams seeded into the playoff bracket.
    pub qualified_teams: Vec<String>,
    pub is_generated: bool,
}

impl Default for TournamentState {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentState {
    /// Empty tournament in Setup with default settings.
    pub fn new() -> Self {
        Self {
            teams: Vec::new(),
            matches: Vec::new(),
            team_stats: BTreeMap::new(),
            max_overs: DEFAULT_MAX_OVERS,
            max_wickets: DEFAULT_MAX_WICKETS,
            phase: TournamentPhase::Setup,
            playoff_format: PlayoffFormat::WorldCup,
            qualified_teams: Vec::new(),
            is_generated: false,
        }
    }

    pub fn find_match(&self, id: &str) -> Option<&CricketMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn find_match_mut(&mut self, id: &str) -> Option<&mut CricketMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn playoff_match(&self, playoff_type: PlayoffType) -> Option<&CricketMatch> {
        self.matches
            .iter()
            .find(|m| m.is_playoff && m.playoff_type == Some(playoff_type))
    }

    pub fn round_robin_matches(&self) -> impl Iterator<Item = &CricketMatch> {
        self.matches.iter().filter(|m| !m.is_playoff)
    }

    pub fn playoff_matches(&self) -> impl Iterator<Item = &CricketMatch> {
        self.matches.iter().filter(|m| m.is_playoff)
    }

    fn ensure_editable(&self) -> Result<(), TournamentError> {
        if self.is_generated {
            return Err(TournamentError::SetupLocked);
        }
        Ok(())
    }

    /// Any setup edit invalidates previously generated data.
    fn clear_generated(&mut self) {
        self.matches.clear();
        self.team_stats.clear();
        self.qualified_teams.clear();
        self.phase = TournamentPhase::Setup;
    }

    /// Add a team (Setup only). Names are trimmed, at most 10 characters, unique (case-insensitive).
    pub fn add_team(&mut self, name: impl Into<String>) -> Result<(), TournamentError> {
        self.ensure_editable()?;
        let name: String = name.into();
        let name = name.trim();
        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push("Team name cannot be empty".to_string());
        } else if name.chars().count() > MAX_TEAM_NAME_LEN {
            errors.push(format!("Team name must be at most {} characters", MAX_TEAM_NAME_LEN));
        } else if name.eq_ignore_ascii_case(TBD) {
            errors.push(format!("{} is reserved and cannot be used as a team name", TBD));
        } else if self.teams.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            errors.push(format!("Team {} already exists", name));
        }
        if self.teams.len() >= MAX_TEAMS {
            errors.push(format!("A tournament can have at most {} teams", MAX_TEAMS));
        }
        if !errors.is_empty() {
            return Err(TournamentError::Validation(errors));
        }
        self.teams.push(name.to_string());
        self.clear_generated();
        Ok(())
    }

    /// Remove a team by name, ignoring case (Setup only).
    pub fn remove_team(&mut self, name: &str) -> Result<(), TournamentError> {
        self.ensure_editable()?;
        let idx = self
            .teams
            .iter()
            .position(|t| t.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| TournamentError::TeamNotFound(name.to_string()))?;
        self.teams.remove(idx);
        self.clear_generated();
        Ok(())
    }

    /// Set overs per innings and wickets per innings (Setup only).
    pub fn set_settings(&mut self, max_overs: u32, max_wickets: u32) -> Result<(), TournamentError> {
        self.ensure_editable()?;
        let errors = validate_settings(max_overs, max_wickets);
        if !errors.is_empty() {
            return Err(TournamentError::Validation(errors));
        }
        self.max_overs = max_overs;
        self.max_wickets = max_wickets;
        self.clear_generated();
        Ok(())
    }

    /// Choose the playoff format (Setup only).
    pub fn set_playoff_format(&mut self, format: PlayoffFormat) -> Result<(), TournamentError> {
        self.ensure_editable()?;
        self.playoff_format = format;
        self.clear_generated();
        Ok(())
    }
}
