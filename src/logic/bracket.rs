//! Playoff bracket skeleton, generated together with the round robin.
//!
//! The shape depends only on the team count and the format; every slot starts as TBD and is
//! filled by `logic::resolver`.

use crate::models::{CricketMatch, PlayoffFormat, PlayoffType, TournamentError};

/// Fewest teams that produce a bracket.
pub const MIN_PLAYOFF_TEAMS: usize = 3;

/// Stable id of each playoff match.
pub fn playoff_match_id(playoff_type: PlayoffType) -> &'static str {
    match playoff_type {
        PlayoffType::SemiFinal1 => "SF-001",
        PlayoffType::SemiFinal2 => "SF-002",
        PlayoffType::Qualifier1 => "Q1-001",
        PlayoffType::Eliminator => "E-001",
        PlayoffType::Qualifier2 => "Q2-001",
        PlayoffType::Final => "F-001",
    }
}

/// Bracket layout as (match, playoff round) for `team_count` teams.
pub fn bracket_layout(team_count: usize, format: PlayoffFormat) -> Vec<(PlayoffType, u32)> {
    if team_count < MIN_PLAYOFF_TEAMS {
        return Vec::new();
    }
    if team_count == MIN_PLAYOFF_TEAMS {
        return vec![(PlayoffType::Final, 1)];
    }
    match format {
        PlayoffFormat::WorldCup => vec![
            (PlayoffType::SemiFinal1, 1),
            (PlayoffType::SemiFinal2, 1),
            (PlayoffType::Final, 2),
        ],
        PlayoffFormat::League => vec![
            (PlayoffType::Qualifier1, 1),
            (PlayoffType::Eliminator, 1),
            (PlayoffType::Qualifier2, 2),
            (PlayoffType::Final, 3),
        ],
    }
}

/// Number of teams that qualify for the bracket.
pub fn qualifier_count(team_count: usize) -> usize {
    match team_count {
        n if n < MIN_PLAYOFF_TEAMS => 0,
        MIN_PLAYOFF_TEAMS => 2,
        _ => 4,
    }
}

/// Scheduled playoff matches with TBD teams.
pub fn generate_playoff_matches(
    team_count: usize,
    format: PlayoffFormat,
    max_overs: u32,
    max_wickets: u32,
) -> Result<Vec<CricketMatch>, TournamentError> {
    if team_count < MIN_PLAYOFF_TEAMS {
        return Err(TournamentError::NotEnoughTeamsForPlayoffs);
    }
    let matches: Vec<CricketMatch> = bracket_layout(team_count, format)
        .into_iter()
        .map(|(playoff_type, round)| {
            CricketMatch::playoff(playoff_match_id(playoff_type), playoff_type, round, max_overs, max_wickets)
        })
        .collect();
    log::debug!("Generated {} playoff matches ({:?})", matches.len(), format);
    Ok(matches)
}
