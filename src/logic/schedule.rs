//! Round-robin stage: team list validation and match generation.

use crate::models::{CricketMatch, MAX_TEAMS, MIN_TEAMS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Size of a round-robin stage for a given team count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub total_matches: usize,
    pub matches_per_team: usize,
    /// Lower bound on the number of rounds; the scheduler may use more.
    pub min_rounds: usize,
}

/// Check a team list before generating matches. Returns one message per problem, empty when valid.
pub fn validate_teams(teams: &[String]) -> Vec<String> {
    let mut errors = Vec::new();
    if teams.len() < MIN_TEAMS {
        errors.push(format!("Need at least {} teams", MIN_TEAMS));
    }
    if teams.len() > MAX_TEAMS {
        errors.push(format!("A tournament can have at most {} teams", MAX_TEAMS));
    }
    if teams.iter().any(|t| t.trim().is_empty()) {
        errors.push("Team names cannot be empty".to_string());
    }
    let mut seen = HashSet::new();
    for t in teams.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if !seen.insert(t.to_lowercase()) {
            errors.push(format!("Duplicate team name: {}", t));
        }
    }
    errors
}

/// Match counts for `team_count` teams.
pub fn schedule_summary(team_count: usize) -> ScheduleSummary {
    if team_count < MIN_TEAMS {
        return ScheduleSummary::default();
    }
    let total_matches = team_count * (team_count - 1) / 2;
    let per_round = team_count / 2;
    ScheduleSummary {
        total_matches,
        matches_per_team: team_count - 1,
        min_rounds: total_matches.div_ceil(per_round),
    }
}

/// Round-robin match id, `RR-001` style.
pub fn round_robin_match_id(seq: usize) -> String {
    format!("RR-{:03}", seq)
}

/// Generate every pairing once, packed into rounds where no team plays twice.
///
/// Pairs `(i, j), i < j` are listed in team order. Each round scans the remaining pairs from the
/// end and takes every pair whose teams are both still free in that round. Ids follow the order
/// in which pairs are taken. Deterministic, but not guaranteed to use the minimum number of rounds.
pub fn generate_round_robin(teams: &[String], max_overs: u32, max_wickets: u32) -> Vec<CricketMatch> {
    if teams.len() < MIN_TEAMS {
        return Vec::new();
    }

    let mut remaining: Vec<(usize, usize)> = (0..teams.len())
        .flat_map(|i| (i + 1..teams.len()).map(move |j| (i, j)))
        .collect();

    let mut matches = Vec::with_capacity(remaining.len());
    let mut round = 0;
    while !remaining.is_empty() {
        round += 1;
        let mut busy = vec![false; teams.len()];
        for idx in (0..remaining.len()).rev() {
            let (a, b) = remaining[idx];
            if busy[a] || busy[b] {
                continue;
            }
            busy[a] = true;
            busy[b] = true;
            remaining.remove(idx);
            matches.push(CricketMatch::round_robin(
                round_robin_match_id(matches.len() + 1),
                teams[a].clone(),
                teams[b].clone(),
                round,
                max_overs,
                max_wickets,
            ));
        }
    }

    log::debug!(
        "Scheduled {} round-robin matches for {} teams in {} rounds",
        matches.len(),
        teams.len(),
        round
    );
    matches
}

/// Number of distinct rounds used by a set of matches.
pub fn round_count(matches: &[CricketMatch]) -> usize {
    matches
        .iter()
        .map(|m| m.round)
        .collect::<HashSet<_>>()
        .len()
}
