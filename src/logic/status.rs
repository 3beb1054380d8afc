//! Read-only views over a tournament: phase, standings, what to do next, the champion.

use crate::logic::resolver::{has_resolvable_tbd_teams, is_round_robin_complete, needs_seeding, ranked_teams};
use crate::logic::statistics::get_tournament_standings;
use crate::models::{CricketTeamStats, MatchId, PlayoffType, TournamentPhase, TournamentState, MIN_TEAMS};
use serde::{Deserialize, Serialize};

/// What the organizer should do next.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NextAction {
    AddTeams,
    GenerateMatches,
    PlayRoundRobin,
    ResolvePlayoffs,
    PlayPlayoffs,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffStatus {
    pub phase: TournamentPhase,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<NextAction>,
}

/// Current standings, best first.
pub fn team_standings(state: &TournamentState) -> Vec<CricketTeamStats> {
    get_tournament_standings(&state.team_stats)
}

/// True once the final has a winner, or, without a bracket, once the round robin is over.
pub fn is_tournament_complete(state: &TournamentState) -> bool {
    if !state.is_generated {
        return false;
    }
    match state.playoff_match(PlayoffType::Final) {
        Some(f) => f.is_completed() && f.winner().is_some(),
        None => is_round_robin_complete(state),
    }
}

/// The champion: the final's winner, or the standings leader when there is no bracket.
pub fn tournament_winner(state: &TournamentState) -> Option<String> {
    if !is_tournament_complete(state) {
        return None;
    }
    match state.playoff_match(PlayoffType::Final) {
        Some(f) => f.winner().map(str::to_string),
        None => ranked_teams(state).into_iter().next(),
    }
}

/// Phase implied by the matches.
pub fn derive_phase(state: &TournamentState) -> TournamentPhase {
    if !state.is_generated {
        TournamentPhase::Setup
    } else if is_tournament_complete(state) {
        TournamentPhase::Completed
    } else if is_round_robin_complete(state) {
        TournamentPhase::Playoffs
    } else {
        TournamentPhase::RoundRobin
    }
}

/// First match in tournament order that can be played now.
pub fn next_match_id(state: &TournamentState) -> Option<MatchId> {
    state
        .matches
        .iter()
        .find(|m| !m.is_finished() && m.teams_resolved())
        .map(|m| m.id.clone())
}

/// Summary of where the tournament stands and the next step.
pub fn playoff_status(state: &TournamentState) -> PlayoffStatus {
    let phase = derive_phase(state);
    let (description, next_action) = match phase {
        TournamentPhase::Setup if state.teams.len() < MIN_TEAMS => (
            format!("Add at least {} teams ({} added)", MIN_TEAMS, state.teams.len()),
            Some(NextAction::AddTeams),
        ),
        TournamentPhase::Setup => (
            format!("{} teams ready, generate the schedule", state.teams.len()),
            Some(NextAction::GenerateMatches),
        ),
        TournamentPhase::RoundRobin => {
            let total = state.round_robin_matches().count();
            let done = state.round_robin_matches().filter(|m| m.is_finished()).count();
            (
                format!("Round robin: {} of {} matches played", done, total),
                Some(NextAction::PlayRoundRobin),
            )
        }
        TournamentPhase::Playoffs if needs_seeding(state) || has_resolvable_tbd_teams(state) => (
            "Playoff teams are ready to be filled in".to_string(),
            Some(NextAction::ResolvePlayoffs),
        ),
        TournamentPhase::Playoffs => {
            let pending = state.playoff_matches().find(|m| !m.is_finished() && m.teams_resolved());
            match pending {
                Some(m) => (
                    format!(
                        "{}: {} vs {}",
                        m.playoff_type.map_or("Playoff", |t| t.label()),
                        m.team1,
                        m.team2
                    ),
                    Some(NextAction::PlayPlayoffs),
                ),
                None => ("Waiting for playoff results".to_string(), None),
            }
        }
        TournamentPhase::Completed => match tournament_winner(state) {
            Some(w) => (format!("Tournament complete, {} are the champions", w), None),
            None => ("Tournament complete".to_string(), None),
        },
    };
    PlayoffStatus {
        phase,
        description,
        next_action,
    }
}
