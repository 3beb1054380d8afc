//! The reducer: every change to a tournament goes through [`apply`].
//!
//! `apply` never touches its input. It works on a clone and hands the clone back, so a rejected
//! command leaves the caller's state exactly as it was.

use crate::logic::bracket::generate_playoff_matches;
use crate::logic::lifecycle::{
    batting_first, cancel_match, complete_match as finalize_match, innings_from_input, match_state,
    record_innings, set_toss, start_match, start_second_innings, validate_score,
};
use crate::logic::resolver::{
    has_resolvable_tbd_teams, is_round_robin_complete, needs_seeding, propagate_playoff_results,
    qualified_teams, resolve_playoffs, seed_playoffs,
};
use crate::logic::schedule::{generate_round_robin, validate_teams};
use crate::logic::statistics::compute_team_stats;
use crate::logic::status::{derive_phase, next_match_id};
use crate::models::{
    validate_settings, CricketMatch, MatchId, MatchState, PlayoffFormat, ScoreInput, Slot, TossDecision,
    TournamentError, TournamentPhase, TournamentState,
};
use serde::{Deserialize, Serialize};

/// Everything that can happen to a tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Command {
    AddTeam { name: String },
    RemoveTeam { name: String },
    UpdateSettings { max_overs: u32, max_wickets: u32 },
    SetPlayoffFormat { format: PlayoffFormat },
    /// Round robin and playoff skeleton in one step.
    GenerateMatches,
    StartMatch { match_id: MatchId },
    SetToss { match_id: MatchId, toss_winner: String, decision: TossDecision },
    StartSecondInnings { match_id: MatchId },
    RecordInnings { match_id: MatchId, team: String, score: ScoreInput },
    CompleteMatch { match_id: MatchId },
    /// Enter both scores at once and finalize: start, toss (team 1 bats) and innings as needed.
    SimulateMatchResult { match_id: MatchId, team1_score: ScoreInput, team2_score: ScoreInput },
    CancelMatch { match_id: MatchId },
    ResolvePlayoffs,
    /// Back to Setup keeping teams, settings and format.
    Restart,
    /// Back to the empty initial state.
    Reset,
}

/// Apply `command` to `state`, returning the new state or why the command was rejected.
pub fn apply(state: &TournamentState, command: Command) -> Result<TournamentState, TournamentError> {
    let mut next = state.clone();
    match command {
        Command::AddTeam { name } => next.add_team(name)?,
        Command::RemoveTeam { name } => next.remove_team(&name)?,
        Command::UpdateSettings { max_overs, max_wickets } => next.set_settings(max_overs, max_wickets)?,
        Command::SetPlayoffFormat { format } => next.set_playoff_format(format)?,
        Command::GenerateMatches => generate(&mut next)?,
        Command::StartMatch { match_id } => start_match(match_mut(&mut next, &match_id)?)?,
        Command::SetToss { match_id, toss_winner, decision } => {
            set_toss(match_mut(&mut next, &match_id)?, &toss_winner, decision)?
        }
        Command::StartSecondInnings { match_id } => start_second_innings(match_mut(&mut next, &match_id)?)?,
        Command::RecordInnings { match_id, team, score } => {
            let m = match_mut(&mut next, &match_id)?;
            let innings = innings_from_input(m, &team, &score)?;
            record_innings(m, &team, innings)?;
        }
        Command::CompleteMatch { match_id } => {
            finalize_match(match_mut(&mut next, &match_id)?)?;
            refresh(&mut next);
        }
        Command::SimulateMatchResult { match_id, team1_score, team2_score } => {
            simulate(match_mut(&mut next, &match_id)?, &team1_score, &team2_score)?;
            refresh(&mut next);
        }
        Command::CancelMatch { match_id } => {
            cancel_match(match_mut(&mut next, &match_id)?)?;
            refresh(&mut next);
        }
        Command::ResolvePlayoffs => resolve(&mut next)?,
        Command::Restart => {
            let mut fresh = TournamentState::new();
            fresh.teams = std::mem::take(&mut next.teams);
            fresh.max_overs = next.max_overs;
            fresh.max_wickets = next.max_wickets;
            fresh.playoff_format = next.playoff_format;
            next = fresh;
        }
        Command::Reset => next = TournamentState::new(),
    }
    Ok(next)
}

fn match_mut<'a>(state: &'a mut TournamentState, match_id: &str) -> Result<&'a mut CricketMatch, TournamentError> {
    if !state.is_generated {
        return Err(TournamentError::NotGenerated);
    }
    state
        .find_match_mut(match_id)
        .ok_or_else(|| TournamentError::MatchNotFound(match_id.to_string()))
}

fn generate(state: &mut TournamentState) -> Result<(), TournamentError> {
    if state.is_generated {
        return Err(TournamentError::SetupLocked);
    }
    let mut errors = validate_teams(&state.teams);
    errors.extend(validate_settings(state.max_overs, state.max_wickets));
    if !errors.is_empty() {
        return Err(TournamentError::Validation(errors));
    }

    let mut matches = generate_round_robin(&state.teams, state.max_overs, state.max_wickets);
    match generate_playoff_matches(state.teams.len(), state.playoff_format, state.max_overs, state.max_wickets) {
        Ok(playoffs) => matches.extend(playoffs),
        Err(TournamentError::NotEnoughTeamsForPlayoffs) => {
            log::info!("{} teams: round robin only, no playoffs", state.teams.len());
        }
        Err(e) => return Err(e),
    }

    state.matches = matches;
    state.team_stats = compute_team_stats(&state.teams, &state.matches);
    state.qualified_teams.clear();
    state.is_generated = true;
    state.phase = TournamentPhase::RoundRobin;
    log::info!(
        "Generated {} matches for {} teams ({:?} playoffs)",
        state.matches.len(),
        state.teams.len(),
        state.playoff_format
    );
    Ok(())
}

/// Both scores in one go. Only for matches with no innings recorded yet.
fn simulate(m: &mut CricketMatch, team1_score: &ScoreInput, team2_score: &ScoreInput) -> Result<(), TournamentError> {
    let state = match_state(m);
    if !matches!(
        state,
        MatchState::NotStarted | MatchState::InProgressNeedToss | MatchState::FirstInningsReady
    ) {
        return Err(TournamentError::InvalidTransition {
            match_id: m.id.clone(),
            state,
        });
    }
    if !m.teams_resolved() {
        return Err(TournamentError::TeamsNotResolved(m.id.clone()));
    }

    let mut errors = Vec::new();
    for (team, score) in [(&m.team1, team1_score), (&m.team2, team2_score)] {
        errors.extend(
            validate_score(score, m.overs, m.max_wickets)
                .into_iter()
                .map(|e| format!("{}: {}", team, e)),
        );
    }
    if !errors.is_empty() {
        return Err(TournamentError::Validation(errors));
    }

    if state == MatchState::NotStarted {
        start_match(m)?;
    }
    if m.toss.is_none() {
        let team1 = m.team1.clone();
        set_toss(m, &team1, TossDecision::Bat)?;
    }
    let first = batting_first(m).unwrap_or(Slot::Team1);
    for slot in [first, first.other()] {
        let team = m.team(slot).to_string();
        let score = match slot {
            Slot::Team1 => team1_score,
            Slot::Team2 => team2_score,
        };
        let innings = innings_from_input(m, &team, score)?;
        record_innings(m, &team, innings)?;
    }
    finalize_match(m)
}

/// Recompute everything derived from match results: statistics, playoff slots, phase.
fn refresh(state: &mut TournamentState) {
    state.team_stats = compute_team_stats(&state.teams, &state.matches);
    if is_round_robin_complete(state) && state.qualified_teams.is_empty() {
        state.qualified_teams = qualified_teams(state);
    }
    if needs_seeding(state) {
        state.matches = seed_playoffs(state).updated_matches;
    }
    if has_resolvable_tbd_teams(state) {
        state.matches = propagate_playoff_results(state).updated_matches;
    }
    let phase = derive_phase(state);
    if phase != state.phase {
        log::info!("Tournament phase {:?} -> {:?}", state.phase, phase);
        state.phase = phase;
    }
}

fn resolve(state: &mut TournamentState) -> Result<(), TournamentError> {
    if !state.is_generated {
        return Err(TournamentError::NotGenerated);
    }
    let outcome = resolve_playoffs(state);
    if !outcome.success {
        return Err(if is_round_robin_complete(state) {
            TournamentError::NothingToResolve
        } else {
            TournamentError::RoundRobinIncomplete
        });
    }
    state.matches = outcome.updated_matches;
    refresh(state);
    Ok(())
}

/// Generate the round robin and playoff skeleton.
pub fn generate_matches(state: &TournamentState) -> Result<TournamentState, TournamentError> {
    apply(state, Command::GenerateMatches)
}

/// Enter a full result for one match.
pub fn simulate_match_result(
    state: &TournamentState,
    match_id: &str,
    team1_score: ScoreInput,
    team2_score: ScoreInput,
) -> Result<TournamentState, TournamentError> {
    apply(
        state,
        Command::SimulateMatchResult {
            match_id: match_id.to_string(),
            team1_score,
            team2_score,
        },
    )
}

/// Finalize a match; also returns the next match waiting to be played, if any.
pub fn complete_match(
    state: &TournamentState,
    match_id: &str,
) -> Result<(TournamentState, Option<MatchId>), TournamentError> {
    let next = apply(
        state,
        Command::CompleteMatch {
            match_id: match_id.to_string(),
        },
    )?;
    let next_id = next_match_id(&next);
    Ok((next, next_id))
}
