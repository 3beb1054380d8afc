//! Match lifecycle: state derivation, transitions, score entry validation, and finalization.
//!
//! Nothing about the lifecycle is stored as an explicit state; [`match_state`] derives it from
//! status, toss and recorded innings. Every transition checks the derived state first.

use crate::models::{
    CricketMatch, CricketMatchResult, InningsScore, MarginType, MatchState, MatchStatus, MatchType,
    ScoreInput, Slot, TossDecision, TossResult, TournamentError,
};

/// Wickets used by the finalization margin rule, whatever the match setting.
const MARGIN_WICKETS: u32 = 10;

/// Most runs accepted for one innings.
pub const MAX_INNINGS_RUNS: i64 = 9_999;

/// Derive the lifecycle state of a match.
pub fn match_state(m: &CricketMatch) -> MatchState {
    match m.status {
        MatchStatus::Completed => return MatchState::Completed,
        MatchStatus::Cancelled => return MatchState::Cancelled,
        MatchStatus::Scheduled if m.toss.is_none() => return MatchState::NotStarted,
        MatchStatus::InProgress if m.toss.is_none() => return MatchState::InProgressNeedToss,
        _ => {}
    }
    let Some(first) = batting_first(m) else {
        return MatchState::InProgressNeedToss;
    };
    match (m.innings(first), m.innings(first.other())) {
        (None, _) => MatchState::FirstInningsReady,
        (Some(_), None) if m.second_innings_started => MatchState::SecondInningsReady,
        (Some(_), None) => MatchState::FirstInningsComplete,
        (Some(_), Some(_)) => MatchState::ReadyToFinish,
    }
}

/// The slot that bats first, once the toss is known.
///
/// Team 1 bats first if it won the toss and chose to bat, or lost it and the winner chose to bowl.
pub fn batting_first(m: &CricketMatch) -> Option<Slot> {
    let toss = m.toss.as_ref()?;
    let team1_won = toss.toss_winner == m.team1;
    let team1_bats = match toss.decision {
        TossDecision::Bat => team1_won,
        TossDecision::Bowl => !team1_won,
    };
    Some(if team1_bats { Slot::Team1 } else { Slot::Team2 })
}

fn invalid(m: &CricketMatch) -> TournamentError {
    TournamentError::InvalidTransition {
        match_id: m.id.clone(),
        state: match_state(m),
    }
}

/// Scheduled -> in progress. Both teams must be known.
pub fn start_match(m: &mut CricketMatch) -> Result<(), TournamentError> {
    if match_state(m) != MatchState::NotStarted {
        return Err(invalid(m));
    }
    if !m.teams_resolved() {
        return Err(TournamentError::TeamsNotResolved(m.id.clone()));
    }
    m.status = MatchStatus::InProgress;
    Ok(())
}

/// Record the toss. Allowed once, while the match is in progress.
pub fn set_toss(m: &mut CricketMatch, toss_winner: &str, decision: TossDecision) -> Result<(), TournamentError> {
    if m.toss.is_some() {
        return Err(TournamentError::TossAlreadySet(m.id.clone()));
    }
    if match_state(m) != MatchState::InProgressNeedToss {
        return Err(invalid(m));
    }
    let winner = m
        .slot_of(toss_winner)
        .ok_or_else(|| TournamentError::TeamNotFound(toss_winner.to_string()))?;
    m.toss = Some(TossResult {
        toss_winner: m.team(winner).to_string(),
        decision,
        toss_loser: m.team(winner.other()).to_string(),
    });
    Ok(())
}

/// Open the chase after the first innings.
pub fn start_second_innings(m: &mut CricketMatch) -> Result<(), TournamentError> {
    if match_state(m) != MatchState::FirstInningsComplete {
        return Err(invalid(m));
    }
    m.second_innings_started = true;
    Ok(())
}

/// Attach an innings for `team`. Innings follow the batting order and are never overwritten.
pub fn record_innings(m: &mut CricketMatch, team: &str, score: InningsScore) -> Result<(), TournamentError> {
    let slot = m
        .slot_of(team)
        .ok_or_else(|| TournamentError::TeamNotFound(team.to_string()))?;
    if m.innings(slot).is_some() {
        return Err(TournamentError::InningsAlreadyRecorded {
            match_id: m.id.clone(),
            team: team.to_string(),
        });
    }
    let first = batting_first(m).ok_or_else(|| invalid(m))?;
    let state = match_state(m);
    let allowed = if slot == first {
        state == MatchState::FirstInningsReady
    } else {
        matches!(state, MatchState::FirstInningsComplete | MatchState::SecondInningsReady)
    };
    if !allowed {
        return Err(invalid(m));
    }
    let score = InningsScore {
        team_name: team.to_string(),
        ..score
    };
    match slot {
        Slot::Team1 => m.team1_innings = Some(score),
        Slot::Team2 => m.team2_innings = Some(score),
    }
    if slot != first {
        m.second_innings_started = true;
    }
    Ok(())
}

/// Finalize a match with both innings recorded.
pub fn complete_match(m: &mut CricketMatch) -> Result<(), TournamentError> {
    if match_state(m) != MatchState::ReadyToFinish {
        return Err(invalid(m));
    }
    let (Some(team1_innings), Some(team2_innings)) = (m.team1_innings.clone(), m.team2_innings.clone()) else {
        return Err(invalid(m));
    };
    let match_type = if m.is_playoff { MatchType::Playoff } else { MatchType::RoundRobin };
    m.result = Some(decide_result(&m.team1, &m.team2, team1_innings, team2_innings, match_type));
    m.status = MatchStatus::Completed;
    log::debug!("Match {} completed", m.id);
    Ok(())
}

/// Scheduled or in progress -> cancelled. Round-robin matches only; the bracket must be played out.
pub fn cancel_match(m: &mut CricketMatch) -> Result<(), TournamentError> {
    if m.is_playoff {
        return Err(TournamentError::Validation(vec!["Playoff matches cannot be cancelled".to_string()]));
    }
    if m.is_finished() {
        return Err(invalid(m));
    }
    m.status = MatchStatus::Cancelled;
    Ok(())
}

/// Result from the two innings, decided on runs alone.
///
/// Equal runs is a draw. More runs for team 1 is a win by the run difference. Otherwise team 2
/// wins by `10 - team 2 wickets`, regardless of overs or the wickets setting of the match.
pub fn decide_result(
    team1: &str,
    team2: &str,
    team1_innings: InningsScore,
    team2_innings: InningsScore,
    match_type: MatchType,
) -> CricketMatchResult {
    let (winner, loser, margin_type, margin) = match team1_innings.runs.cmp(&team2_innings.runs) {
        std::cmp::Ordering::Equal => (None, None, MarginType::Runs, 0),
        std::cmp::Ordering::Greater => (
            Some(team1.to_string()),
            Some(team2.to_string()),
            MarginType::Runs,
            team1_innings.runs - team2_innings.runs,
        ),
        std::cmp::Ordering::Less => (
            Some(team2.to_string()),
            Some(team1.to_string()),
            MarginType::Wickets,
            MARGIN_WICKETS.saturating_sub(team2_innings.wickets),
        ),
    };
    CricketMatchResult {
        is_draw: winner.is_none(),
        winner,
        loser,
        is_no_result: false,
        team1_innings,
        team2_innings,
        margin_type,
        margin,
        match_type,
    }
}

/// Parse raw text fields from a score form. Each non-numeric field produces one message.
pub fn parse_score_input(runs: &str, wickets: &str, overs: &str) -> Result<ScoreInput, Vec<String>> {
    let mut errors = Vec::new();
    let runs = runs.trim().parse::<i64>().map_err(|_| errors.push("Runs must be a whole number".to_string()));
    let wickets = wickets
        .trim()
        .parse::<i64>()
        .map_err(|_| errors.push("Wickets must be a whole number".to_string()));
    let overs = overs
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|o| o.is_finite())
        .ok_or_else(|| errors.push("Overs must be a number".to_string()));
    match (runs, wickets, overs) {
        (Ok(runs), Ok(wickets), Ok(overs)) => Ok(ScoreInput::new(runs, wickets, overs)),
        _ => Err(errors),
    }
}

/// Check a score against the match settings. Returns one message per problem.
pub fn validate_score(score: &ScoreInput, match_overs: u32, max_wickets: u32) -> Vec<String> {
    let mut errors = Vec::new();
    if score.runs < 0 {
        errors.push("Runs cannot be negative".to_string());
    } else if score.runs > MAX_INNINGS_RUNS {
        errors.push(format!("Runs cannot exceed {}", MAX_INNINGS_RUNS));
    }
    if score.wickets < 0 {
        errors.push("Wickets cannot be negative".to_string());
    } else if score.wickets > i64::from(max_wickets) {
        errors.push(format!("Wickets cannot exceed {}", max_wickets));
    }
    if !score.overs.is_finite() {
        errors.push("Overs must be a number".to_string());
    } else if score.overs < 0.0 {
        errors.push("Overs cannot be negative".to_string());
    } else {
        if score.overs > f64::from(match_overs) {
            errors.push(format!("Overs cannot exceed {}", match_overs));
        }
        let tenths = score.overs * 10.0;
        let balls = ((score.overs - score.overs.trunc()) * 10.0).round();
        if (tenths - tenths.round()).abs() > 1e-6 {
            errors.push("Overs can have at most one decimal place".to_string());
        } else if balls > 5.0 {
            errors.push("Balls in an over must be between 0 and 5".to_string());
        }
    }
    errors
}

/// Validate a score for match `m` and turn it into an innings for `team`.
pub fn innings_from_input(m: &CricketMatch, team: &str, score: &ScoreInput) -> Result<InningsScore, TournamentError> {
    let errors = validate_score(score, m.overs, m.max_wickets);
    if !errors.is_empty() {
        return Err(TournamentError::Validation(errors));
    }
    Ok(InningsScore::new(
        team,
        score.runs as u32,
        score.wickets as u32,
        score.overs,
        m.max_wickets,
    ))
}
