//! Sample results for every pending match, for demos and trying out brackets.

use crate::logic::orchestrator::{apply, Command};
use crate::models::{balls_to_overs, CricketMatch, ScoreInput, TournamentError, TournamentState, BALLS_PER_OVER};
use rand::Rng;

/// A plausible innings: all out somewhere in the second half of the quota, or the full quota.
pub fn sample_innings<R: Rng + ?Sized>(overs: u32, max_wickets: u32, rng: &mut R) -> ScoreInput {
    let wickets = rng.gen_range(0..=max_wickets);
    let quota = overs * BALLS_PER_OVER;
    let balls = if wickets >= max_wickets {
        rng.gen_range(quota / 2..=quota)
    } else {
        quota
    };
    let runs_per_over: f64 = rng.gen_range(5.0..10.0);
    let runs = (f64::from(balls) / f64::from(BALLS_PER_OVER) * runs_per_over).round() as i64;
    ScoreInput::new(runs, i64::from(wickets), balls_to_overs(balls))
}

/// Scores for both teams. Playoff matches never tie, so the bracket can always advance.
pub fn sample_scores<R: Rng + ?Sized>(m: &CricketMatch, rng: &mut R) -> (ScoreInput, ScoreInput) {
    let mut team1 = sample_innings(m.overs, m.max_wickets, rng);
    let team2 = sample_innings(m.overs, m.max_wickets, rng);
    if m.is_playoff && team1.runs == team2.runs {
        team1.runs += 1;
    }
    (team1, team2)
}

/// Play every match that has not started scoring, one after another in tournament order.
///
/// Playoff slots fill in as earlier results land, so the whole bracket is played through.
/// Matches with an innings already recorded are left for the scorer.
pub fn generate_sample_results<R: Rng + ?Sized>(
    state: &TournamentState,
    rng: &mut R,
) -> Result<TournamentState, TournamentError> {
    if !state.is_generated {
        return Err(TournamentError::NotGenerated);
    }
    let mut current = state.clone();
    let mut played = 0;
    for idx in 0..current.matches.len() {
        let m = &current.matches[idx];
        if m.is_finished() || !m.teams_resolved() || m.team1_innings.is_some() || m.team2_innings.is_some() {
            continue;
        }
        let (team1_score, team2_score) = sample_scores(m, rng);
        let command = Command::SimulateMatchResult {
            match_id: m.id.clone(),
            team1_score,
            team2_score,
        };
        current = apply(&current, command)?;
        played += 1;
    }
    log::info!("Simulated {} match(es)", played);
    Ok(current)
}
