//! Team aggregates, Net Run Rate, and standings.
//!
//! Only completed round-robin matches count. Overs are accumulated as true overs; a side bowled
//! out before its quota is charged the full quota, both for its batting and for the opponent's
//! bowling.

use crate::models::{
    CricketMatch, CricketMatchResult, CricketTeamStats, InningsScore, Slot, WinMargin,
};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub use crate::models::{balls_to_overs, overs_to_balls};

pub const POINTS_FOR_WIN: u32 = 2;
pub const POINTS_FOR_DRAW: u32 = 1;
pub const POINTS_FOR_NO_RESULT: u32 = 0;

/// Zeroed aggregate for a team.
pub fn initialize_team_stats(team_name: &str) -> CricketTeamStats {
    CricketTeamStats::new(team_name)
}

/// Overs charged for an innings: the full quota if the side was all out early.
pub fn effective_overs(innings: &InningsScore, quota: u32) -> f64 {
    let actual = innings.decimal_overs();
    let quota = f64::from(quota);
    if innings.is_all_out && actual < quota {
        quota
    } else {
        actual
    }
}

fn rate(runs: u64, overs: f64) -> f64 {
    if overs > 0.0 {
        runs as f64 / overs
    } else {
        0.0
    }
}

/// Fold one completed match into a team's aggregate.
///
/// Playoff matches and matches the team did not play return `stats` unchanged.
pub fn update_team_stats_after_match(
    stats: &CricketTeamStats,
    m: &CricketMatch,
    result: &CricketMatchResult,
) -> CricketTeamStats {
    if m.is_playoff {
        return stats.clone();
    }
    let Some(slot) = m.slot_of(&stats.team_name) else {
        return stats.clone();
    };

    let mut s = stats.clone();
    s.matches_played += 1;

    if result.is_no_result {
        s.matches_no_result += 1;
        s.points += POINTS_FOR_NO_RESULT;
        return s;
    }

    let (own, opp) = match slot {
        Slot::Team1 => (&result.team1_innings, &result.team2_innings),
        Slot::Team2 => (&result.team2_innings, &result.team1_innings),
    };

    if result.is_draw {
        s.matches_drawn += 1;
        s.points += POINTS_FOR_DRAW;
    } else if result.winner.as_deref() == Some(stats.team_name.as_str()) {
        s.matches_won += 1;
        s.points += POINTS_FOR_WIN;
        let beats_best = s.biggest_win.as_ref().map_or(true, |b| result.margin > b.margin);
        if beats_best {
            s.biggest_win = Some(WinMargin {
                margin: result.margin,
                margin_type: result.margin_type,
                opponent: m.team(slot.other()).to_string(),
            });
        }
    } else {
        s.matches_lost += 1;
    }

    s.total_runs_scored += u64::from(own.runs);
    s.total_balls_faced += u64::from(own.balls_faced);
    s.total_overs_played += effective_overs(own, m.overs);
    s.total_runs_conceded += u64::from(opp.runs);
    s.total_balls_bowled += u64::from(opp.balls_faced);
    s.total_overs_bowled += effective_overs(opp, m.overs);

    s.highest_score = Some(s.highest_score.map_or(own.runs, |h| h.max(own.runs)));
    s.lowest_score = Some(s.lowest_score.map_or(own.runs, |l| l.min(own.runs)));

    s.batting_run_rate = rate(s.total_runs_scored, s.total_overs_played);
    s.bowling_run_rate = rate(s.total_runs_conceded, s.total_overs_bowled);
    s.net_run_rate = s.batting_run_rate - s.bowling_run_rate;
    s
}

/// Rebuild all aggregates from the completed round-robin matches, in match order.
pub fn compute_team_stats(teams: &[String], matches: &[CricketMatch]) -> BTreeMap<String, CricketTeamStats> {
    let mut stats: BTreeMap<String, CricketTeamStats> = teams
        .iter()
        .map(|t| (t.clone(), initialize_team_stats(t)))
        .collect();
    for m in matches.iter().filter(|m| !m.is_playoff && m.is_completed()) {
        let Some(result) = &m.result else { continue };
        for team in [&m.team1, &m.team2] {
            if let Some(entry) = stats.get_mut(team.as_str()) {
                *entry = update_team_stats_after_match(entry, m, result);
            }
        }
    }
    stats
}

/// Standings order: points, then NRR, then wins (all descending), then team name.
pub fn compare_standings(a: &CricketTeamStats, b: &CricketTeamStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.net_run_rate.total_cmp(&a.net_run_rate))
        .then_with(|| b.matches_won.cmp(&a.matches_won))
        .then_with(|| a.team_name.cmp(&b.team_name))
}

/// All teams, best first.
pub fn get_tournament_standings(stats: &BTreeMap<String, CricketTeamStats>) -> Vec<CricketTeamStats> {
    let mut standings: Vec<CricketTeamStats> = stats.values().cloned().collect();
    standings.sort_by(compare_standings);
    standings
}

/// NRR for display: explicit sign, three decimals. Anything that rounds to zero is `0.000`.
pub fn format_nrr(nrr: f64) -> String {
    if !nrr.is_finite() {
        return "0.000".to_string();
    }
    let rounded = (nrr.abs() * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0.000".to_string()
    } else if nrr > 0.0 {
        format!("+{:.3}", rounded)
    } else {
        format!("-{:.3}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_notation_round_trips() {
        for balls in 0..=300 {
            assert_eq!(overs_to_balls(balls_to_overs(balls)), balls);
        }
        assert_eq!(overs_to_balls(19.4), 118);
        assert_eq!(overs_to_balls(0.5), 5);
    }

    #[test]
    fn negative_zero_nrr() {
        assert_eq!(format_nrr(-0.0), "0.000");
        assert_eq!(format_nrr(-0.0004), "0.000");
    }
}
