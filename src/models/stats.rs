//! Per-team aggregate over completed round-robin matches.

use crate::models::innings::MarginType;
use serde::{Deserialize, Serialize};

/// Largest winning margin recorded by a team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinMargin {
    pub margin: u32,
    pub margin_type: MarginType,
    pub opponent: String,
}

/// Standings row for one team. Built by `logic::statistics`, never from playoff matches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CricketTeamStats {
    pub team_name: String,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_drawn: u32,
    pub matches_no_result: u32,
    pub points: u32,
    pub total_runs_scored: u64,
    pub total_balls_faced: u64,
    /// True overs, with the all-out quota substitution applied.
    pub total_overs_played: f64,
    pub total_runs_conceded: u64,
    pub total_balls_bowled: u64,
    pub total_overs_bowled: f64,
    pub batting_run_rate: f64,
    pub bowling_run_rate: f64,
    pub net_run_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biggest_win: Option<WinMargin>,
}

impl CricketTeamStats {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            ..Self::default()
        }
    }
}
