//! Innings scores, score entry, match results, and cricket overs notation.
//!
//! Overs are stored in cricket notation: `19.4` means 19 overs and 4 balls, not 19.4 true overs.
//! Rate arithmetic always goes through [`overs_to_decimal`].

use serde::{Deserialize, Serialize};

pub const BALLS_PER_OVER: u32 = 6;

/// Cricket-notation overs to a ball count. `19.4` -> 118.
pub fn overs_to_balls(overs: f64) -> u32 {
    if !overs.is_finite() || overs <= 0.0 {
        return 0;
    }
    let whole = overs.trunc();
    let balls = ((overs - whole) * 10.0).round();
    whole as u32 * BALLS_PER_OVER + balls as u32
}

/// Ball count to cricket-notation overs. 118 -> `19.4`.
pub fn balls_to_overs(balls: u32) -> f64 {
    f64::from(balls / BALLS_PER_OVER) + f64::from(balls % BALLS_PER_OVER) / 10.0
}

/// Cricket-notation overs to true (fractional) overs. `18.2` -> 18.333...
pub fn overs_to_decimal(overs: f64) -> f64 {
    f64::from(overs_to_balls(overs)) / f64::from(BALLS_PER_OVER)
}

/// Score as typed in by the scorer, before it is validated against the match settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub runs: i64,
    pub wickets: i64,
    /// Cricket notation.
    pub overs: f64,
}

impl ScoreInput {
    pub fn new(runs: i64, wickets: i64, overs: f64) -> Self {
        Self { runs, wickets, overs }
    }
}

/// One team's completed innings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsScore {
    pub team_name: String,
    pub runs: u32,
    pub wickets: u32,
    /// Cricket notation.
    pub overs: f64,
    pub balls_faced: u32,
    pub is_all_out: bool,
    /// Runs per true over.
    pub run_rate: f64,
}

impl InningsScore {
    /// Build an innings; all-out is `wickets >= max_wickets`.
    pub fn new(team_name: impl Into<String>, runs: u32, wickets: u32, overs: f64, max_wickets: u32) -> Self {
        let true_overs = overs_to_decimal(overs);
        Self {
            team_name: team_name.into(),
            runs,
            wickets,
            overs,
            balls_faced: overs_to_balls(overs),
            is_all_out: wickets >= max_wickets,
            run_rate: if true_overs > 0.0 { f64::from(runs) / true_overs } else { 0.0 },
        }
    }

    /// True overs faced, for rate arithmetic.
    pub fn decimal_overs(&self) -> f64 {
        overs_to_decimal(self.overs)
    }
}

/// Unit of a winning margin.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarginType {
    #[default]
    Runs,
    Wickets,
}

/// Whether the result came from the round robin or the playoffs.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchType {
    #[default]
    RoundRobin,
    Playoff,
}

/// Outcome of a finalized match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CricketMatchResult {
    /// None for a draw or no result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loser: Option<String>,
    #[serde(default)]
    pub is_draw: bool,
    #[serde(default)]
    pub is_no_result: bool,
    pub team1_innings: InningsScore,
    pub team2_innings: InningsScore,
    pub margin_type: MarginType,
    pub margin: u32,
    pub match_type: MatchType,
}

impl CricketMatchResult {
    /// e.g. "India won by 12 runs", "Match drawn".
    pub fn summary(&self) -> String {
        if self.is_no_result {
            return "No result".to_string();
        }
        match &self.winner {
            Some(w) => {
                let unit = match (self.margin_type, self.margin) {
                    (MarginType::Runs, 1) => "run",
                    (MarginType::Runs, _) => "runs",
                    (MarginType::Wickets, 1) => "wicket",
                    (MarginType::Wickets, _) => "wickets",
                };
                format!("{} won by {} {}", w, self.margin, unit)
            }
            None => "Match drawn".to_string(),
        }
    }
}
