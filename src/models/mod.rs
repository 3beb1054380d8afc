//! Data structures for the cricket tournament: matches, innings, results, statistics, tournament state.

mod cricket_match;
mod innings;
mod stats;
mod tournament;

pub use cricket_match::{
    CricketMatch, MatchId, MatchState, MatchStatus, PlayoffType, Slot, TossDecision, TossResult,
    TournamentPhase, TBD,
};
pub use innings::{
    balls_to_overs, overs_to_balls, overs_to_decimal, CricketMatchResult, InningsScore, MarginType,
    MatchType, ScoreInput, BALLS_PER_OVER,
};
pub use stats::{CricketTeamStats, WinMargin};
pub use tournament::{
    validate_settings, ActionOutcome, PlayoffFormat, TournamentError, TournamentState,
    DEFAULT_MAX_OVERS, DEFAULT_MAX_WICKETS, MAX_OVERS, MAX_TEAMS, MAX_TEAM_NAME_LEN, MAX_WICKETS,
    MIN_OVERS, MIN_TEAMS, MIN_WICKETS,
};
