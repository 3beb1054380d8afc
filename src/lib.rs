//! Cricket tournament planner: library with models and the tournament engine.
//!
//! State is a plain [`TournamentState`] value owned by the caller; every change goes through
//! [`apply`] with a [`Command`] and yields a new state.

pub mod export;
pub mod logic;
pub mod models;
pub mod persistence;

pub use logic::{
    apply, complete_match, format_nrr, generate_matches, generate_sample_results, is_tournament_complete,
    next_match_id, playoff_status, simulate_match_result, team_standings, tournament_winner, Command,
    NextAction, PlayoffStatus,
};
pub use models::{
    ActionOutcome, CricketMatch, CricketMatchResult, CricketTeamStats, InningsScore, MarginType, MatchId,
    MatchState, MatchStatus, PlayoffFormat, PlayoffType, ScoreInput, Slot, TossDecision, TossResult,
    TournamentError, TournamentPhase, TournamentState, TBD,
};
