//! Tournament engine: scheduling, match lifecycle, statistics, playoffs, and the reducer.

pub mod bracket;
pub mod lifecycle;
pub mod orchestrator;
pub mod resolver;
pub mod schedule;
pub mod simulation;
pub mod statistics;
pub mod status;

pub use bracket::{generate_playoff_matches, playoff_match_id};
pub use lifecycle::{batting_first, decide_result, match_state, parse_score_input, validate_score};
pub use orchestrator::{apply, complete_match, generate_matches, simulate_match_result, Command};
pub use resolver::{
    has_resolvable_tbd_teams, is_round_robin_complete, propagate_playoff_results, resolve_playoffs,
    seed_playoffs, PlayoffUpdate, ResolutionOutcome,
};
pub use schedule::{generate_round_robin, schedule_summary, validate_teams, ScheduleSummary};
pub use simulation::generate_sample_results;
pub use statistics::{
    format_nrr, get_tournament_standings, initialize_team_stats, update_team_stats_after_match,
};
pub use status::{
    is_tournament_complete, next_match_id, playoff_status, team_standings, tournament_winner,
    NextAction, PlayoffStatus,
};
