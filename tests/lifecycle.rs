//! Integration tests for a single match: toss, innings, finalization, cancellation.

use cricket_tournament_web::logic::lifecycle::{decide_result, match_state};
use cricket_tournament_web::{
    apply, complete_match, Command, InningsScore, MarginType, MatchState, MatchStatus, ScoreInput,
    TossDecision, TournamentError, TournamentState,
};
use cricket_tournament_web::models::MatchType;

fn generated(names: &[&str]) -> TournamentState {
    let mut state = TournamentState::new();
    for name in names {
        state = apply(&state, Command::AddTeam { name: name.to_string() }).unwrap();
    }
    apply(&state, Command::GenerateMatches).unwrap()
}

fn state_of(state: &TournamentState, id: &str) -> MatchState {
    match_state(state.find_match(id).unwrap())
}

fn start(state: &TournamentState, id: &str) -> TournamentState {
    apply(state, Command::StartMatch { match_id: id.to_string() }).unwrap()
}

fn toss(state: &TournamentState, id: &str, winner: &str, decision: TossDecision) -> Result<TournamentState, TournamentError> {
    apply(
        state,
        Command::SetToss {
            match_id: id.to_string(),
            toss_winner: winner.to_string(),
            decision,
        },
    )
}

fn innings(state: &TournamentState, id: &str, team: &str, score: ScoreInput) -> Result<TournamentState, TournamentError> {
    apply(
        state,
        Command::RecordInnings {
            match_id: id.to_string(),
            team: team.to_string(),
            score,
        },
    )
}

#[test]
fn full_match_walks_through_every_state() {
    let state = generated(&["Alpha", "Beta"]);
    assert_eq!(state_of(&state, "RR-001"), MatchState::NotStarted);

    let state = start(&state, "RR-001");
    assert_eq!(state_of(&state, "RR-001"), MatchState::InProgressNeedToss);

    // Beta wins the toss and bowls: Alpha bats first.
    let state = toss(&state, "RR-001", "Beta", TossDecision::Bowl).unwrap();
    assert_eq!(state_of(&state, "RR-001"), MatchState::FirstInningsReady);
    let t = state.find_match("RR-001").unwrap().toss.clone().unwrap();
    assert_eq!(t.toss_winner, "Beta");
    assert_eq!(t.toss_loser, "Alpha");

    assert!(matches!(
        innings(&state, "RR-001", "Beta", ScoreInput::new(10, 0, 1.0)),
        Err(TournamentError::InvalidTransition { .. })
    ));

    let state = innings(&state, "RR-001", "Alpha", ScoreInput::new(150, 6, 20.0)).unwrap();
    assert_eq!(state_of(&state, "RR-001"), MatchState::FirstInningsComplete);

    let state = apply(&state, Command::StartSecondInnings { match_id: "RR-001".into() }).unwrap();
    assert_eq!(state_of(&state, "RR-001"), MatchState::SecondInningsReady);

    let state = innings(&state, "RR-001", "Beta", ScoreInput::new(151, 4, 18.3)).unwrap();
    assert_eq!(state_of(&state, "RR-001"), MatchState::ReadyToFinish);

    let (state, next) = complete_match(&state, "RR-001").unwrap();
    assert_eq!(next, None);
    let m = state.find_match("RR-001").unwrap();
    assert_eq!(m.status, MatchStatus::Completed);
    let result = m.result.as_ref().unwrap();
    assert_eq!(result.winner.as_deref(), Some("Beta"));
    assert_eq!(result.margin_type, MarginType::Wickets);
    assert_eq!(result.margin, 6);
    assert_eq!(result.summary(), "Beta won by 6 wickets");
    assert_eq!(m.team2_innings.as_ref().unwrap().balls_faced, 111);
}

#[test]
fn toss_only_once_and_only_after_start() {
    let state = generated(&["Alpha", "Beta"]);
    assert!(matches!(
        toss(&state, "RR-001", "Alpha", TossDecision::Bat),
        Err(TournamentError::InvalidTransition { state: MatchState::NotStarted, .. })
    ));

    let state = start(&state, "RR-001");
    assert!(matches!(
        toss(&state, "RR-001", "Gamma", TossDecision::Bat),
        Err(TournamentError::TeamNotFound(_))
    ));

    let state = toss(&state, "RR-001", "Alpha", TossDecision::Bat).unwrap();
    assert!(matches!(
        toss(&state, "RR-001", "Beta", TossDecision::Bowl),
        Err(TournamentError::TossAlreadySet(_))
    ));
}

#[test]
fn innings_is_never_overwritten() {
    let state = generated(&["Alpha", "Beta"]);
    let state = start(&state, "RR-001");
    let state = toss(&state, "RR-001", "Alpha", TossDecision::Bat).unwrap();
    let state = innings(&state, "RR-001", "Alpha", ScoreInput::new(120, 3, 20.0)).unwrap();
    assert!(matches!(
        innings(&state, "RR-001", "Alpha", ScoreInput::new(200, 3, 20.0)),
        Err(TournamentError::InningsAlreadyRecorded { .. })
    ));
}

#[test]
fn completing_early_is_rejected() {
    let state = generated(&["Alpha", "Beta"]);
    let state = start(&state, "RR-001");
    assert!(matches!(
        complete_match(&state, "RR-001"),
        Err(TournamentError::InvalidTransition { state: MatchState::InProgressNeedToss, .. })
    ));
    assert!(matches!(
        complete_match(&state, "RR-999"),
        Err(TournamentError::MatchNotFound(_))
    ));
}

#[test]
fn score_outside_match_settings_is_rejected() {
    let state = generated(&["Alpha", "Beta"]);
    let state = start(&state, "RR-001");
    let state = toss(&state, "RR-001", "Alpha", TossDecision::Bat).unwrap();
    match innings(&state, "RR-001", "Alpha", ScoreInput::new(-1, 11, 20.1)) {
        Err(TournamentError::Validation(errors)) => {
            assert!(errors.contains(&"Runs cannot be negative".to_string()));
            assert!(errors.contains(&"Wickets cannot exceed 10".to_string()));
            assert!(errors.contains(&"Overs cannot exceed 20".to_string()));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn simulate_rejects_bad_scores_with_team_prefix() {
    let state = generated(&["Alpha", "Beta"]);
    let result = apply(
        &state,
        Command::SimulateMatchResult {
            match_id: "RR-001".into(),
            team1_score: ScoreInput::new(100, 2, 20.0),
            team2_score: ScoreInput::new(100, 2, 12.6),
        },
    );
    match result {
        Err(TournamentError::Validation(errors)) => {
            assert_eq!(errors, vec!["Beta: Balls in an over must be between 0 and 5".to_string()]);
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn cancel_round_robin_only() {
    let state = generated(&["Alpha", "Beta", "Gamma"]);
    let state = apply(&state, Command::CancelMatch { match_id: "RR-001".into() }).unwrap();
    assert_eq!(state_of(&state, "RR-001"), MatchState::Cancelled);
    assert!(matches!(
        apply(&state, Command::CancelMatch { match_id: "RR-001".into() }),
        Err(TournamentError::InvalidTransition { state: MatchState::Cancelled, .. })
    ));
    assert!(matches!(
        apply(&state, Command::CancelMatch { match_id: "F-001".into() }),
        Err(TournamentError::Validation(_))
    ));
}

#[test]
fn playoff_with_tbd_cannot_start() {
    let state = generated(&["Alpha", "Beta", "Gamma"]);
    assert!(matches!(
        apply(&state, Command::StartMatch { match_id: "F-001".into() }),
        Err(TournamentError::TeamsNotResolved(_))
    ));
}

#[test]
fn result_rules() {
    let a = InningsScore::new("A", 160, 7, 20.0, 10);
    let b = InningsScore::new("B", 148, 10, 19.2, 10);
    let r = decide_result("A", "B", a.clone(), b.clone(), MatchType::RoundRobin);
    assert_eq!(r.winner.as_deref(), Some("A"));
    assert_eq!(r.loser.as_deref(), Some("B"));
    assert_eq!((r.margin_type, r.margin), (MarginType::Runs, 12));
    assert!(b.is_all_out);

    let tie = decide_result("A", "B", a.clone(), InningsScore::new("B", 160, 2, 20.0, 10), MatchType::Playoff);
    assert!(tie.is_draw);
    assert_eq!(tie.winner, None);
    assert_eq!(tie.summary(), "Match drawn");
    assert_eq!(tie.match_type, MatchType::Playoff);

    // Margin uses ten wickets regardless of the match setting.
    let chase = decide_result(
        "A",
        "B",
        InningsScore::new("A", 90, 5, 10.0, 6),
        InningsScore::new("B", 91, 2, 9.1, 6),
        MatchType::RoundRobin,
    );
    assert_eq!((chase.margin_type, chase.margin), (MarginType::Wickets, 8));
}

#[test]
fn runs_beyond_an_innings_limit_are_rejected() {
    let state = generated(&["Alpha", "Beta"]);
    let huge = ScoreInput::new(5_000_000_000, 2, 20.0);
    match apply(
        &state,
        Command::SimulateMatchResult {
            match_id: "RR-001".into(),
            team1_score: huge,
            team2_score: ScoreInput::new(120, 4, 20.0),
        },
    ) {
        Err(TournamentError::Validation(errors)) => {
            assert_eq!(errors, vec!["Alpha: Runs cannot exceed 9999".to_string()]);
        }
        other => panic!("expected validation errors, got {other:?}"),
    }

    let state = start(&state, "RR-001");
    let state = toss(&state, "RR-001", "Alpha", TossDecision::Bat).unwrap();
    assert!(matches!(
        innings(&state, "RR-001", "Alpha", ScoreInput::new(10_000, 2, 20.0)),
        Err(TournamentError::Validation(_))
    ));
    let state = innings(&state, "RR-001", "Alpha", ScoreInput::new(9_999, 2, 20.0)).unwrap();
    assert_eq!(state.find_match("RR-001").unwrap().team1_innings.as_ref().unwrap().runs, 9_999);
}

#[test]
fn overs_need_a_single_ball_digit() {
    let state = generated(&["Alpha", "Beta"]);
    let state = start(&state, "RR-001");
    let state = toss(&state, "RR-001", "Alpha", TossDecision::Bat).unwrap();
    match innings(&state, "RR-001", "Alpha", ScoreInput::new(140, 3, 19.54)) {
        Err(TournamentError::Validation(errors)) => {
            assert_eq!(errors, vec!["Overs can have at most one decimal place".to_string()]);
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
    let state = innings(&state, "RR-001", "Alpha", ScoreInput::new(140, 3, 18.2)).unwrap();
    assert_eq!(state.find_match("RR-001").unwrap().team1_innings.as_ref().unwrap().balls_faced, 110);
}
