//! Integration tests for the playoff bracket: shape, seeding and advancement.

use cricket_tournament_web::logic::bracket::{bracket_layout, generate_playoff_matches, qualifier_count};
use cricket_tournament_web::logic::resolver::{
    has_resolvable_tbd_teams, is_round_robin_complete, propagate_playoff_results, resolve_playoffs,
};
use cricket_tournament_web::{
    apply, simulate_match_result, ActionOutcome, Command, PlayoffFormat, PlayoffType, ScoreInput,
    TournamentError, TournamentPhase, TournamentState, TBD,
};

fn generated(names: &[&str], format: PlayoffFormat) -> TournamentState {
    let mut state = apply(&TournamentState::new(), Command::SetPlayoffFormat { format }).unwrap();
    for name in names {
        state = apply(&state, Command::AddTeam { name: name.to_string() }).unwrap();
    }
    apply(&state, Command::GenerateMatches).unwrap()
}

/// Play `id` so that `winner` wins by 40 runs or 6 wickets.
fn play(state: &TournamentState, id: &str, winner: &str) -> TournamentState {
    let m = state.find_match(id).unwrap();
    let (win, lose) = (ScoreInput::new(160, 4, 20.0), ScoreInput::new(120, 9, 20.0));
    let (s1, s2) = if m.team1 == winner { (win, lose) } else { (lose, win) };
    simulate_match_result(state, id, s1, s2).unwrap()
}

/// Play the whole round robin; the team listed earlier in `strength` always wins.
fn play_round_robin(mut state: TournamentState, strength: &[&str]) -> TournamentState {
    let ids: Vec<(String, String, String)> = state
        .round_robin_matches()
        .map(|m| (m.id.clone(), m.team1.clone(), m.team2.clone()))
        .collect();
    for (id, t1, t2) in ids {
        let rank = |t: &str| strength.iter().position(|s| *s == t).unwrap();
        let winner = if rank(t1.as_str()) < rank(t2.as_str()) { t1 } else { t2 };
        state = play(&state, &id, &winner);
    }
    state
}

fn teams_of(state: &TournamentState, t: PlayoffType) -> (String, String) {
    let m = state.playoff_match(t).unwrap();
    (m.team1.clone(), m.team2.clone())
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

#[test]
fn bracket_shapes() {
    assert!(bracket_layout(2, PlayoffFormat::WorldCup).is_empty());
    assert_eq!(bracket_layout(3, PlayoffFormat::League), vec![(PlayoffType::Final, 1)]);
    assert_eq!(
        bracket_layout(8, PlayoffFormat::WorldCup),
        vec![(PlayoffType::SemiFinal1, 1), (PlayoffType::SemiFinal2, 1), (PlayoffType::Final, 2)]
    );
    assert_eq!(
        bracket_layout(4, PlayoffFormat::League),
        vec![
            (PlayoffType::Qualifier1, 1),
            (PlayoffType::Eliminator, 1),
            (PlayoffType::Qualifier2, 2),
            (PlayoffType::Final, 3),
        ]
    );
    assert_eq!((qualifier_count(2), qualifier_count(3), qualifier_count(12)), (0, 2, 4));

    assert!(matches!(
        generate_playoff_matches(2, PlayoffFormat::WorldCup, 20, 10),
        Err(TournamentError::NotEnoughTeamsForPlayoffs)
    ));
    let ids: Vec<String> = generate_playoff_matches(6, PlayoffFormat::League, 20, 10)
        .unwrap()
        .into_iter()
        .inspect(|m| assert!(m.is_playoff && m.team1 == TBD && m.team2 == TBD))
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec!["Q1-001", "E-001", "Q2-001", "F-001"]);
}

#[test]
fn generated_bracket_follows_round_robin() {
    let state = generated(&["A", "B", "C", "D", "E"], PlayoffFormat::WorldCup);
    assert_eq!(state.matches.len(), 10 + 3);
    assert!(state.matches[..10].iter().all(|m| !m.is_playoff));
    assert!(state.matches[10..].iter().all(|m| m.is_playoff && !m.teams_resolved()));
}

#[test]
fn world_cup_seeds_one_v_four_and_two_v_three() {
    let state = generated(&["A", "B", "C", "D"], PlayoffFormat::WorldCup);
    let state = play_round_robin(state, &["A", "B", "C", "D"]);
    assert!(is_round_robin_complete(&state));
    assert_eq!(state.phase, TournamentPhase::Playoffs);
    assert_eq!(state.qualified_teams, vec!["A", "B", "C", "D"]);
    assert_eq!(teams_of(&state, PlayoffType::SemiFinal1), pair("A", "D"));
    assert_eq!(teams_of(&state, PlayoffType::SemiFinal2), pair("B", "C"));
    assert_eq!(teams_of(&state, PlayoffType::Final), pair(TBD, TBD));

    let state = play(&state, "SF-002", "C");
    assert_eq!(teams_of(&state, PlayoffType::Final), pair(TBD, "C"));
    let state = play(&state, "SF-001", "A");
    assert_eq!(teams_of(&state, PlayoffType::Final), pair("A", "C"));

    let state = play(&state, "F-001", "C");
    assert_eq!(state.phase, TournamentPhase::Completed);
    assert_eq!(cricket_tournament_web::tournament_winner(&state).as_deref(), Some("C"));
}

#[test]
fn league_sends_qualifier_one_loser_to_qualifier_two() {
    let state = generated(&["A", "B", "C", "D", "E"], PlayoffFormat::League);
    let state = play_round_robin(state, &["A", "B", "C", "D", "E"]);
    assert_eq!(state.qualified_teams, vec!["A", "B", "C", "D"]);
    assert_eq!(teams_of(&state, PlayoffType::Qualifier1), pair("A", "B"));
    assert_eq!(teams_of(&state, PlayoffType::Eliminator), pair("C", "D"));

    let state = play(&state, "Q1-001", "B");
    assert_eq!(teams_of(&state, PlayoffType::Final), pair("B", TBD));
    assert_eq!(teams_of(&state, PlayoffType::Qualifier2), pair("A", TBD));

    let state = play(&state, "E-001", "C");
    assert_eq!(teams_of(&state, PlayoffType::Qualifier2), pair("A", "C"));

    let state = play(&state, "Q2-001", "A");
    assert_eq!(teams_of(&state, PlayoffType::Final), pair("B", "A"));
    assert_eq!(state.phase, TournamentPhase::Playoffs);
}

#[test]
fn three_teams_go_straight_to_the_final() {
    let state = generated(&["A", "B", "C"], PlayoffFormat::League);
    assert_eq!(state.playoff_matches().count(), 1);
    let state = play_round_robin(state, &["C", "A", "B"]);
    assert_eq!(state.qualified_teams, vec!["C", "A"]);
    assert_eq!(teams_of(&state, PlayoffType::Final), pair("C", "A"));
}

#[test]
fn resolving_twice_changes_nothing() {
    let state = generated(&["A", "B", "C", "D"], PlayoffFormat::WorldCup);
    let state = play_round_robin(state, &["D", "C", "B", "A"]);
    let state = play(&state, "SF-001", "D");

    let outcome = resolve_playoffs(&state);
    assert!(!outcome.success);
    assert!(outcome.updates.is_empty());
    assert_eq!(outcome.updated_matches, state.matches);
    assert!(!has_resolvable_tbd_teams(&state));
    assert_eq!(propagate_playoff_results(&state).updated_matches, state.matches);

    let result = apply(&state, Command::ResolvePlayoffs);
    assert!(matches!(result, Err(TournamentError::NothingToResolve)));
    assert_eq!(ActionOutcome::from_result(&result), ActionOutcome { success: false, errors: None });
}

#[test]
fn resolve_waits_for_round_robin() {
    let state = generated(&["A", "B", "C", "D"], PlayoffFormat::WorldCup);
    let state = play(&state, "RR-001", &state.matches[0].team1.clone());
    let result = apply(&state, Command::ResolvePlayoffs);
    assert!(matches!(result, Err(TournamentError::RoundRobinIncomplete)));
    assert!(result.unwrap_err().is_precondition());
    assert!(state.playoff_matches().all(|m| m.team1 == TBD && m.team2 == TBD));
}

#[test]
fn resolve_fills_a_hand_edited_bracket() {
    let state = generated(&["A", "B", "C", "D"], PlayoffFormat::WorldCup);
    let mut state = play_round_robin(state, &["A", "B", "C", "D"]);
    // A restored snapshot can hold a complete round robin with the bracket still empty.
    for m in state.matches.iter_mut().filter(|m| m.is_playoff) {
        m.team1 = TBD.to_string();
        m.team2 = TBD.to_string();
    }
    let state = apply(&state, Command::ResolvePlayoffs).unwrap();
    assert_eq!(teams_of(&state, PlayoffType::SemiFinal1), pair("A", "D"));
    assert_eq!(teams_of(&state, PlayoffType::SemiFinal2), pair("B", "C"));
}

#[test]
fn cancelled_round_robin_match_still_completes_the_stage() {
    let state = generated(&["A", "B", "C"], PlayoffFormat::WorldCup);
    let state = apply(&state, Command::CancelMatch { match_id: "RR-001".into() }).unwrap();
    let state = play(&state, "RR-002", "A");
    let state = play(&state, "RR-003", "A");
    assert!(is_round_robin_complete(&state));
    let (t1, t2) = teams_of(&state, PlayoffType::Final);
    assert_eq!(t1, "A");
    assert_ne!(t2, TBD);
}

#[test]
fn completed_semi_final_with_empty_final_slot_is_resolvable() {
    let state = generated(&["A", "B", "C", "D"], PlayoffFormat::WorldCup);
    let state = play_round_robin(state, &["A", "B", "C", "D"]);
    let mut state = play(&state, "SF-001", "D");
    assert_eq!(teams_of(&state, PlayoffType::Final), pair("D", TBD));

    // Clear the slot the semi-final fed, as an older snapshot would hold it.
    if let Some(f) = state.matches.iter_mut().find(|m| m.id == "F-001") {
        f.team1 = TBD.to_string();
    }
    assert!(has_resolvable_tbd_teams(&state));

    let outcome = propagate_playoff_results(&state);
    assert!(outcome.success);
    assert_eq!(outcome.updates.len(), 1);
    assert_eq!(outcome.updates[0].match_id, "F-001");
    assert_eq!(outcome.updates[0].team, "D");

    let state = apply(&state, Command::ResolvePlayoffs).unwrap();
    assert_eq!(teams_of(&state, PlayoffType::Final), pair("D", TBD));
    assert!(!has_resolvable_tbd_teams(&state));
}
