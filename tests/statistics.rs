//! Integration tests for team aggregates, Net Run Rate and standings.

use cricket_tournament_web::logic::statistics::{
    compute_team_stats, effective_overs, get_tournament_standings, update_team_stats_after_match,
};
use cricket_tournament_web::models::{balls_to_overs, overs_to_balls, overs_to_decimal, MatchType};
use cricket_tournament_web::logic::lifecycle::decide_result;
use cricket_tournament_web::{
    format_nrr, CricketMatch, CricketTeamStats, InningsScore, MarginType, MatchStatus,
};
use std::collections::BTreeMap;

fn completed(id: &str, t1: &str, t2: &str, i1: InningsScore, i2: InningsScore) -> CricketMatch {
    let mut m = CricketMatch::round_robin(id, t1, t2, 1, 20, 10);
    m.team1_innings = Some(i1.clone());
    m.team2_innings = Some(i2.clone());
    m.result = Some(decide_result(t1, t2, i1, i2, MatchType::RoundRobin));
    m.status = MatchStatus::Completed;
    m
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn nrr_from_full_innings() {
    let m = completed(
        "RR-001",
        "A",
        "B",
        InningsScore::new("A", 150, 6, 20.0, 10),
        InningsScore::new("B", 140, 8, 20.0, 10),
    );
    let stats = compute_team_stats(&names(&["A", "B"]), &[m]);
    let a = &stats["A"];
    assert_eq!(a.batting_run_rate, 7.5);
    assert_eq!(a.bowling_run_rate, 7.0);
    assert!((a.net_run_rate - 0.5).abs() < 1e-9);
    assert_eq!(format_nrr(a.net_run_rate), "+0.500");
    assert_eq!(format_nrr(stats["B"].net_run_rate), "-0.500");

    assert_eq!((a.matches_played, a.matches_won, a.points), (1, 1, 2));
    assert_eq!(stats["B"].matches_lost, 1);
    assert_eq!(stats["B"].points, 0);
    let win = a.biggest_win.as_ref().unwrap();
    assert_eq!((win.margin, win.margin_type, win.opponent.as_str()), (10, MarginType::Runs, "B"));
}

#[test]
fn all_out_side_is_charged_the_full_quota() {
    let all_out = InningsScore::new("A", 100, 10, 18.2, 10);
    assert_eq!(effective_overs(&all_out, 20), 20.0);
    assert_eq!(effective_overs(&InningsScore::new("A", 100, 4, 18.2, 10), 20), 110.0 / 6.0);

    let m = completed("RR-001", "A", "B", all_out, InningsScore::new("B", 101, 3, 15.0, 10));
    let stats = compute_team_stats(&names(&["A", "B"]), &[m]);
    assert_eq!(stats["A"].total_overs_played, 20.0);
    assert_eq!(stats["B"].total_overs_bowled, 20.0);
    assert_eq!(stats["B"].total_overs_played, 15.0);
    assert_eq!(stats["A"].total_balls_faced, 110);
    assert_eq!(stats["B"].biggest_win.as_ref().unwrap().margin_type, MarginType::Wickets);
}

#[test]
fn draw_gives_one_point_each() {
    let m = completed(
        "RR-001",
        "A",
        "B",
        InningsScore::new("A", 130, 5, 20.0, 10),
        InningsScore::new("B", 130, 9, 20.0, 10),
    );
    let stats = compute_team_stats(&names(&["A", "B"]), &[m]);
    for team in ["A", "B"] {
        assert_eq!(stats[team].matches_drawn, 1);
        assert_eq!(stats[team].points, 1);
        assert!(stats[team].biggest_win.is_none());
    }
}

#[test]
fn playoffs_and_unfinished_matches_are_ignored() {
    let mut playoff = completed(
        "F-001",
        "A",
        "B",
        InningsScore::new("A", 200, 1, 20.0, 10),
        InningsScore::new("B", 50, 10, 8.0, 10),
    );
    playoff.is_playoff = true;
    let pending = CricketMatch::round_robin("RR-002", "A", "B", 2, 20, 10);
    let mut cancelled = CricketMatch::round_robin("RR-003", "A", "B", 3, 20, 10);
    cancelled.status = MatchStatus::Cancelled;

    let stats = compute_team_stats(&names(&["A", "B"]), &[playoff.clone(), pending, cancelled]);
    assert_eq!(stats["A"], CricketTeamStats::new("A"));

    let before = CricketTeamStats::new("A");
    let after = update_team_stats_after_match(&before, &playoff, playoff.result.as_ref().unwrap());
    assert_eq!(after, before);
}

#[test]
fn highest_and_lowest_scores_track_across_matches() {
    let m1 = completed(
        "RR-001",
        "A",
        "B",
        InningsScore::new("A", 180, 4, 20.0, 10),
        InningsScore::new("B", 120, 10, 17.0, 10),
    );
    let m2 = completed(
        "RR-002",
        "C",
        "A",
        InningsScore::new("C", 150, 6, 20.0, 10),
        InningsScore::new("A", 99, 10, 16.4, 10),
    );
    let stats = compute_team_stats(&names(&["A", "B", "C"]), &[m1, m2]);
    assert_eq!(stats["A"].highest_score, Some(180));
    assert_eq!(stats["A"].lowest_score, Some(99));
    assert_eq!(stats["A"].matches_played, 2);
    assert_eq!(stats["A"].total_runs_scored, 279);
    assert_eq!(stats["A"].total_runs_conceded, 270);
}

#[test]
fn standings_order_points_then_nrr_then_wins_then_name() {
    let row = |name: &str, points: u32, nrr: f64, won: u32| CricketTeamStats {
        points,
        net_run_rate: nrr,
        matches_won: won,
        ..CricketTeamStats::new(name)
    };
    let mut stats = BTreeMap::new();
    for s in [
        row("Delta", 4, 0.1, 2),
        row("Alpha", 4, 0.9, 2),
        row("Charlie", 6, -1.0, 3),
        row("Bravo", 4, 0.1, 2),
        row("Echo", 4, 0.1, 1),
    ] {
        stats.insert(s.team_name.clone(), s);
    }
    let order: Vec<String> = get_tournament_standings(&stats).into_iter().map(|s| s.team_name).collect();
    assert_eq!(order, names(&["Charlie", "Alpha", "Bravo", "Delta", "Echo"]));
}

#[test]
fn nrr_display() {
    assert_eq!(format_nrr(1.2345), "+1.235");
    assert_eq!(format_nrr(-0.4567), "-0.457");
    assert_eq!(format_nrr(0.0), "0.000");
    assert_eq!(format_nrr(-0.0), "0.000");
    assert_eq!(format_nrr(2.0), "+2.000");
}

#[test]
fn overs_notation() {
    assert_eq!(overs_to_balls(18.2), 110);
    assert_eq!(overs_to_balls(20.0), 120);
    assert_eq!(balls_to_overs(110), 18.2);
    assert!((overs_to_decimal(18.2) - 18.333_333).abs() < 1e-5);
    assert_eq!(overs_to_balls(-3.0), 0);
}

#[test]
fn large_totals_accumulate_without_overflow() {
    let matches: Vec<CricketMatch> = (0..500)
        .map(|i| {
            completed(
                &format!("RR-{i:03}"),
                "A",
                "B",
                InningsScore::new("A", 9_999, 2, 20.0, 10),
                InningsScore::new("B", 9_998, 3, 20.0, 10),
            )
        })
        .collect();
    let stats = compute_team_stats(&names(&["A", "B"]), &matches);
    assert_eq!(stats["A"].total_runs_scored, 4_999_500);
    assert_eq!(stats["B"].total_runs_conceded, 4_999_500);
    assert_eq!(stats["A"].total_balls_faced, 60_000);
}
