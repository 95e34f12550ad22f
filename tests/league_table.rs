use std::path::PathBuf;

use results_digest::dataset::{TextEncoding, load_records};
use results_digest::football::{MatchFieldMap, MatchRecord, OutcomeKind, parse_match_line};
use results_digest::league::{League, LeagueKey, LeagueOrdering, season_summaries, team_outcomes};
use results_digest::line_parser::LineOutcome;
use results_digest::ranking::SortDirection;
use results_digest::report::render_league_table;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn fixture_matches() -> Vec<MatchRecord> {
    let map = MatchFieldMap::default();
    load_records(
        &fixture_path("premier_league_sample.csv"),
        TextEncoding::Latin1,
        |line| parse_match_line(line, &map),
    )
    .expect("fixture should load")
    .records
}

fn matches(rows: &[&str]) -> Vec<MatchRecord> {
    rows.iter()
        .map(|row| match parse_match_line(row, &MatchFieldMap::default()) {
            LineOutcome::Record(m) => m,
            other => panic!("unexpected {other:?} for {row}"),
        })
        .collect()
}

fn team_order(league: &League) -> Vec<&str> {
    league
        .positions()
        .iter()
        .map(|p| p.item.team.as_str())
        .collect()
}

#[test]
fn two_match_example_ranks_winners_first() {
    let ms = matches(&[
        "E0,13/08/16,Burnley,Swansea,0,1,A,0,0,D",
        "E0,13/08/16,Crystal Palace,West Brom,0,1,A,0,0,D",
    ]);
    let league = League::from_matches("EPL", &ms, &LeagueOrdering::default());
    assert_eq!(
        team_order(&league),
        vec!["Swansea", "West Brom", "Burnley", "Crystal Palace"]
    );
    let swansea = &league.positions()[0].item;
    assert_eq!((swansea.played, swansea.points, swansea.goal_difference()), (1, 3, 1));
    let burnley = &league.positions()[2].item;
    assert_eq!((burnley.points, burnley.goal_difference()), (0, -1));
}

#[test]
fn every_match_yields_two_complementary_outcomes() {
    let ms = fixture_matches();
    let outcomes = team_outcomes(&ms);
    assert_eq!(outcomes.len(), ms.len() * 2);
    for pair in outcomes.chunks(2) {
        let (home, away) = (&pair[0], &pair[1]);
        assert!(home.home && !away.home);
        assert_eq!(home.goals_for, away.goals_against);
        let expected = match home.outcome {
            OutcomeKind::Win => OutcomeKind::Lose,
            OutcomeKind::Lose => OutcomeKind::Win,
            OutcomeKind::Draw => OutcomeKind::Draw,
        };
        assert_eq!(away.outcome, expected);
    }
}

#[test]
fn summaries_are_internally_consistent() {
    for s in season_summaries(&fixture_matches()) {
        assert_eq!(s.points, 3 * s.wins + s.draws, "{}", s.team);
        assert_eq!(s.played, s.wins + s.draws + s.losses, "{}", s.team);
    }
}

#[test]
fn fixture_season_table() {
    let league = League::from_matches("EPL", &fixture_matches(), &LeagueOrdering::default());
    assert_eq!(
        team_order(&league),
        vec!["Swansea", "West Brom", "Burnley", "Crystal Palace"]
    );
    let ranks: Vec<_> = league.positions().iter().map(|p| p.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);

    let west_brom = league.position_of("west brom").expect("team in table");
    assert_eq!(west_brom.rank, 2);
    assert_eq!(west_brom.item.points, 9);
    assert_eq!(west_brom.item.goal_difference(), 4);

    let stats = league.points_stats().expect("table is not empty");
    assert_eq!((stats.count, stats.sum, stats.min, stats.max), (4, 32, 5, 11));
    assert!((stats.average - 8.0).abs() < 1e-9);
}

#[test]
fn bottom_is_tail_of_full_table() {
    let league = League::from_matches("EPL", &fixture_matches(), &LeagueOrdering::default());
    let full = league.positions();
    for n in 0..=6 {
        let bottom = league.bottom(n);
        let start = full.len().saturating_sub(n);
        assert_eq!(bottom, &full[start..]);
    }
    let bottom_two: Vec<_> = league.bottom(2).iter().map(|p| p.item.team.as_str()).collect();
    assert_eq!(bottom_two, vec!["Burnley", "Crystal Palace"]);
    assert_eq!(league.top(1)[0].item.team, "Swansea");
}

#[test]
fn substitute_ordering_changes_table() {
    let ordering = LeagueOrdering {
        keys: vec![
            (LeagueKey::GoalDifference, SortDirection::Descending),
            (LeagueKey::Points, SortDirection::Descending),
        ],
    };
    let league = League::from_matches("EPL", &fixture_matches(), &ordering);
    assert_eq!(league.positions()[0].item.team, "West Brom");
}

#[test]
fn rendered_table_has_header_and_fixed_width_rows() {
    let league = League::from_matches("EPL", &fixture_matches(), &LeagueOrdering::default());
    let lines = render_league_table(league.positions());
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        format!("Pos {:<20} {:>10} {:>10} {:>10}", "Team", "Played", "Goal diff", "Points")
    );
    assert_eq!(
        lines[1],
        format!("  1 {:<20} {:>10} {:>10} {:>10}", "Swansea", 6, -1, 11)
    );
    assert!(lines.iter().all(|l| l.chars().count() == lines[0].chars().count()));
}
