use std::path::PathBuf;

use results_digest::dataset::{TextEncoding, load_records};
use results_digest::election::{CandidateFieldMap, parse_candidate_line};
use results_digest::error::DigestError;
use results_digest::football::{MatchFieldMap, SeasonOverview, TeamRecord, parse_match_line};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loads_premier_league_fixture() {
    let map = MatchFieldMap::default();
    let parsed = load_records(
        &fixture_path("premier_league_sample.csv"),
        TextEncoding::Latin1,
        |line| parse_match_line(line, &map),
    )
    .expect("fixture should load");

    assert_eq!(parsed.records.len(), 12);
    assert_eq!(parsed.skipped, 2);
    assert_eq!(parsed.diagnostics.len(), 2);
    assert_eq!(parsed.lines_seen(), 16);
    assert_eq!(parsed.diagnostics[0].line_no, 15);
    assert!(parsed.diagnostics[0].reason.contains("home score"));
    assert!(parsed.diagnostics[1].reason.contains("insufficient fields"));

    let first = &parsed.records[0];
    assert_eq!(first.home_team, "Burnley");
    assert_eq!(first.away_team, "Swansea");
    assert_eq!(first.match_score(), "0-1");
}

#[test]
fn season_overview_from_fixture() {
    let map = MatchFieldMap::default();
    let matches = load_records(
        &fixture_path("premier_league_sample.csv"),
        TextEncoding::Latin1,
        |line| parse_match_line(line, &map),
    )
    .expect("fixture should load")
    .records;

    let overview = SeasonOverview::from_matches(&matches);
    assert_eq!(overview.matches, 12);
    assert_eq!((overview.home_teams, overview.away_teams), (4, 4));
    assert_eq!((overview.home_goals, overview.away_goals), (15, 10));
    assert_eq!(overview.average_score(), (1.25, 0.83));
    assert_eq!(
        (overview.home_wins, overview.away_wins, overview.draws),
        (4, 4, 4)
    );
    assert_eq!(overview.home_goal_frequency.get(&0), Some(&4));
    assert_eq!(overview.home_goal_frequency.get(&4), Some(&1));
    assert_eq!(overview.score_frequency.get(&(0, 0)), Some(&2));
    assert_eq!(
        overview.first_date.map(|d| d.to_string()).as_deref(),
        Some("2016-08-13")
    );

    let burnley = TeamRecord::for_team(&matches, "BURNLEY");
    assert_eq!(
        (burnley.home_wins, burnley.away_wins, burnley.draws),
        (1, 1, 1)
    );
}

#[test]
fn loads_latin1_election_fixture() {
    let map = CandidateFieldMap::default();
    let parsed = load_records(
        &fixture_path("general_election_sample.csv"),
        TextEncoding::Latin1,
        |line| parse_candidate_line(line, &map),
    )
    .expect("fixture should load");

    assert_eq!(parsed.records.len(), 16);
    assert_eq!(parsed.skipped, 3);
    assert_eq!(parsed.diagnostics.len(), 2);
    assert!(parsed.diagnostics[0].reason.contains("vote count"));
    assert!(parsed.diagnostics[1].reason.contains("more than one quoted field"));

    let sinn_fein = parsed
        .records
        .iter()
        .find(|c| c.surname == "Ó MUILLEOIR")
        .expect("accented surname should decode");
    assert_eq!(sinn_fein.party_identifier, "Sinn Féin");
    assert_eq!(sinn_fein.first_name, "Máirtín");

    let quoted = parsed
        .records
        .iter()
        .find(|c| c.constituency == "Aberdeen South" && c.votes == 18746)
        .expect("quoted row should be recovered");
    assert_eq!(quoted.surname, "\"THOMSON, Jr\"");
    assert_eq!(quoted.first_name, "Ross");
}

#[test]
fn utf8_decoding_of_latin1_file_is_a_file_error() {
    let map = CandidateFieldMap::default();
    let err = load_records(
        &fixture_path("general_election_sample.csv"),
        TextEncoding::Utf8,
        |line| parse_candidate_line(line, &map),
    )
    .unwrap_err();
    assert!(matches!(err, DigestError::FileAccess { .. }));
}

#[test]
fn missing_file_is_a_file_error() {
    let map = MatchFieldMap::default();
    let err = load_records(
        &fixture_path("no_such_results.csv"),
        TextEncoding::Latin1,
        |line| parse_match_line(line, &map),
    )
    .unwrap_err();
    match err {
        DigestError::FileAccess { path, .. } => {
            assert!(path.ends_with("no_such_results.csv"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn diagnostics_convert_to_malformed_line_errors() {
    let map = MatchFieldMap::default();
    let parsed = load_records(
        &fixture_path("premier_league_sample.csv"),
        TextEncoding::Latin1,
        |line| parse_match_line(line, &map),
    )
    .expect("fixture should load");
    let err = parsed.diagnostics[1].clone().into_error();
    assert!(matches!(err, DigestError::MalformedLine { line_no: 16, .. }));
    assert!(err.to_string().starts_with("line 16:"));
}
