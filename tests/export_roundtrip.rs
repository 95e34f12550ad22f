use std::fs;
use std::path::PathBuf;

use results_digest::dataset::{TextEncoding, load_records};
use results_digest::election::{
    CandidateFieldMap, ConstituencySummary, CountryTable, build_constituencies,
    parse_candidate_line,
};
use results_digest::election_export::{CSV_HEADER, PartyAllowList, export_augmented_csv};
use results_digest::error::DigestError;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn fixture_constituencies() -> Vec<ConstituencySummary> {
    let map = CandidateFieldMap::default();
    let records = load_records(
        &fixture_path("general_election_sample.csv"),
        TextEncoding::Latin1,
        |line| parse_candidate_line(line, &map),
    )
    .expect("fixture should load")
    .records;
    build_constituencies(&records, &CountryTable::default())
}

#[test]
fn dump_reparses_to_same_names_and_votes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("extended.csv");
    let constituencies = fixture_constituencies();

    let report = export_augmented_csv(
        &path,
        &constituencies,
        &PartyAllowList::default(),
        TextEncoding::Latin1,
        10_000,
    )
    .expect("export should succeed");
    assert_eq!(report.rows, 16);
    assert!(report.warnings.is_empty());

    let dump_map = CandidateFieldMap::augmented_dump();
    let reparsed = load_records(&path, TextEncoding::Latin1, |line| {
        parse_candidate_line(line, &dump_map)
    })
    .expect("dump should load");
    assert!(reparsed.is_clean(), "{:?}", reparsed.diagnostics);
    assert_eq!(reparsed.skipped, 1);

    let expected: Vec<_> = constituencies
        .iter()
        .flat_map(|c| c.candidates.iter())
        .map(|c| (c.constituency.clone(), c.surname.clone(), c.first_name.clone(), c.votes))
        .collect();
    let actual: Vec<_> = reparsed
        .records
        .iter()
        .map(|c| (c.constituency.clone(), c.surname.clone(), c.first_name.clone(), c.votes))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn dump_rows_carry_augmented_columns() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("extended.csv");
    export_augmented_csv(
        &path,
        &fixture_constituencies(),
        &PartyAllowList::default(),
        TextEncoding::Latin1,
        10_000,
    )
    .expect("export should succeed");

    let bytes = fs::read(&path).expect("dump written");
    let text = TextEncoding::Latin1.decode(&bytes).expect("latin-1 always decodes");
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], CSV_HEADER.join(","));
    assert_eq!(
        lines[1],
        "E14000530,7,Aldershot,SMITH,Gerald,Labour,1796,1,Winner,0.622,706,2,Labour,England"
    );
    assert_eq!(
        lines[2],
        "E14000530,7,Aldershot,WALLACE,Donna Maria,Green Party,1090,2,Loser,0.378,0,2,Green,England"
    );
    assert!(lines.iter().any(|l| l.contains("\"THOMSON, Jr\"")));
    assert!(lines.iter().any(|l| l.contains("Sinn Féin,7143,4,Loser")));
    let loony = lines
        .iter()
        .find(|l| l.contains("HOPE"))
        .expect("minor party row");
    assert!(loony.ends_with(",Other,Scotland"));
    assert!(bytes.contains(&0xe9), "written as latin-1");
}

#[test]
fn row_limit_truncates_dump() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("extended.csv");
    let report = export_augmented_csv(
        &path,
        &fixture_constituencies(),
        &PartyAllowList::default(),
        TextEncoding::Utf8,
        3,
    )
    .expect("export should succeed");
    assert_eq!(report.rows, 3);
    let text = fs::read_to_string(&path).expect("utf-8 dump");
    assert_eq!(text.lines().count(), 4);
}

#[test]
fn missing_output_folder_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("output").join("extended.csv");
    let err = export_augmented_csv(
        &path,
        &fixture_constituencies(),
        &PartyAllowList::default(),
        TextEncoding::Latin1,
        10_000,
    )
    .unwrap_err();
    match err {
        DigestError::Write { reason, .. } => assert!(reason.contains("folder")),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!path.exists());
}
