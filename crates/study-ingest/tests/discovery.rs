//! Tests for export discovery and per-participant stitching.

use std::fs;

use study_ingest::discovery::{
    list_csv_files, load_participant_exports, participant_id_from_filename,
};
use study_model::{ParticipantRecord, ParticipantRoster};

fn roster(ids: &[&str]) -> ParticipantRoster {
    ParticipantRoster::new(ids.iter().map(|id| ParticipantRecord::new(*id)).collect())
}

#[test]
fn participant_id_is_fourth_dot_token() {
    assert_eq!(
        participant_id_from_filename("U01.daily-metrics.2020-06.105.csv"),
        Some("105")
    );
    assert_eq!(participant_id_from_filename("daily-metrics.csv"), None);
}

#[test]
fn lists_only_csv_files_sorted() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("b.csv"), "x\n1\n").unwrap();
    fs::write(dir.path().join("a.CSV"), "x\n1\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let files = list_csv_files(dir.path()).expect("list files");
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a.CSV", "b.csv"]);
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    assert!(list_csv_files(&missing).is_err());
}

#[test]
fn stitches_exports_with_subject_id_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("U01.daily-metrics.w1.105.csv"),
        "Date,steps\n2020-06-01,900\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("U01.daily-metrics.w1.106.csv"),
        "Date,steps\n2020-06-02,1200\n",
    )
    .unwrap();
    // Not on the roster: skipped.
    fs::write(
        dir.path().join("U01.daily-metrics.w1.999.csv"),
        "Date,steps\n2020-06-03,50\n",
    )
    .unwrap();
    // Empty export: skipped with a warning.
    fs::write(dir.path().join("U01.daily-metrics.w1.107.csv"), "").unwrap();

    let roster = roster(&["105", "106", "107"]);
    let table = load_participant_exports(dir.path(), "daily-metrics", &roster).expect("stitch");
    assert_eq!(table.headers, vec!["Subject ID", "Date", "steps"]);
    assert_eq!(table.height(), 2);
    assert_eq!(table.rows[0], vec!["105", "2020-06-01", "900"]);
    assert_eq!(table.rows[1], vec!["106", "2020-06-02", "1200"]);
}
