//! Tests for participant metadata loading.

use std::fs;

use study_ingest::participants::read_participants;
use study_model::ParticipantStatus;

#[test]
fn loads_roster_with_window_dates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("participants.csv");
    fs::write(
        &path,
        "Participant ID,Intervention Start Date,End Date,Participant Status,Participant Type\n\
         105,2020-06-01,2020-09-01,completed,full\n\
         106,,,active,full\n\
         107,2020-06-15,2020-07-02,withdrew,pilot\n",
    )
    .expect("write csv");

    let roster = read_participants(&path).expect("read roster");
    assert_eq!(roster.len(), 3);

    let completed = roster.get("105").expect("participant 105");
    assert_eq!(completed.status, ParticipantStatus::Completed);
    assert_eq!(
        completed.intervention_start.map(|d| d.to_string()),
        Some("2020-06-01".to_string())
    );

    let active = roster.get("106").expect("participant 106");
    assert!(active.intervention_start.is_none());
    assert!(active.end_date.is_none());

    assert_eq!(roster.of_type("full").len(), 2);
}

#[test]
fn missing_required_column_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("participants.csv");
    fs::write(&path, "Participant ID,Participant Status\n105,active\n").expect("write csv");
    assert!(read_participants(&path).is_err());
}
