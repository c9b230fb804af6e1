//! Tests for CSV table reading and writing.

use std::fs;

use study_ingest::csv_table::{CsvTable, read_csv_table, write_csv_table};

#[test]
fn reads_first_row_as_header_and_trims_cells() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("export.csv");
    fs::write(&path, "study_id, sex ,exercise___1\n101,1, 0 \n\n102,,nan\n").expect("write csv");

    let table = read_csv_table(&path).expect("read table");
    assert_eq!(table.headers, vec!["study_id", "sex", "exercise___1"]);
    assert_eq!(table.height(), 2);
    assert_eq!(table.cell(0, 1), "1");
    // Missing sentinels survive loading verbatim.
    assert_eq!(table.cell(1, 1), "");
    assert_eq!(table.cell(1, 2), "nan");
}

#[test]
fn round_trips_through_write_and_read() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("out.csv");
    let mut table = CsvTable::new(vec!["study_id".to_string(), "gender".to_string()]);
    table.rows.push(vec!["101".to_string(), "0: Female".to_string()]);
    table.rows.push(vec!["102".to_string(), "nan".to_string()]);

    write_csv_table(&path, &table).expect("write table");
    let round = read_csv_table(&path).expect("read back");
    assert_eq!(round.headers, table.headers);
    assert_eq!(round.rows, table.rows);
}

#[test]
fn drop_column_removes_header_and_cells() {
    let mut table = CsvTable::new(vec![
        "study_id".to_string(),
        "baseline_survey_2_complete".to_string(),
    ]);
    table.rows.push(vec!["101".to_string(), "2".to_string()]);
    assert!(table.drop_column("baseline_survey_2_complete"));
    assert_eq!(table.headers, vec!["study_id"]);
    assert_eq!(table.rows[0], vec!["101"]);
    assert!(!table.drop_column("baseline_survey_2_complete"));
}

#[test]
fn column_lookup_is_case_insensitive() {
    let table = CsvTable::new(vec!["Subject ID".to_string(), "Date".to_string()]);
    assert_eq!(table.column_index("subject id"), Some(0));
    assert_eq!(table.column_index("DATE"), Some(1));
    assert_eq!(table.column_index("time"), None);
}
