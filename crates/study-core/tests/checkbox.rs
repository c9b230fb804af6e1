//! Tests for checkbox expansion and indicator recoding.

use study_core::checkbox::CheckboxExpander;
use study_core::schema::SchemaCatalog;
use study_ingest::CsvTable;
use study_model::{Codebook, DataType, DictionaryEntry, EtlError};

fn schema_with_checkbox(name: &str, notes: &str) -> SchemaCatalog {
    let mut entry = DictionaryEntry::new(name, DataType::Checkbox).with_notes(notes);
    entry.codebook = Some(Codebook::parse(name, notes).expect("codebook"));
    SchemaCatalog::new(vec![entry])
}

#[test]
fn expands_checkbox_into_ordered_boolean_entries() {
    let schema = schema_with_checkbox("exercise", "0, Never | 1, Sometimes | 2, Often");
    let expander = CheckboxExpander::from_schema(&schema);
    let expanded = expander.expand_schema(&schema).expect("expand");

    assert_eq!(
        expanded.names(),
        vec!["exercise: Never", "exercise: Sometimes", "exercise: Often"]
    );
    for entry in expanded.iter() {
        assert_eq!(entry.data_type, DataType::Boolean);
        assert_eq!(entry.description, entry.name);
    }
    // The transient Checkbox entry does not survive expansion.
    assert!(!expanded.contains("exercise"));
}

#[test]
fn renames_and_recodes_indicator_columns() {
    let schema = schema_with_checkbox("exercise", "0, Never | 1, Sometimes | 2, Often");
    let expander = CheckboxExpander::from_schema(&schema);

    let mut table = CsvTable::new(vec![
        "study_id".to_string(),
        "exercise___1".to_string(),
        "exercise___2".to_string(),
    ]);
    table.rows.push(vec!["101".to_string(), "1".to_string(), "0".to_string()]);
    table.rows.push(vec!["102".to_string(), "0".to_string(), "nan".to_string()]);

    let renamed = expander.rename_data_columns(&mut table).expect("rename");
    assert_eq!(renamed, 2);
    assert_eq!(
        table.headers,
        vec!["study_id", "exercise: Sometimes", "exercise: Often"]
    );
    // Presence/absence recoding, independent of the choice's label.
    assert_eq!(table.rows[0], vec!["101", "1: Yes", "0: No"]);
    // Missing stays missing; unchecked stays "0: No".
    assert_eq!(table.rows[1], vec!["102", "0: No", "nan"]);
}

#[test]
fn specify_below_marker_is_stripped_from_derived_names() {
    let schema = schema_with_checkbox("device", "1, Phone | 2, Other (specify below)");
    let expander = CheckboxExpander::from_schema(&schema);
    let expanded = expander.expand_schema(&schema).expect("expand");
    assert_eq!(expanded.names(), vec!["device: Phone", "device: Other"]);
}

#[test]
fn duplicate_derived_names_are_rejected() {
    let schema = schema_with_checkbox("device", "1, Phone | 2, Phone");
    let expander = CheckboxExpander::from_schema(&schema);
    let err = expander.expand_schema(&schema).unwrap_err();
    assert!(matches!(err, EtlError::DuplicateEntry { .. }));
}

#[test]
fn value_outside_codebook_is_an_error() {
    let schema = schema_with_checkbox("exercise", "0, Never | 1, Sometimes");
    let expander = CheckboxExpander::from_schema(&schema);
    let mut table = CsvTable::new(vec!["exercise___1".to_string()]);
    table.rows.push(vec!["9".to_string()]);
    let err = expander.rename_data_columns(&mut table).unwrap_err();
    assert!(matches!(err, EtlError::CodeNotFound { .. }));
}

#[test]
fn unrelated_columns_pass_through() {
    let schema = schema_with_checkbox("exercise", "0, Never | 1, Sometimes");
    let expander = CheckboxExpander::from_schema(&schema);
    let mut table = CsvTable::new(vec!["study_id".to_string(), "other___1".to_string()]);
    table.rows.push(vec!["101".to_string(), "1".to_string()]);
    let renamed = expander.rename_data_columns(&mut table).expect("rename");
    // `other` is not a checkbox field in the schema, so its column is untouched.
    assert_eq!(renamed, 0);
    assert_eq!(table.headers, vec!["study_id", "other___1"]);
    assert_eq!(table.rows[0], vec!["101", "1"]);
}
