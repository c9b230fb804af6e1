//! Participant metadata loading.

use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use study_model::{ParticipantRecord, ParticipantRoster, ParticipantStatus};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};

const COLUMN_ID: &str = "Participant ID";
const COLUMN_START: &str = "Intervention Start Date";
const COLUMN_END: &str = "End Date";
const COLUMN_STATUS: &str = "Participant Status";
const COLUMN_TYPE: &str = "Participant Type";

/// Load the participant metadata export into a typed roster.
///
/// Window dates are `%Y-%m-%d`; a missing or unparsable date becomes `None`
/// (window gaps are participant-scoped and recoverable downstream, not load
/// failures).
pub fn read_participants(path: &Path) -> Result<ParticipantRoster> {
    let table = read_csv_table(path)?;
    roster_from_table(&table, path)
}

pub fn roster_from_table(table: &CsvTable, path: &Path) -> Result<ParticipantRoster> {
    let id_idx = require_column(table, COLUMN_ID, path)?;
    let start_idx = require_column(table, COLUMN_START, path)?;
    let end_idx = require_column(table, COLUMN_END, path)?;
    let status_idx = require_column(table, COLUMN_STATUS, path)?;
    let type_idx = table.column_index(COLUMN_TYPE);

    let mut records = Vec::with_capacity(table.height());
    for row in &table.rows {
        let id = cell(row, id_idx);
        if id.is_empty() {
            continue;
        }
        let mut record = ParticipantRecord::new(id);
        record.intervention_start = parse_metadata_date(&cell(row, start_idx));
        record.end_date = parse_metadata_date(&cell(row, end_idx));
        record.status = ParticipantStatus::from_raw(&cell(row, status_idx));
        record.participant_type = type_idx.map(|idx| cell(row, idx)).filter(|t| !t.is_empty());
        records.push(record);
    }
    debug!(count = records.len(), "loaded participant roster");
    Ok(ParticipantRoster::new(records))
}

fn require_column(table: &CsvTable, column: &str, path: &Path) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        })
}

fn cell(row: &[String], idx: usize) -> String {
    row.get(idx).map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_metadata_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
