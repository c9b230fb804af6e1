//! Participant window cropping: restrict longitudinal records to each
//! participant's valid study window.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;

use study_model::{EtlError, ParticipantRoster, ParticipantStatus, Result};

use crate::frame::LongFrame;
use crate::values::{is_missing, parse_date};

/// What a cropping pass did, returned to the caller for merging.
///
/// Advisories are participant-scoped metadata gaps: logged, collected here,
/// never fatal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CropStats {
    pub participants_in: usize,
    pub participants_kept: usize,
    pub rows_in: usize,
    pub rows_out: usize,
    pub dropped_no_observations: usize,
    pub dropped_missing_start: usize,
    pub advisories: Vec<String>,
}

impl CropStats {
    pub fn rows_removed(&self) -> usize {
        self.rows_in.saturating_sub(self.rows_out)
    }

    fn advise(&mut self, message: String) {
        warn!("{message}");
        self.advisories.push(message);
    }
}

/// Crop each participant's records to their study window.
///
/// Rows strictly before `intervention_start` are removed. With `crop_end`,
/// rows after `end_date` are also removed for withdrew participants.
/// Participants with no observed rows, no roster entry, or no intervention
/// start are dropped; only the cases that indicate a genuine metadata gap
/// produce an advisory. `today` is passed explicitly so runs are
/// reproducible.
pub fn crop_standard(
    frame: &LongFrame,
    roster: &ParticipantRoster,
    crop_end: bool,
    today: NaiveDate,
) -> Result<(LongFrame, CropStats)> {
    let mut stats = CropStats {
        rows_in: frame.height(),
        ..CropStats::default()
    };
    let key_idx = frame.key_index();
    let mut kept_rows: Vec<Vec<String>> = Vec::new();

    for participant in frame.participants() {
        stats.participants_in += 1;
        let row_indexes = frame.rows_for(&participant);
        if !has_observations(frame, &row_indexes) {
            stats.dropped_no_observations += 1;
            continue;
        }
        let Some(record) = roster.get(&participant) else {
            stats.advise(metadata_gap(&participant, "not present in participant metadata"));
            continue;
        };
        let Some(start) = record.intervention_start else {
            stats.dropped_missing_start += 1;
            // Absence is expected for withdrawn participants and for rows
            // with no status at all; only other statuses get an advisory.
            if record.status != ParticipantStatus::Withdrew
                && record.status != ParticipantStatus::Unknown
            {
                stats.advise(metadata_gap(
                    &participant,
                    &format!("({}) missing intervention start date", record.status.as_str()),
                ));
            }
            continue;
        };
        if start > today {
            stats.advise(format!(
                "{participant}: intervention start {start} is past today's date {today}"
            ));
        }
        let end = if crop_end && record.status == ParticipantStatus::Withdrew {
            match record.end_date {
                Some(end) => Some(end),
                None => {
                    stats.advise(format!(
                        "{participant}: withdrew but has no end date; end crop skipped"
                    ));
                    None
                }
            }
        } else {
            None
        };

        let mut kept_any = false;
        for row_idx in row_indexes {
            let row = &frame.table.rows[row_idx];
            let date = row_date(row, key_idx, &participant)?;
            if date < start {
                continue;
            }
            if let Some(end) = end
                && date > end
            {
                continue;
            }
            kept_rows.push(row.clone());
            kept_any = true;
        }
        if kept_any {
            stats.participants_kept += 1;
        }
    }

    let mut cropped = LongFrame {
        table: study_ingest::CsvTable {
            headers: frame.table.headers.clone(),
            rows: kept_rows,
        },
        id_column: frame.id_column.clone(),
        key_column: frame.key_column.clone(),
    };
    cropped.sort();
    stats.rows_out = cropped.height();
    Ok((cropped, stats))
}

/// Crop densely sampled per-minute records.
///
/// Only the end-date crop applies, and only for withdrew participants; the
/// source feed starts sampling at the intervention start by construction, so
/// there is never a start crop. The calendar date lives in a `Date`/`date`
/// column rather than the key.
pub fn crop_high_frequency(
    frame: &LongFrame,
    roster: &ParticipantRoster,
) -> Result<(LongFrame, CropStats)> {
    let mut stats = CropStats {
        rows_in: frame.height(),
        ..CropStats::default()
    };
    let date_idx = frame
        .table
        .column_index("Date")
        .or_else(|| frame.table.column_index("date"));
    let mut kept_rows: Vec<Vec<String>> = Vec::new();

    for participant in frame.participants() {
        stats.participants_in += 1;
        let row_indexes = frame.rows_for(&participant);
        if row_indexes.is_empty() {
            continue;
        }
        let end = match (date_idx, roster.get(&participant)) {
            (Some(_), Some(record)) if record.status == ParticipantStatus::Withdrew => {
                match record.end_date {
                    Some(end) => {
                        stats.advise(format!(
                            "{participant}: cropped after {end} for withdrew participant"
                        ));
                        Some(end)
                    }
                    None => {
                        stats.advise(format!(
                            "{participant}: withdrew but has no end date; end crop skipped"
                        ));
                        None
                    }
                }
            }
            _ => None,
        };
        let mut kept_any = false;
        for row_idx in row_indexes {
            let row = &frame.table.rows[row_idx];
            if let (Some(end), Some(date_idx)) = (end, date_idx) {
                let date = row_date(row, date_idx, &participant)?;
                if date > end {
                    continue;
                }
            }
            kept_rows.push(row.clone());
            kept_any = true;
        }
        if kept_any {
            stats.participants_kept += 1;
        }
    }

    let mut cropped = LongFrame {
        table: study_ingest::CsvTable {
            headers: frame.table.headers.clone(),
            rows: kept_rows,
        },
        id_column: frame.id_column.clone(),
        key_column: frame.key_column.clone(),
    };
    cropped.sort();
    stats.rows_out = cropped.height();
    Ok((cropped, stats))
}

/// Advisory text for a recoverable participant metadata gap, phrased through
/// the typed error so log lines and raised errors read the same.
fn metadata_gap(participant: &str, detail: &str) -> String {
    EtlError::MissingMetadata {
        participant: participant.to_string(),
        detail: detail.to_string(),
    }
    .to_string()
}

/// Whether any row has at least one non-missing value outside the index.
fn has_observations(frame: &LongFrame, row_indexes: &[usize]) -> bool {
    let id_idx = frame.id_index();
    let key_idx = frame.key_index();
    row_indexes.iter().any(|&row_idx| {
        frame.table.rows[row_idx]
            .iter()
            .enumerate()
            .any(|(col, cell)| col != id_idx && col != key_idx && !is_missing(cell))
    })
}

fn row_date(row: &[String], idx: usize, participant: &str) -> Result<NaiveDate> {
    let raw = row.get(idx).map(String::as_str).unwrap_or("");
    parse_date(raw).ok_or_else(|| EtlError::InvalidValue {
        field: format!("timestamp for participant {participant}"),
        value: raw.to_string(),
        expected: "a YYYY-MM-DD date",
    })
}
