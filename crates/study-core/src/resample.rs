//! Downsampling of per-minute records to a coarser fixed interval.

use chrono::{NaiveDateTime, Timelike};

use study_ingest::CsvTable;
use study_model::{EtlError, Result};

use crate::frame::LongFrame;
use crate::values::{is_missing, parse_clock, parse_date};

/// Downsample one participant's per-minute rows to `interval_minutes`
/// buckets, keeping the first observation in each bucket.
///
/// Rows with a missing date or time are dropped. Some exports carry a
/// trailing `S` placeholder in the seconds position; it is repaired to `00`
/// before parsing.
pub fn resample_per_minute(
    frame: &LongFrame,
    participant: &str,
    interval_minutes: u32,
) -> Result<CsvTable> {
    if interval_minutes == 0 {
        return Err(EtlError::Configuration(
            "resample interval must be at least one minute".to_string(),
        ));
    }
    let date_idx = frame
        .table
        .column_index("date")
        .or_else(|| frame.table.column_index("Date"))
        .ok_or_else(|| EtlError::Configuration("no date column to resample on".to_string()))?;
    let time_idx = frame.key_index();

    // Collect (datetime, row) pairs, then pick the first row per bucket.
    let mut stamped: Vec<(NaiveDateTime, &Vec<String>)> = Vec::new();
    for row_idx in frame.rows_for(participant) {
        let row = &frame.table.rows[row_idx];
        let raw_date = row.get(date_idx).map(String::as_str).unwrap_or("");
        let raw_time = row.get(time_idx).map(String::as_str).unwrap_or("");
        if is_missing(raw_date) || is_missing(raw_time) {
            continue;
        }
        let repaired = raw_time.replace('S', "00");
        let (Some(date), Some(time)) = (parse_date(raw_date), parse_clock(&repaired)) else {
            continue;
        };
        stamped.push((NaiveDateTime::new(date, time), row));
    }
    stamped.sort_by_key(|(stamp, _)| *stamp);

    let mut out = CsvTable::new(frame.table.headers.clone());
    let mut last_bucket: Option<NaiveDateTime> = None;
    for (stamp, row) in stamped {
        let minutes_of_day = stamp.hour() * 60 + stamp.minute();
        let bucket_start = minutes_of_day / interval_minutes * interval_minutes;
        let bucket = stamp
            .date()
            .and_hms_opt(bucket_start / 60, bucket_start % 60, 0)
            .expect("bucket start is a valid clock time");
        if last_bucket == Some(bucket) {
            continue;
        }
        last_bucket = Some(bucket);
        out.rows.push(row.clone());
    }
    Ok(out)
}
