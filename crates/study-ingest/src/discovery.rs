//! Export file discovery and per-participant stitching.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use study_model::ParticipantRoster;

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};

/// Column added to stitched exports to identify the source participant.
pub const SUBJECT_ID_COLUMN: &str = "Subject ID";

/// Lists all CSV files in a directory, sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Extract the participant id from an export filename.
///
/// Export names follow `<study>.<product>.<period>.<participant>.csv`; the
/// id is the fourth dot-separated token.
pub fn participant_id_from_filename(file_name: &str) -> Option<&str> {
    let token = file_name.split('.').nth(3)?;
    if token.is_empty() { None } else { Some(token) }
}

/// Read every per-participant export of one product and stitch the rows into
/// a single table with a `Subject ID` column.
///
/// Files whose name does not contain `file_type`, or whose participant is not
/// on the roster, are skipped. Empty files are skipped with a warning.
pub fn load_participant_exports(
    dir: &Path,
    file_type: &str,
    roster: &ParticipantRoster,
) -> Result<CsvTable> {
    let mut combined = CsvTable::default();
    for path in list_csv_files(dir)? {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("");
        if !file_name.contains(file_type) {
            continue;
        }
        let Some(participant) = participant_id_from_filename(file_name) else {
            debug!(file = file_name, "no participant id in export filename");
            continue;
        };
        if roster.get(participant).is_none() {
            debug!(file = file_name, participant, "participant not on roster");
            continue;
        }
        let table = read_csv_table(&path)?;
        if table.height() == 0 {
            warn!(file = file_name, "export file is empty");
            continue;
        }
        append_export(&mut combined, table, participant);
    }
    Ok(combined)
}

fn append_export(combined: &mut CsvTable, table: CsvTable, participant: &str) {
    if combined.headers.is_empty() {
        let mut headers = vec![SUBJECT_ID_COLUMN.to_string()];
        headers.extend(table.headers.iter().cloned());
        combined.headers = headers;
    }
    // Align on the combined header set; exports of one product share a layout.
    let indices: Vec<Option<usize>> = combined
        .headers
        .iter()
        .skip(1)
        .map(|header| table.column_index(header))
        .collect();
    for row in &table.rows {
        let mut out = Vec::with_capacity(combined.headers.len());
        out.push(participant.to_string());
        for idx in &indices {
            out.push(idx.and_then(|i| row.get(i)).cloned().unwrap_or_default());
        }
        combined.rows.push(out);
    }
}
