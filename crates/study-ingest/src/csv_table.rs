use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{IngestError, Result};

/// An in-memory tabular file: header row plus all-string cells.
///
/// Cells keep their source text verbatim; an empty cell or a literal `nan`
/// (any case) is the missing sentinel and is never rewritten by loading.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Index of a header, matched case-insensitively after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name.trim()))
    }

    /// All values of a column, padding short rows with empty cells.
    pub fn column_values(&self, name: &str) -> Option<Vec<String>> {
        let idx = self.column_index(name)?;
        let mut values = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            values.push(row.get(idx).cloned().unwrap_or_default());
        }
        Some(values)
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Drop a column by name if present. Returns whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.headers.remove(idx);
        for row in &mut self.rows {
            if idx < row.len() {
                row.remove(idx);
            }
        }
        true
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV file into a [`CsvTable`].
///
/// Survey and sensor exports are machine-written, so the first non-blank
/// row is the header. Cells are trimmed and BOM-stripped; blank rows are
/// skipped.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Ok(CsvTable::default());
    }
    let headers: Vec<String> = raw_rows[0].iter().map(|value| normalize_header(value)).collect();
    let mut rows = Vec::new();
    for record in raw_rows.iter().skip(1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).map(String::as_str).unwrap_or("");
            row.push(value.to_string());
        }
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}

/// Write a [`CsvTable`] back out, header row first.
pub fn write_csv_table(path: &Path, table: &CsvTable) -> Result<()> {
    let mut writer =
        WriterBuilder::new()
            .from_path(path)
            .map_err(|source| IngestError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    writer
        .write_record(&table.headers)
        .map_err(|source| IngestError::CsvWrite {
            path: path.to_path_buf(),
            source,
        })?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|source| IngestError::CsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }
    writer.flush().map_err(|source| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source: csv::Error::from(source),
    })?;
    Ok(())
}
