//! Type coercion: rewrite raw column values into their typed renderings per
//! dictionary entry.

use serde::Serialize;
use tracing::debug;

use study_ingest::CsvTable;
use study_model::{Codebook, DataType, DictionaryEntry, EtlError, Result};

use crate::values::{
    code_prefix, format_clock, is_missing, parse_clock, parse_code, parse_date, url_path,
};

/// What a coercion pass touched, returned to the caller for merging.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct CoercionStats {
    pub columns_coerced: usize,
    pub cells_rewritten: usize,
}

impl CoercionStats {
    pub fn merge(&mut self, other: CoercionStats) {
        self.columns_coerced += other.columns_coerced;
        self.cells_rewritten += other.cells_rewritten;
    }
}

/// Coerce every column with a matching schema entry; unmatched columns pass
/// through unmodified. Missing cells are never transformed.
pub fn coerce(table: &mut CsvTable, schema: &super::schema::SchemaCatalog) -> Result<CoercionStats> {
    let mut stats = CoercionStats::default();
    for col in 0..table.headers.len() {
        let Some(entry) = schema.get(&table.headers[col]) else {
            continue;
        };
        let rewritten = coerce_column(table, col, entry)?;
        stats.columns_coerced += 1;
        stats.cells_rewritten += rewritten;
    }
    debug!(
        columns = stats.columns_coerced,
        cells = stats.cells_rewritten,
        "coerced table"
    );
    Ok(stats)
}

fn coerce_column(table: &mut CsvTable, col: usize, entry: &DictionaryEntry) -> Result<usize> {
    match entry.data_type {
        DataType::Boolean => {
            let codebook = entry.codebook.clone().unwrap_or_else(Codebook::yes_no);
            recode_column(table, col, &entry.name, &codebook)
        }
        DataType::Categorical => {
            let codebook = entry.codebook.clone().unwrap_or_default();
            recode_column(table, col, &entry.name, &codebook)
        }
        DataType::String => {
            if entry.name == "url" {
                rewrite_column(table, col, |cell| Ok(Some(url_path(cell))))
            } else {
                Ok(0)
            }
        }
        DataType::Ordinal | DataType::Integer => {
            rewrite_column(table, col, |cell| match parse_code(cell) {
                Some(value) => Ok(Some(value.to_string())),
                None => Err(invalid(&entry.name, cell, "an integer")),
            })
        }
        DataType::Date => rewrite_column(table, col, |cell| match parse_date(cell) {
            Some(date) => Ok(Some(date.format("%Y-%m-%d").to_string())),
            None => Err(invalid(&entry.name, cell, "a YYYY-MM-DD date")),
        }),
        DataType::Time => rewrite_column(table, col, |cell| match parse_clock(cell) {
            Some(time) => Ok(Some(format_clock(time))),
            None => Err(invalid(&entry.name, cell, "a clock time")),
        }),
        DataType::DateTime => coerce_datetime_column(table, col, &entry.name),
        DataType::Checkbox => Ok(0),
    }
}

/// Recode integer codes into decorated `"code: label"` strings.
///
/// Already-decorated cells whose leading code is in the codebook pass
/// untouched, so coercion is idempotent.
fn recode_column(
    table: &mut CsvTable,
    col: usize,
    field: &str,
    codebook: &Codebook,
) -> Result<usize> {
    rewrite_column(table, col, |cell| {
        if let Some(code) = code_prefix(cell)
            && codebook.contains(code)
        {
            return Ok(None);
        }
        let code = parse_code(cell).ok_or_else(|| EtlError::CodeNotFound {
            field: field.to_string(),
            code: cell.to_string(),
        })?;
        match codebook.decorated(code) {
            Some(decorated) => Ok(Some(decorated)),
            None => Err(EtlError::CodeNotFound {
                field: field.to_string(),
                code: code.to_string(),
            }),
        }
    })
}

/// Disambiguate export formats that carry either a full timestamp or a
/// pre-trimmed time string, then keep only the time of day.
///
/// The column is inspected as a whole: the maximum length of the substring
/// after the last `:` across non-missing cells. A short tail (< 6 chars,
/// which covers AM/PM suffixes) means the column is already a bare time;
/// otherwise cells are full timestamps, truncated to minute precision.
fn coerce_datetime_column(table: &mut CsvTable, col: usize, field: &str) -> Result<usize> {
    let max_tail = table
        .rows
        .iter()
        .filter_map(|row| row.get(col))
        .filter(|cell| !is_missing(cell))
        .map(|cell| cell.rsplit(':').next().unwrap_or("").len())
        .max()
        .unwrap_or(0);
    if max_tail < 6 {
        rewrite_column(table, col, |cell| {
            let tail = cell.get(11..).unwrap_or(cell);
            match parse_clock(tail) {
                Some(time) => Ok(Some(format_clock(time))),
                None => Err(invalid(field, cell, "a time of day")),
            }
        })
    } else {
        rewrite_column(table, col, |cell| {
            let head = cell.get(..16).unwrap_or(cell);
            let time = head
                .split_once(' ')
                .and_then(|(date, clock)| parse_date(date).map(|_| clock))
                .and_then(parse_clock);
            match time {
                Some(time) => Ok(Some(format_clock(time))),
                None => Err(invalid(field, cell, "a timestamp")),
            }
        })
    }
}

fn invalid(field: &str, value: &str, expected: &'static str) -> EtlError {
    EtlError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Apply a cell transform to every non-missing cell of a column.
///
/// The transform returns `None` to leave a cell as-is. Returns the number of
/// cells actually rewritten.
fn rewrite_column<F>(table: &mut CsvTable, col: usize, mut transform: F) -> Result<usize>
where
    F: FnMut(&str) -> Result<Option<String>>,
{
    let mut rewritten = 0usize;
    for row in &mut table.rows {
        let Some(cell) = row.get_mut(col) else {
            continue;
        };
        if is_missing(cell) {
            continue;
        }
        if let Some(new_value) = transform(cell)? {
            if *cell != new_value {
                rewritten += 1;
            }
            *cell = new_value;
        }
    }
    Ok(rewritten)
}
