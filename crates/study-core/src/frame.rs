//! Participant/time-indexed view over a stitched export table.

use study_ingest::CsvTable;
use study_model::{EtlError, Result};

/// A long-format table keyed by `(participant, key)`.
///
/// The key column is a calendar date for daily products and a clock time for
/// per-minute products. Sorting is stable: rows keep their source order
/// within equal keys.
#[derive(Debug, Clone)]
pub struct LongFrame {
    pub table: CsvTable,
    pub id_column: String,
    pub key_column: String,
}

impl LongFrame {
    /// Wrap a table, validating that the index columns exist.
    ///
    /// `index_fields` is the catalog's ordered index list: participant id
    /// first, then the time key.
    pub fn new(table: CsvTable, index_fields: &[String]) -> Result<Self> {
        let [id_column, key_column] = index_fields else {
            return Err(EtlError::Configuration(format!(
                "expected two index fields (participant, time key), got {}",
                index_fields.len()
            )));
        };
        for column in [id_column, key_column] {
            if table.column_index(column).is_none() {
                return Err(EtlError::Configuration(format!(
                    "index column `{column}` not present in data"
                )));
            }
        }
        Ok(Self {
            table,
            id_column: id_column.clone(),
            key_column: key_column.clone(),
        })
    }

    pub fn id_index(&self) -> usize {
        self.table
            .column_index(&self.id_column)
            .expect("validated at construction")
    }

    pub fn key_index(&self) -> usize {
        self.table
            .column_index(&self.key_column)
            .expect("validated at construction")
    }

    /// Participant ids in order of first appearance.
    pub fn participants(&self) -> Vec<String> {
        let idx = self.id_index();
        let mut seen = Vec::new();
        for row in &self.table.rows {
            let id = row.get(idx).map(String::as_str).unwrap_or("");
            if !id.is_empty() && !seen.iter().any(|s: &String| s == id) {
                seen.push(id.to_string());
            }
        }
        seen
    }

    /// Row indexes belonging to one participant, in source order.
    pub fn rows_for(&self, participant: &str) -> Vec<usize> {
        let idx = self.id_index();
        self.table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(idx).map(String::as_str) == Some(participant))
            .map(|(row_idx, _)| row_idx)
            .collect()
    }

    /// Sort rows by participant, then key, preserving source order for ties.
    pub fn sort(&mut self) {
        let id_idx = self.id_index();
        let key_idx = self.key_index();
        self.table.rows.sort_by(|a, b| {
            let a_id = a.get(id_idx).map(String::as_str).unwrap_or("");
            let b_id = b.get(id_idx).map(String::as_str).unwrap_or("");
            a_id.cmp(b_id).then_with(|| {
                let a_key = a.get(key_idx).map(String::as_str).unwrap_or("");
                let b_key = b.get(key_idx).map(String::as_str).unwrap_or("");
                a_key.cmp(b_key)
            })
        });
    }

    pub fn height(&self) -> usize {
        self.table.height()
    }
}
