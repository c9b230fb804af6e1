//! Composite scale scoring: reverse-coding, two-item bipolar personality
//! dimensions, and multi-item motivation subscales.

use std::collections::BTreeMap;

use tracing::debug;

use study_ingest::CsvTable;
use study_model::{BipolarScale, EtlError, MultiItemScale, Result, ScaleItem};

use crate::values::{code_prefix, is_missing, likert_points};

/// Symmetric relabeling table for the 7-point agreement scale, mirrored
/// around its center value.
const AGREEMENT_REVERSE_PAIRS: [(&str, &str); 7] = [
    ("0: 1 = Disagree strongly", "6: 7 = Agree strongly"),
    ("1: 2 = Disagree moderately", "5: 6 = Agree moderately"),
    ("2: 3 = Disagree a little", "4: 5 = Agree a little"),
    (
        "3: 4 = Neither agree nor disagree",
        "3: 4 = Neither agree nor disagree",
    ),
    ("4: 5 = Agree a little", "2: 3 = Disagree a little"),
    ("5: 6 = Agree moderately", "1: 2 = Disagree moderately"),
    ("6: 7 = Agree strongly", "0: 1 = Disagree strongly"),
];

/// The reverse-coding map for 7-point agreement items.
pub fn agreement_reverse_map() -> BTreeMap<String, String> {
    AGREEMENT_REVERSE_PAIRS
        .iter()
        .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
        .collect()
}

/// Reverse-code a column of labels through an exact relabeling table.
///
/// Missing values pass through unchanged; an observed label absent from the
/// table is an error.
pub fn reverse_code(
    field: &str,
    values: &[String],
    mapping: &BTreeMap<String, String>,
) -> Result<Vec<String>> {
    values
        .iter()
        .map(|value| reverse_label(field, value, mapping))
        .collect()
}

fn reverse_label(
    field: &str,
    value: &str,
    mapping: &BTreeMap<String, String>,
) -> Result<String> {
    if is_missing(value) {
        return Ok(value.to_string());
    }
    mapping
        .get(value)
        .cloned()
        .ok_or_else(|| EtlError::CodeNotFound {
            field: field.to_string(),
            code: value.to_string(),
        })
}

/// A per-participant table of named scale scores.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    pub id_column: String,
    pub ids: Vec<String>,
    pub scales: Vec<String>,
    /// One row per participant, one `Option<f64>` per scale.
    pub rows: Vec<Vec<Option<f64>>>,
}

impl ScoreTable {
    /// Render as a writable table; missing scores become empty cells.
    pub fn to_csv_table(&self) -> CsvTable {
        let mut headers = vec![self.id_column.clone()];
        headers.extend(self.scales.iter().cloned());
        let mut table = CsvTable::new(headers);
        for (id, scores) in self.ids.iter().zip(&self.rows) {
            let mut row = vec![id.clone()];
            for score in scores {
                row.push(match score {
                    Some(value) => format_score(*value),
                    None => String::new(),
                });
            }
            table.rows.push(row);
        }
        table
    }
}

fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Build the ten-item personality instrument's five bipolar dimensions from
/// convention-matched column names.
///
/// Item columns contain `tipi` (any case) and end in the item number. Each
/// dimension pairs a plain item with a reverse-coded one.
pub fn tipi_definitions(headers: &[String]) -> Result<Vec<BipolarScale>> {
    let mut by_item: BTreeMap<u32, String> = BTreeMap::new();
    for header in headers {
        if !header.to_ascii_lowercase().contains("tipi") {
            continue;
        }
        if let Some(number) = trailing_number(header) {
            by_item.insert(number, header.clone());
        }
    }
    let item = |number: u32| -> Result<String> {
        by_item.get(&number).cloned().ok_or_else(|| {
            EtlError::Configuration(format!("personality item {number} not found in data columns"))
        })
    };
    let pairs: [(&str, u32, u32, bool); 5] = [
        // (dimension, first item, second item, second is reversed)
        ("Extraversion", 1, 6, true),
        ("Agreeableness", 2, 7, false),
        ("Conscientiousness", 3, 8, true),
        ("Emotional Stability", 4, 9, false),
        ("Openness to Experience", 5, 10, true),
    ];
    let mut scales = Vec::with_capacity(pairs.len());
    for (name, first, second, second_reversed) in pairs {
        let items = if second_reversed {
            [ScaleItem::plain(item(first)?), ScaleItem::reversed(item(second)?)]
        } else {
            [ScaleItem::reversed(item(first)?), ScaleItem::plain(item(second)?)]
        };
        scales.push(BipolarScale {
            name: name.to_string(),
            items,
        });
    }
    debug!(items = by_item.len(), "matched personality item columns");
    Ok(scales)
}

/// Build the 19-item motivation battery's subscales from convention-matched
/// column names, in order of appearance.
///
/// The item count is verified before scoring: a different shape means the
/// export does not carry the expected instrument.
pub fn motivation_definitions(headers: &[String]) -> Result<Vec<MultiItemScale>> {
    let matched: Vec<&String> = headers
        .iter()
        .filter(|header| header.to_ascii_lowercase().contains("motivation"))
        .collect();
    if matched.len() != 19 {
        return Err(EtlError::Configuration(format!(
            "expected 19 motivation item columns, found {}",
            matched.len()
        )));
    }
    let item = |numbers: &[usize]| -> Vec<String> {
        numbers.iter().map(|&n| matched[n - 1].clone()).collect()
    };
    Ok(vec![
        MultiItemScale {
            name: "Amotivation".to_string(),
            items: item(&[5, 9, 12, 19]),
        },
        MultiItemScale {
            name: "External regulation".to_string(),
            items: item(&[1, 6, 11, 16]),
        },
        MultiItemScale {
            name: "Introjected regulation".to_string(),
            items: item(&[2, 7, 13]),
        },
        MultiItemScale {
            name: "Identified regulation".to_string(),
            items: item(&[3, 8, 14, 17]),
        },
        MultiItemScale {
            name: "Intrinsic regulation".to_string(),
            items: item(&[4, 10, 15, 18]),
        },
    ])
}

/// Score two-item bipolar dimensions.
///
/// Each participant's score is the mean of the two item values, ignoring a
/// missing operand; the score is missing only when both operands are.
pub fn compute_bipolar_scales(
    table: &CsvTable,
    id_column: &str,
    scales: &[BipolarScale],
) -> Result<ScoreTable> {
    let ids = table
        .column_values(id_column)
        .ok_or_else(|| EtlError::Configuration(format!("id column `{id_column}` not in data")))?;
    let reverse_map = agreement_reverse_map();

    // Decode each distinct item column once.
    let mut decoded: BTreeMap<(String, bool), Vec<Option<f64>>> = BTreeMap::new();
    for scale in scales {
        for item in &scale.items {
            let key = (item.field.clone(), item.reverse);
            if decoded.contains_key(&key) {
                continue;
            }
            let raw = table.column_values(&item.field).ok_or_else(|| {
                EtlError::Configuration(format!("item column `{}` not in data", item.field))
            })?;
            let values = if item.reverse {
                reverse_code(&item.field, &raw, &reverse_map)?
            } else {
                raw
            };
            let points = values
                .iter()
                .map(|value| decode_likert(&item.field, value))
                .collect::<Result<Vec<_>>>()?;
            decoded.insert(key, points);
        }
    }

    let mut rows = Vec::with_capacity(ids.len());
    for row_idx in 0..ids.len() {
        let mut scores = Vec::with_capacity(scales.len());
        for scale in scales {
            let operands: Vec<f64> = scale
                .items
                .iter()
                .filter_map(|item| {
                    decoded[&(item.field.clone(), item.reverse)]
                        .get(row_idx)
                        .copied()
                        .flatten()
                })
                .collect();
            scores.push(mean_ignoring_missing(&operands));
        }
        rows.push(scores);
    }
    Ok(ScoreTable {
        id_column: id_column.to_string(),
        ids,
        scales: scales.iter().map(|scale| scale.name.clone()).collect(),
        rows,
    })
}

/// Score multi-item scales as row-wise means over member items, ignoring
/// missing members; missing only when every member is missing.
pub fn compute_multiitem_scales(
    table: &CsvTable,
    id_column: &str,
    scales: &[MultiItemScale],
) -> Result<ScoreTable> {
    let ids = table
        .column_values(id_column)
        .ok_or_else(|| EtlError::Configuration(format!("id column `{id_column}` not in data")))?;

    let mut decoded: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
    for scale in scales {
        for field in &scale.items {
            if decoded.contains_key(field) {
                continue;
            }
            let raw = table.column_values(field).ok_or_else(|| {
                EtlError::Configuration(format!("item column `{field}` not in data"))
            })?;
            let codes = raw
                .iter()
                .map(|value| decode_code(field, value))
                .collect::<Result<Vec<_>>>()?;
            decoded.insert(field.clone(), codes);
        }
    }

    let mut rows = Vec::with_capacity(ids.len());
    for row_idx in 0..ids.len() {
        let mut scores = Vec::with_capacity(scales.len());
        for scale in scales {
            let members: Vec<f64> = scale
                .items
                .iter()
                .filter_map(|field| decoded[field].get(row_idx).copied().flatten())
                .collect();
            scores.push(mean_ignoring_missing(&members));
        }
        rows.push(scores);
    }
    Ok(ScoreTable {
        id_column: id_column.to_string(),
        ids,
        scales: scales.iter().map(|scale| scale.name.clone()).collect(),
        rows,
    })
}

/// Item value from a `"code: points = label"` agreement cell.
fn decode_likert(field: &str, value: &str) -> Result<Option<f64>> {
    if is_missing(value) {
        return Ok(None);
    }
    likert_points(value)
        .map(|points| Some(points as f64))
        .ok_or_else(|| EtlError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "a `code: points = label` item",
        })
}

/// Item value from the leading code of a `"code: label"` cell.
fn decode_code(field: &str, value: &str) -> Result<Option<f64>> {
    if is_missing(value) {
        return Ok(None);
    }
    code_prefix(value)
        .map(|code| Some(code as f64))
        .ok_or_else(|| EtlError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            expected: "a `code: label` item",
        })
}

fn mean_ignoring_missing(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn trailing_number(header: &str) -> Option<u32> {
    header.split_whitespace().next_back()?.parse().ok()
}
