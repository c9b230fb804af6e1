//! Checkbox expansion: fan multi-select entries out into per-choice Boolean
//! indicator entries and recode the matching data columns.

use std::collections::BTreeMap;

use tracing::debug;

use study_ingest::CsvTable;
use study_model::{Codebook, DataType, DictionaryEntry, EtlError, Result};

use crate::values::{is_missing, parse_code};

/// A data column header, classified once.
///
/// Multi-select raw columns follow the `"{field}___{code}"` convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    Plain(String),
    MultiSelect { base: String, code: i64 },
}

impl ColumnKind {
    pub fn parse(header: &str) -> Self {
        if let Some((base, code)) = header.split_once("___")
            && !base.is_empty()
            && let Ok(code) = code.trim().parse::<i64>()
        {
            return Self::MultiSelect {
                base: base.to_string(),
                code,
            };
        }
        Self::Plain(header.to_string())
    }
}

/// Expands Checkbox schema entries and recodes their data columns.
#[derive(Debug, Clone, Default)]
pub struct CheckboxExpander {
    fields: BTreeMap<String, Codebook>,
}

impl CheckboxExpander {
    /// Collect the Checkbox entries of a catalog.
    pub fn from_schema(schema: &super::schema::SchemaCatalog) -> Self {
        let mut fields = BTreeMap::new();
        for entry in schema.iter() {
            if entry.data_type == DataType::Checkbox {
                let codebook = entry.codebook.clone().unwrap_or_default();
                fields.insert(entry.name.clone(), codebook);
            }
        }
        Self { fields }
    }

    /// The derived indicator entry name for one choice of a checkbox field.
    ///
    /// Labels drop any trailing `"(specify below)"` marker.
    pub fn derived_name(base: &str, label: &str) -> String {
        let label = label.replace("(specify below)", "");
        format!("{base}: {}", label.trim()).trim().to_string()
    }

    /// Expand the catalog: each Checkbox entry is replaced, in place and in
    /// codebook order, by one Boolean entry per choice. Checkbox entries do
    /// not survive expansion; duplicate derived names are an error.
    pub fn expand_schema(
        &self,
        schema: &super::schema::SchemaCatalog,
    ) -> Result<super::schema::SchemaCatalog> {
        let mut expanded = super::schema::SchemaCatalog::default();
        for entry in schema.iter() {
            if entry.data_type != DataType::Checkbox {
                expanded.push(entry.clone());
                continue;
            }
            let codebook = self.fields.get(&entry.name).cloned().unwrap_or_default();
            let indicator = indicator_codebook(&codebook);
            for (_, label) in codebook.iter() {
                let name = Self::derived_name(&entry.name, label);
                let derived = DictionaryEntry::new(&name, DataType::Boolean)
                    .with_description(name.clone())
                    .with_codebook(indicator.clone());
                expanded.push(derived);
            }
        }
        // Names must be unique after expansion, across derived and plain
        // entries alike.
        let mut seen = std::collections::BTreeSet::new();
        for entry in expanded.iter() {
            if !seen.insert(entry.name.clone()) {
                return Err(EtlError::DuplicateEntry {
                    name: entry.name.clone(),
                });
            }
        }
        debug!(
            checkbox_fields = self.fields.len(),
            entries = expanded.len(),
            "expanded checkbox entries"
        );
        Ok(expanded)
    }

    /// Rename raw `field___code` data columns to their derived entry names
    /// and recode the indicator values.
    ///
    /// The recoding encodes presence of that specific choice, independent of
    /// the choice's label: `0` becomes `"0: No"`, any other codebook code
    /// `c` becomes `"{c}: Yes"`. Missing cells pass through. A value outside
    /// the field's codebook is an error.
    ///
    /// Returns the number of columns renamed.
    pub fn rename_data_columns(&self, table: &mut CsvTable) -> Result<usize> {
        let mut renamed = 0usize;
        for col in 0..table.headers.len() {
            let ColumnKind::MultiSelect { base, code } = ColumnKind::parse(&table.headers[col])
            else {
                continue;
            };
            let Some(codebook) = self.fields.get(&base) else {
                continue;
            };
            let label = codebook.label_for(code).ok_or_else(|| EtlError::CodeNotFound {
                field: base.clone(),
                code: code.to_string(),
            })?;
            let name = Self::derived_name(&base, label);
            for row in &mut table.rows {
                let Some(cell) = row.get_mut(col) else {
                    continue;
                };
                if is_missing(cell) {
                    continue;
                }
                let value = parse_code(cell).ok_or_else(|| EtlError::CodeNotFound {
                    field: name.clone(),
                    code: cell.clone(),
                })?;
                if value == 0 {
                    *cell = "0: No".to_string();
                } else if codebook.contains(value) {
                    *cell = format!("{value}: Yes");
                } else {
                    return Err(EtlError::CodeNotFound {
                        field: name.clone(),
                        code: value.to_string(),
                    });
                }
            }
            table.headers[col] = name;
            renamed += 1;
        }
        Ok(renamed)
    }
}

/// The recoded values a derived indicator column can hold: `0` means the
/// choice was not selected, any other code from the base field's codebook
/// means it was.
fn indicator_codebook(base: &Codebook) -> Codebook {
    let mut notes = String::from("0, No");
    for (code, _) in base.iter() {
        if code != 0 {
            notes.push_str(&format!(" | {code}, Yes"));
        }
    }
    Codebook::parse("indicator", &notes).unwrap_or_default()
}
