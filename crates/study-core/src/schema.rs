//! Schema catalog: parsing the raw field dictionary into typed entries.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use study_ingest::CsvTable;
use study_model::{Codebook, DataType, DictionaryEntry, EtlError, Result};

use crate::values::is_missing;

/// Raw dictionary column names, as exported by the survey platform.
const COLUMN_FORM: &str = "Form Name";
const COLUMN_FIELD_NAME: &str = "Variable / Field Name";
const COLUMN_FIELD_TYPE: &str = "Field Type";
const COLUMN_VALIDATION: &str = "Text Validation Type OR Show Slider Number";
const COLUMN_LABEL: &str = "Field Label";
const COLUMN_CHOICES: &str = "Choices, Calculations, OR Slider Labels";
const COLUMN_NEW_NAME: &str = "New Name";

/// Normalized dictionary column names, used for outputs and as the schema
/// source for longitudinal data products.
const COLUMN_ELEMENT_NAME: &str = "ElementName";
const COLUMN_DATA_TYPE: &str = "DataType";
const COLUMN_ELEMENT_DESCRIPTION: &str = "ElementDescription";
const COLUMN_NOTES: &str = "Notes";
const COLUMN_REQUIRED: &str = "Required";

/// Field-name aliases from the dictionary's `New Name` column.
pub type AliasMap = BTreeMap<String, String>;

/// Ordered catalog of typed dictionary entries.
///
/// Read-only after construction; shared by expansion, coercion, cropping,
/// and scoring.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    entries: Vec<DictionaryEntry>,
}

impl SchemaCatalog {
    pub fn new(entries: Vec<DictionaryEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&DictionaryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn push(&mut self, entry: DictionaryEntry) {
        self.entries.push(entry);
    }

    pub fn insert_front(&mut self, entry: DictionaryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fields downstream consumers should treat as numerical.
    pub fn numeric_fields(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| entry.data_type.is_numeric())
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Parse the raw field dictionary, keeping rows of the target form.
    ///
    /// Returns the catalog plus the `New Name` alias map collected from the
    /// same rows. Codebooks for coded fields are parsed here, fail-fast.
    pub fn load(table: &CsvTable, form: &str) -> Result<(Self, AliasMap)> {
        let form_idx = require_column(table, COLUMN_FORM)?;
        let name_idx = require_column(table, COLUMN_FIELD_NAME)?;
        let type_idx = require_column(table, COLUMN_FIELD_TYPE)?;
        let validation_idx = require_column(table, COLUMN_VALIDATION)?;
        let label_idx = require_column(table, COLUMN_LABEL)?;
        let choices_idx = require_column(table, COLUMN_CHOICES)?;
        let new_name_idx = table.column_index(COLUMN_NEW_NAME);

        let mut entries = Vec::new();
        let mut aliases = AliasMap::new();
        for row in &table.rows {
            if row.get(form_idx).map(String::as_str) != Some(form) {
                continue;
            }
            let name = row.get(name_idx).map(|v| v.trim()).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            if let Some(new_name) = new_name_idx.and_then(|idx| row.get(idx)) {
                let new_name = new_name.trim();
                if !new_name.is_empty() && !is_missing(new_name) {
                    aliases.insert(name.to_string(), new_name.to_string());
                }
            }
            let field_type = row.get(type_idx).map(|v| v.trim()).unwrap_or("");
            let validation = row.get(validation_idx).map(|v| v.trim()).unwrap_or("");
            let Some(data_type) = infer_type(name, field_type, validation) else {
                continue;
            };
            let description = normalize_description(row.get(label_idx).map(String::as_str).unwrap_or(""));
            let notes = normalize_notes(row.get(choices_idx).map(String::as_str).unwrap_or(""));
            let codebook = match data_type {
                DataType::Categorical | DataType::Checkbox => {
                    Some(Codebook::parse(name, &notes)?)
                }
                _ => None,
            };
            let mut entry = DictionaryEntry::new(name, data_type)
                .with_description(description)
                .with_notes(notes);
            entry.codebook = codebook;
            entries.push(entry);
        }
        debug!(form, entries = entries.len(), "loaded schema catalog");
        Ok((Self { entries }, aliases))
    }

    /// Parse an already-normalized dictionary (the output format), the schema
    /// source for longitudinal data products.
    pub fn load_normalized(table: &CsvTable) -> Result<Self> {
        let name_idx = require_column(table, COLUMN_ELEMENT_NAME)?;
        let type_idx = require_column(table, COLUMN_DATA_TYPE)?;
        let description_idx = table.column_index(COLUMN_ELEMENT_DESCRIPTION);
        let notes_idx = table.column_index(COLUMN_NOTES);

        let mut entries = Vec::new();
        for row in &table.rows {
            let name = row.get(name_idx).map(|v| v.trim()).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let raw_type = row.get(type_idx).map(|v| v.trim()).unwrap_or("");
            let Some(data_type) = DataType::parse(raw_type) else {
                warn!(field = name, raw_type, "unknown data type in dictionary; skipping");
                continue;
            };
            let description = description_idx
                .and_then(|idx| row.get(idx))
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            let notes = notes_idx
                .and_then(|idx| row.get(idx))
                .map(|v| v.trim().to_string())
                .unwrap_or_default();
            let codebook = if notes.is_empty() || is_missing(&notes) {
                None
            } else if notes.contains(':') {
                Some(Codebook::parse_decorated(name, &notes)?)
            } else {
                None
            };
            let mut entry = DictionaryEntry::new(name, data_type)
                .with_description(description)
                .with_notes(notes);
            entry.codebook = codebook;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Render the catalog as the normalized dictionary table.
    ///
    /// Notes holds the reconstructed `"code: label | ..."` codebook string
    /// for coded fields.
    pub fn render_dictionary(&self) -> CsvTable {
        let headers = [
            COLUMN_ELEMENT_NAME,
            COLUMN_DATA_TYPE,
            "Size",
            COLUMN_REQUIRED,
            COLUMN_ELEMENT_DESCRIPTION,
            "ValueRange",
            COLUMN_NOTES,
            "Aliases",
        ];
        let mut table = CsvTable::new(headers.iter().map(|h| (*h).to_string()).collect());
        for entry in &self.entries {
            let notes = match &entry.codebook {
                Some(codebook) if entry.data_type == DataType::Categorical && !codebook.is_empty() => {
                    codebook.render()
                }
                _ => entry.notes.clone(),
            };
            table.rows.push(vec![
                entry.name.clone(),
                entry.data_type.as_str().to_string(),
                String::new(),
                if entry.required { "Required".to_string() } else { String::new() },
                entry.description.clone(),
                String::new(),
                notes,
                String::new(),
            ]);
        }
        table
    }

    /// Rename entries (and their self-referential descriptions) through the
    /// alias map. The alias applies to the base part of derived
    /// `"base: label"` names.
    pub fn apply_aliases(&mut self, aliases: &AliasMap) {
        for entry in &mut self.entries {
            let renamed = alias_name(&entry.name, aliases);
            if renamed != entry.name {
                if entry.description == entry.name {
                    entry.description = renamed.clone();
                }
                entry.name = renamed;
            }
        }
    }
}

/// Apply the alias map to a (possibly derived) field name.
pub fn alias_name(name: &str, aliases: &AliasMap) -> String {
    let base = match name.split_once(':') {
        Some((base, _)) => base,
        None => name,
    };
    match aliases.get(base.trim()) {
        Some(new_base) => {
            let suffix = &name[base.len()..];
            format!("{new_base}{suffix}")
        }
        None => name.to_string(),
    }
}

fn require_column(table: &CsvTable, column: &str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or_else(|| EtlError::MissingDictionaryColumn {
            column: column.to_string(),
        })
}

/// Map a raw field type and validation hint to the typed model.
///
/// Returns `None` for rows with no typed representation (free-form text,
/// descriptive blocks, notes).
fn infer_type(name: &str, field_type: &str, validation: &str) -> Option<DataType> {
    if validation.eq_ignore_ascii_case("number") {
        return Some(DataType::Integer);
    }
    match field_type.to_ascii_lowercase().as_str() {
        "radio" | "dropdown" => Some(DataType::Categorical),
        "yesno" => Some(DataType::Boolean),
        "checkbox" => Some(DataType::Checkbox),
        "text" | "descriptive" | "notes" => None,
        other => match DataType::parse(other) {
            Some(data_type) => Some(data_type),
            None => {
                warn!(field = name, field_type, "unsupported field type; skipping");
                None
            }
        },
    }
}

/// Canonicalize verbose multi-select instruction phrasings.
fn normalize_description(raw: &str) -> String {
    raw.trim()
        .replace("[SELECT ALL THAT APPLY]", "(check all that apply)")
        .replace("(Please check all that apply to you)", "(Check all that apply)")
}

fn normalize_notes(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_missing(trimmed) {
        return String::new();
    }
    trimmed.replace(" (list which ones below)", "")
}
