//! Data dictionary model: field types, codebooks, and dictionary entries.

use serde::{Deserialize, Serialize};

use crate::error::{EtlError, Result};

/// Typed classification of a dictionary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Categorical,
    Ordinal,
    Integer,
    String,
    Date,
    Time,
    DateTime,
    /// Multi-select survey item. Transient: removed from the schema once
    /// expanded into per-choice Boolean entries.
    Checkbox,
}

impl DataType {
    /// Parse a canonical type name (case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "boolean" => Some(Self::Boolean),
            "categorical" => Some(Self::Categorical),
            "ordinal" => Some(Self::Ordinal),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "datetime" => Some(Self::DateTime),
            "checkbox" => Some(Self::Checkbox),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Categorical => "Categorical",
            Self::Ordinal => "Ordinal",
            Self::Integer => "Integer",
            Self::String => "String",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::DateTime => "DateTime",
            Self::Checkbox => "Checkbox",
        }
    }

    /// Whether downstream consumers should treat the column as numerical.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Ordinal | Self::Integer)
    }
}

/// Ordered mapping from an integer code to a human-readable label.
///
/// Parsed once from raw dictionary notes (`"code, label | code, label | ..."`)
/// and shared by checkbox expansion, coercion, and scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codebook {
    entries: Vec<(i64, String)>,
}

impl Codebook {
    /// Parse raw notes text into an ordered codebook.
    ///
    /// Fragments are split on `|`, then each on its first `,`. Any fragment
    /// that does not yield an integer code and a non-empty label aborts the
    /// parse; schema construction is fail-fast.
    pub fn parse(field: &str, notes: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for fragment in notes.split('|') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            let (code, label) = fragment.split_once(',').ok_or_else(|| EtlError::SchemaParse {
                field: field.to_string(),
                fragment: fragment.to_string(),
            })?;
            let code: i64 = code.trim().parse().map_err(|_| EtlError::SchemaParse {
                field: field.to_string(),
                fragment: fragment.to_string(),
            })?;
            let label = label.trim();
            if label.is_empty() {
                return Err(EtlError::SchemaParse {
                    field: field.to_string(),
                    fragment: fragment.to_string(),
                });
            }
            entries.push((code, label.to_string()));
        }
        Ok(Self { entries })
    }

    /// Parse a decorated codebook string (`"code: label | ..."`), the form
    /// written into normalized dictionary Notes.
    pub fn parse_decorated(field: &str, notes: &str) -> Result<Self> {
        let mut entries = Vec::new();
        for fragment in notes.split('|') {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            let (code, label) = fragment.split_once(':').ok_or_else(|| EtlError::SchemaParse {
                field: field.to_string(),
                fragment: fragment.to_string(),
            })?;
            let code: i64 = code.trim().parse().map_err(|_| EtlError::SchemaParse {
                field: field.to_string(),
                fragment: fragment.to_string(),
            })?;
            entries.push((code, label.trim().to_string()));
        }
        Ok(Self { entries })
    }

    /// Codebook for a plain yes/no field.
    pub fn yes_no() -> Self {
        Self {
            entries: vec![(0, "No".to_string()), (1, "Yes".to_string())],
        }
    }

    pub fn label_for(&self, code: i64) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| label.as_str())
    }

    pub fn contains(&self, code: i64) -> bool {
        self.entries.iter().any(|(c, _)| *c == code)
    }

    /// Render one code as the decorated `"code: label"` form.
    pub fn decorated(&self, code: i64) -> Option<String> {
        self.label_for(code).map(|label| format!("{code}: {label}"))
    }

    /// Render the whole codebook as `"c0: l0 | c1: l1 | ..."`.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(code, label)| format!("{code}: {label}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.entries.iter().map(|(code, label)| (*code, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One typed field of the active schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Field name, unique within the schema after checkbox expansion.
    pub name: String,
    pub data_type: DataType,
    pub description: String,
    /// Raw codebook text as it appeared in the dictionary.
    pub notes: String,
    pub required: bool,
    /// Parsed codebook for coded fields, populated at schema construction.
    pub codebook: Option<Codebook>,
}

impl DictionaryEntry {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            description: String::new(),
            notes: String::new(),
            required: true,
            codebook: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_codebook(mut self, codebook: Codebook) -> Self {
        self.codebook = Some(codebook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pipe_delimited_codebook_in_order() {
        let codebook = Codebook::parse("exercise", "0, Never | 1, Sometimes | 2, Often")
            .expect("parse codebook");
        assert_eq!(codebook.len(), 3);
        assert_eq!(codebook.label_for(1), Some("Sometimes"));
        let codes: Vec<i64> = codebook.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec![0, 1, 2]);
    }

    #[test]
    fn label_keeps_embedded_commas() {
        let codebook = Codebook::parse("income", "1, Less than 10,000 | 2, More")
            .expect("parse codebook");
        assert_eq!(codebook.label_for(1), Some("Less than 10,000"));
    }

    #[test]
    fn malformed_fragment_fails_fast() {
        let err = Codebook::parse("exercise", "0, Never | not-a-pair").unwrap_err();
        match err {
            EtlError::SchemaParse { field, fragment } => {
                assert_eq!(field, "exercise");
                assert_eq!(fragment, "not-a-pair");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn renders_decorated_form() {
        let codebook = Codebook::parse("smoke", "0, No | 1, Yes").expect("parse codebook");
        assert_eq!(codebook.decorated(1).as_deref(), Some("1: Yes"));
        assert_eq!(codebook.render(), "0: No | 1: Yes");
    }

    #[test]
    fn data_type_round_trips_canonical_names() {
        for name in [
            "Boolean",
            "Categorical",
            "Ordinal",
            "Integer",
            "String",
            "Date",
            "Time",
            "DateTime",
        ] {
            let parsed = DataType::parse(name).expect("known type");
            assert_eq!(parsed.as_str(), name);
        }
        assert!(DataType::parse("freeform").is_none());
    }
}
