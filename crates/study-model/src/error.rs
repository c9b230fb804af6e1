use thiserror::Error;

/// Errors raised by schema construction, type coercion, and scoring.
///
/// Schema-scoped errors abort the whole run; participant-scoped gaps are
/// handled by the cropper (skip + advisory) and never reach this enum.
#[derive(Debug, Error)]
pub enum EtlError {
    /// A codebook fragment in a dictionary entry could not be parsed.
    #[error("field `{field}`: unparsable codebook fragment `{fragment}`")]
    SchemaParse { field: String, fragment: String },

    /// Checkbox expansion produced a derived entry name that already exists.
    #[error("duplicate schema entry `{name}` after checkbox expansion")]
    DuplicateEntry { name: String },

    /// A required canonical column is missing from the dictionary file.
    #[error("dictionary is missing required column `{column}`")]
    MissingDictionaryColumn { column: String },

    /// An observed value is absent from the field's codebook.
    ///
    /// The code is kept as raw text so non-numeric garbage in a coded
    /// column is reportable with the offending value intact.
    #[error("field `{field}`: code `{code}` not found in codebook")]
    CodeNotFound { field: String, code: String },

    /// A raw value could not be coerced to its field's type.
    #[error("field `{field}`: cannot coerce `{value}` to {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },

    /// A participant lacks window metadata required by the caller.
    #[error("participant `{participant}`: {detail}")]
    MissingMetadata { participant: String, detail: String },

    /// An instrument did not have the expected shape.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EtlError>;
