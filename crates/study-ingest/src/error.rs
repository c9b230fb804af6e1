use std::path::PathBuf;

use thiserror::Error;

/// Errors from file discovery and tabular loading.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}: missing required column `{column}`")]
    MissingColumn { column: String, path: PathBuf },

    #[error("failed to read csv {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to write csv {path}: {source}")]
    CsvWrite { path: PathBuf, source: csv::Error },

    #[error("data catalog has no product named `{product}`")]
    UnknownProduct { product: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
