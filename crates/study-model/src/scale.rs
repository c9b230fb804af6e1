//! Composite scale definitions.
//!
//! Definitions are built from convention-matched column names at run start,
//! consumed once by the scorer, and not persisted.

use serde::{Deserialize, Serialize};

/// One scored item of a scale, optionally reverse-coded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleItem {
    /// Column name carrying the coded item.
    pub field: String,
    /// Whether the item's labels are mirrored around the scale center
    /// before scoring.
    pub reverse: bool,
}

impl ScaleItem {
    pub fn plain(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reverse: false,
        }
    }

    pub fn reversed(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reverse: true,
        }
    }
}

/// A two-item personality-dimension score; one item is reverse-coded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BipolarScale {
    pub name: String,
    pub items: [ScaleItem; 2],
}

/// A score derived as the mean of several coded items, no reverse-coding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiItemScale {
    pub name: String,
    pub items: Vec<String>,
}
