//! Library surface of the study ETL CLI.
//!
//! The binary lives in `main.rs`; this crate root exposes the logging
//! bootstrap for integration tests and embedders.

pub mod logging;
