//! Result types shared by commands and summary rendering.

use serde::Serialize;

use study_core::{LongitudinalRunSummary, SurveyRunSummary};

/// Outcome of one CLI invocation, printable and machine-serializable.
#[derive(Debug, Clone, Serialize)]
pub enum RunResult {
    Survey(SurveyRunSummary),
    Longitudinal(LongitudinalRunSummary),
}
