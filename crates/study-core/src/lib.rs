pub mod checkbox;
pub mod coerce;
pub mod crop;
pub mod frame;
pub mod pipeline;
pub mod resample;
pub mod scales;
pub mod schema;
pub mod values;

pub use checkbox::{CheckboxExpander, ColumnKind};
pub use coerce::{CoercionStats, coerce};
pub use crop::{CropStats, crop_high_frequency, crop_standard};
pub use frame::LongFrame;
pub use pipeline::{
    LongitudinalConfig, LongitudinalRunSummary, SurveyConfig, SurveyRunSummary, TableShape,
    process_longitudinal, process_survey,
};
pub use resample::resample_per_minute;
pub use scales::{
    ScoreTable, agreement_reverse_map, compute_bipolar_scales, compute_multiitem_scales,
    motivation_definitions, reverse_code, tipi_definitions,
};
pub use schema::{AliasMap, SchemaCatalog, alias_name};
