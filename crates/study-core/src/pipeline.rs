//! Batch pipelines: survey normalization and longitudinal product loading.
//!
//! Stage order is fixed: schema, expansion, coercion, cropping, scoring.
//! Each stage consumes the complete output of the previous one. Schema-level
//! errors abort the run; participant-level gaps are advisories in the stats.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, info_span};

use study_ingest::{
    CsvTable, read_catalog, read_csv_table, read_participants, load_participant_exports,
    write_csv_table,
};
use study_model::{DataType, DictionaryEntry};

use crate::checkbox::CheckboxExpander;
use crate::coerce::{CoercionStats, coerce};
use crate::crop::{CropStats, crop_high_frequency, crop_standard};
use crate::frame::LongFrame;
use crate::scales::{
    compute_bipolar_scales, compute_multiitem_scales, motivation_definitions, tipi_definitions,
};
use crate::schema::{SchemaCatalog, alias_name};
use crate::values::{is_missing, parse_code};

/// Participant id column of the survey data export.
const SURVEY_ID_COLUMN: &str = "study_id";

const OUTPUT_DICTIONARY: &str = "baseline-survey.csv";
const OUTPUT_DATA: &str = "baseline-survey-data.csv";
const OUTPUT_PERSONALITY: &str = "baseline-survey-tipi.csv";
const OUTPUT_MOTIVATION: &str = "baseline-survey-motivation.csv";

/// Inputs for the survey normalization pipeline.
#[derive(Debug, Clone)]
pub struct SurveyConfig {
    pub dictionary_path: PathBuf,
    pub data_path: PathBuf,
    pub output_data_dir: PathBuf,
    pub output_dictionary_dir: PathBuf,
    pub form: String,
}

impl SurveyConfig {
    pub fn new(dictionary_path: PathBuf, data_path: PathBuf) -> Self {
        Self {
            dictionary_path,
            data_path,
            output_data_dir: PathBuf::new(),
            output_dictionary_dir: PathBuf::new(),
            form: "baseline_survey_2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TableShape {
    pub rows: usize,
    pub columns: usize,
}

impl TableShape {
    fn of(table: &CsvTable) -> Self {
        Self {
            rows: table.height(),
            columns: table.width(),
        }
    }
}

/// What the survey pipeline produced.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyRunSummary {
    pub dictionary_output: PathBuf,
    pub data_output: PathBuf,
    pub personality_output: PathBuf,
    pub motivation_output: PathBuf,
    pub dictionary_shape: TableShape,
    pub data_shape: TableShape,
    pub checkbox_columns_renamed: usize,
    pub coercion: CoercionStats,
}

/// Run the survey normalization pipeline end to end.
pub fn process_survey(config: &SurveyConfig) -> Result<SurveyRunSummary> {
    let span = info_span!("survey", form = %config.form);
    let _guard = span.enter();
    let start = Instant::now();

    let dictionary_table = read_csv_table(&config.dictionary_path)
        .with_context(|| format!("read dictionary: {}", config.dictionary_path.display()))?;
    let (schema, aliases) =
        SchemaCatalog::load(&dictionary_table, &config.form).context("parse dictionary")?;

    let expander = CheckboxExpander::from_schema(&schema);
    let mut schema = expander.expand_schema(&schema).context("expand checkbox entries")?;

    let mut data = read_csv_table(&config.data_path)
        .with_context(|| format!("read data: {}", config.data_path.display()))?;
    data.drop_column(&format!("{}_complete", config.form));

    let renamed = expander
        .rename_data_columns(&mut data)
        .context("rename multi-select columns")?;
    let coercion = coerce(&mut data, &schema).context("coerce data values")?;

    schema.apply_aliases(&aliases);
    for header in &mut data.headers {
        *header = alias_name(header, &aliases);
    }
    apply_gender_rename(&mut data, &mut schema);

    let dictionary_out = schema.render_dictionary();
    let dictionary_output = config.output_dictionary_dir.join(OUTPUT_DICTIONARY);
    write_csv_table(&dictionary_output, &dictionary_out)
        .with_context(|| format!("write dictionary: {}", dictionary_output.display()))?;
    let data_output = config.output_data_dir.join(OUTPUT_DATA);
    write_csv_table(&data_output, &data)
        .with_context(|| format!("write data: {}", data_output.display()))?;

    let personality = tipi_definitions(&data.headers).context("match personality items")?;
    let personality_scores = compute_bipolar_scales(&data, SURVEY_ID_COLUMN, &personality)
        .context("score personality dimensions")?;
    let personality_output = config.output_data_dir.join(OUTPUT_PERSONALITY);
    write_csv_table(&personality_output, &personality_scores.to_csv_table())
        .with_context(|| format!("write personality scores: {}", personality_output.display()))?;

    let motivation = motivation_definitions(&data.headers).context("match motivation items")?;
    let motivation_scores = compute_multiitem_scales(&data, SURVEY_ID_COLUMN, &motivation)
        .context("score motivation subscales")?;
    let motivation_output = config.output_data_dir.join(OUTPUT_MOTIVATION);
    write_csv_table(&motivation_output, &motivation_scores.to_csv_table())
        .with_context(|| format!("write motivation scores: {}", motivation_output.display()))?;

    info!(
        rows = data.height(),
        columns = data.width(),
        checkbox_columns = renamed,
        duration_ms = start.elapsed().as_millis(),
        "survey pipeline complete"
    );
    Ok(SurveyRunSummary {
        dictionary_output,
        data_output,
        personality_output,
        motivation_output,
        dictionary_shape: TableShape::of(&dictionary_out),
        data_shape: TableShape::of(&data),
        checkbox_columns_renamed: renamed,
        coercion,
    })
}

/// The documented `sex` → `gender` rename-and-remap.
///
/// The raw export calls the column `sex` with bare 0/1 codes; the normalized
/// output uses `gender` with decorated values. Missing cells pass through.
fn apply_gender_rename(data: &mut CsvTable, schema: &mut SchemaCatalog) {
    let Some(col) = data.column_index("sex") else {
        return;
    };
    data.headers[col] = "gender".to_string();
    for row in &mut data.rows {
        let Some(cell) = row.get_mut(col) else {
            continue;
        };
        if is_missing(cell) || cell.contains(':') {
            continue;
        }
        match parse_code(cell) {
            Some(0) => *cell = "0: Female".to_string(),
            Some(_) => *cell = "1: Male".to_string(),
            None => {}
        }
    }
    if !schema.contains("gender") {
        schema.insert_front(
            DictionaryEntry::new("gender", DataType::Boolean)
                .with_description("Gender of the participant (0: Female, 1: Male)"),
        );
    }
}

/// Inputs for loading one longitudinal data product.
#[derive(Debug, Clone)]
pub struct LongitudinalConfig {
    pub catalog_path: PathBuf,
    pub data_dir: PathBuf,
    pub dictionary_dir: PathBuf,
    pub product: String,
    pub participant_type: String,
    pub crop: bool,
    pub crop_end: bool,
    pub output_path: PathBuf,
}

/// What the longitudinal pipeline produced.
#[derive(Debug, Clone, Serialize)]
pub struct LongitudinalRunSummary {
    pub product: String,
    pub output_path: PathBuf,
    pub shape: TableShape,
    pub crop: Option<CropStats>,
    pub coercion: CoercionStats,
}

/// Densely sampled products are cropped by end date only; the feed starts
/// at the intervention start by construction.
fn is_high_frequency(product: &str) -> bool {
    product.to_ascii_lowercase().contains("per minute")
}

/// Load, crop, and coerce one longitudinal data product.
pub fn process_longitudinal(
    config: &LongitudinalConfig,
    today: NaiveDate,
) -> Result<LongitudinalRunSummary> {
    let span = info_span!("longitudinal", product = %config.product);
    let _guard = span.enter();
    let start = Instant::now();

    let catalog = read_catalog(&config.catalog_path)
        .with_context(|| format!("read catalog: {}", config.catalog_path.display()))?;
    let product = catalog.product(&config.product).context("resolve product")?;
    let roster_file = catalog
        .product("Participant Information")
        .context("resolve participant information product")?;
    let roster = read_participants(&config.data_dir.join(&roster_file.data_file_name))
        .context("read participant metadata")?
        .of_type(&config.participant_type);

    let table = load_participant_exports(&config.data_dir, &product.data_file_name, &roster)
        .context("load participant exports")?;
    let mut frame = LongFrame::new(table, &product.index_fields)
        .context("index stitched exports")?;
    frame.sort();

    let dictionary_table = read_csv_table(&config.dictionary_dir.join(&product.dictionary_file_name))
        .with_context(|| format!("read product dictionary: {}", product.dictionary_file_name))?;
    let schema = SchemaCatalog::load_normalized(&dictionary_table)
        .context("parse product dictionary")?;

    let crop_stats = if config.crop {
        let (cropped, stats) = if is_high_frequency(&config.product) {
            crop_high_frequency(&frame, &roster).context("crop by end date")?
        } else {
            crop_standard(&frame, &roster, config.crop_end, today)
                .context("crop to participant windows")?
        };
        frame = cropped;
        Some(stats)
    } else {
        None
    };

    let coercion = coerce(&mut frame.table, &schema).context("coerce data values")?;
    write_csv_table(&config.output_path, &frame.table)
        .with_context(|| format!("write output: {}", config.output_path.display()))?;

    info!(
        rows = frame.height(),
        participants = roster.len(),
        duration_ms = start.elapsed().as_millis(),
        "longitudinal pipeline complete"
    );
    Ok(LongitudinalRunSummary {
        product: config.product.clone(),
        output_path: config.output_path.clone(),
        shape: TableShape::of(&frame.table),
        crop: crop_stats,
        coercion,
    })
}
