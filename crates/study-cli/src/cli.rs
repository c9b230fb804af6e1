//! CLI argument definitions for the study ETL tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "study-etl",
    version,
    about = "Normalize study survey and sensor exports into analysis-ready tables",
    long_about = "Schema-driven ETL for longitudinal study exports.\n\n\
                  Parses the field dictionary, expands multi-select items into\n\
                  indicator columns, coerces values per field type, crops records\n\
                  to participant study windows, and derives composite scale scores."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow participant-level values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Print the run summary as JSON instead of a table.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize the baseline survey export and derive scale scores.
    Survey(SurveyArgs),

    /// Load, crop, and coerce a longitudinal data product.
    Crop(CropArgs),
}

#[derive(Parser)]
pub struct SurveyArgs {
    /// Path to the raw field dictionary CSV.
    #[arg(short = 'd', long = "data-dict", value_name = "PATH")]
    pub data_dict: PathBuf,

    /// Path to the raw survey data CSV.
    #[arg(short = 'f', long = "data", value_name = "PATH")]
    pub data: PathBuf,

    /// Folder for the normalized data and score tables.
    #[arg(short = 'o', long = "out-data-folder", value_name = "DIR", default_value = "")]
    pub out_data_folder: PathBuf,

    /// Folder for the normalized dictionary.
    #[arg(short = 'p', long = "out-data-dict-folder", value_name = "DIR", default_value = "")]
    pub out_data_dict_folder: PathBuf,

    /// Form identifier to keep from the dictionary.
    #[arg(long = "form", default_value = "baseline_survey_2")]
    pub form: String,
}

#[derive(Parser)]
pub struct CropArgs {
    /// Path to the data catalog CSV.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: PathBuf,

    /// Folder containing per-participant export files.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Folder containing normalized product dictionaries.
    #[arg(long = "dict-dir", value_name = "DIR")]
    pub dict_dir: PathBuf,

    /// Data product name from the catalog.
    #[arg(long = "product", value_name = "NAME")]
    pub product: String,

    /// Participant type to include.
    #[arg(long = "participant-type", default_value = "full")]
    pub participant_type: String,

    /// Skip cropping entirely (load and coerce only).
    #[arg(long = "no-crop")]
    pub no_crop: bool,

    /// Skip the end-date crop for withdrew participants.
    #[arg(long = "no-crop-end")]
    pub no_crop_end: bool,

    /// Output CSV path.
    #[arg(long = "output", value_name = "PATH")]
    pub output: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
