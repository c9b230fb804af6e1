//! Subcommand runners.

use std::path::Path;

use anyhow::{Result, bail};
use chrono::Local;

use study_core::{LongitudinalConfig, SurveyConfig, process_longitudinal, process_survey};

use crate::cli::{CropArgs, SurveyArgs};
use crate::types::RunResult;

const USAGE_HINT: &str =
    "study-etl survey -d <data_dict> -f <data> -o <out_data_folder> -p <out_data_dict_folder>";

/// Run the survey normalization pipeline.
pub fn run_survey(args: &SurveyArgs) -> Result<RunResult> {
    if args.data_dict.as_os_str().is_empty() || args.data.as_os_str().is_empty() {
        bail!("please enter the following command: {USAGE_HINT}");
    }
    check_output_folder(&args.out_data_folder, "data")?;
    check_output_folder(&args.out_data_dict_folder, "data dictionary")?;

    let config = SurveyConfig {
        dictionary_path: args.data_dict.clone(),
        data_path: args.data.clone(),
        output_data_dir: args.out_data_folder.clone(),
        output_dictionary_dir: args.out_data_dict_folder.clone(),
        form: args.form.clone(),
    };
    let summary = process_survey(&config)?;
    Ok(RunResult::Survey(summary))
}

/// Run the longitudinal load/crop/coerce pipeline.
pub fn run_crop(args: &CropArgs) -> Result<RunResult> {
    let config = LongitudinalConfig {
        catalog_path: args.catalog.clone(),
        data_dir: args.data_dir.clone(),
        dictionary_dir: args.dict_dir.clone(),
        product: args.product.clone(),
        participant_type: args.participant_type.clone(),
        crop: !args.no_crop,
        crop_end: !args.no_crop_end,
        output_path: args.output.clone(),
    };
    let summary = process_longitudinal(&config, Local::now().date_naive())?;
    Ok(RunResult::Longitudinal(summary))
}

/// A named output folder must exist before the run writes into it.
fn check_output_folder(folder: &Path, what: &str) -> Result<()> {
    if !folder.as_os_str().is_empty() && !folder.exists() {
        bail!(
            "{} folder for {what} does not exist!\nplease enter the following command: {USAGE_HINT}",
            folder.display()
        );
    }
    Ok(())
}
