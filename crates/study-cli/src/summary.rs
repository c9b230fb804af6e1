//! End-of-run summary tables.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

use study_core::{LongitudinalRunSummary, SurveyRunSummary};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    match result {
        RunResult::Survey(summary) => print_survey_summary(summary),
        RunResult::Longitudinal(summary) => print_longitudinal_summary(summary),
    }
}

fn print_survey_summary(summary: &SurveyRunSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Output"),
        header_cell("File"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Dictionary"),
        Cell::new(summary.dictionary_output.display()),
        Cell::new(summary.dictionary_shape.rows),
        Cell::new(summary.dictionary_shape.columns),
    ]);
    table.add_row(vec![
        Cell::new("Data"),
        Cell::new(summary.data_output.display()),
        Cell::new(summary.data_shape.rows),
        Cell::new(summary.data_shape.columns),
    ]);
    table.add_row(vec![
        Cell::new("Personality scores"),
        Cell::new(summary.personality_output.display()),
        Cell::new(summary.data_shape.rows),
        Cell::new(5),
    ]);
    table.add_row(vec![
        Cell::new("Motivation scores"),
        Cell::new(summary.motivation_output.display()),
        Cell::new(summary.data_shape.rows),
        Cell::new(5),
    ]);
    println!("{table}");
    println!(
        "coerced {} columns ({} cells rewritten), renamed {} multi-select columns",
        summary.coercion.columns_coerced,
        summary.coercion.cells_rewritten,
        summary.checkbox_columns_renamed
    );
}

fn print_longitudinal_summary(summary: &LongitudinalRunSummary) {
    println!("Product: {}", summary.product);
    println!("Output: {}", summary.output_path.display());
    println!("Rows: {}, columns: {}", summary.shape.rows, summary.shape.columns);
    if let Some(crop) = &summary.crop {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Crop"), header_cell("Count")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        table.add_row(vec![Cell::new("Participants in"), Cell::new(crop.participants_in)]);
        table.add_row(vec![Cell::new("Participants kept"), Cell::new(crop.participants_kept)]);
        table.add_row(vec![Cell::new("Rows in"), Cell::new(crop.rows_in)]);
        table.add_row(vec![Cell::new("Rows out"), Cell::new(crop.rows_out)]);
        table.add_row(vec![Cell::new("Rows removed"), Cell::new(crop.rows_removed())]);
        println!("{table}");
        if !crop.advisories.is_empty() {
            eprintln!("Advisories:");
            for advisory in &crop.advisories {
                eprintln!("- {advisory}");
            }
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}
