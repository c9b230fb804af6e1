//! End-to-end longitudinal pipeline test over a small synthetic study folder.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use study_core::pipeline::{LongitudinalConfig, process_longitudinal};
use study_ingest::read_csv_table;

fn write_study_folder(dir: &Path) {
    fs::write(
        dir.join("catalog.csv"),
        "Data Product Name,Data File Name,Data Dictionary File Name,Index Fields,Data Product Description\n\
         Participant Information,participants.csv,,Participant ID,Study roster\n\
         Daily Metrics,daily-metrics,daily-metrics-dict.csv,Subject ID; Date,Daily activity summary\n\
         Heart Rate Per Minute,heart-rate,heart-rate-dict.csv,Subject ID; time,Per-minute heart rate\n",
    )
    .unwrap();
    fs::write(
        dir.join("participants.csv"),
        "Participant ID,Intervention Start Date,End Date,Participant Status,Participant Type\n\
         105,2020-06-10,,active,full\n\
         107,2020-06-01,2020-06-15,withdrew,full\n",
    )
    .unwrap();
    fs::write(
        dir.join("daily-metrics-dict.csv"),
        "ElementName,DataType,Size,Required,ElementDescription,ValueRange,Notes,Aliases\n\
         steps,Integer,,Required,Total daily steps,,,\n",
    )
    .unwrap();
    fs::write(
        dir.join("U01.daily-metrics.w1.105.csv"),
        "Date,steps\n2020-06-05,400\n2020-06-12,900\n",
    )
    .unwrap();
    fs::write(
        dir.join("U01.daily-metrics.w1.107.csv"),
        "Date,steps\n2020-06-10,700\n2020-06-20,100\n",
    )
    .unwrap();
    fs::write(
        dir.join("heart-rate-dict.csv"),
        "ElementName,DataType,Size,Required,ElementDescription,ValueRange,Notes,Aliases\n\
         heart_rate,Integer,,Required,Heart rate,,,\n\
         date,Date,,Required,Sample date,,,\n",
    )
    .unwrap();
    fs::write(
        dir.join("U01.heart-rate.w1.107.csv"),
        "time,date,heart_rate\n08:00:00,2020-06-14,64\n08:01:00,2020-06-20,70\n",
    )
    .unwrap();
}

fn today() -> NaiveDate {
    NaiveDate::parse_from_str("2020-07-01", "%Y-%m-%d").unwrap()
}

#[test]
fn daily_product_is_cropped_to_participant_windows() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study_folder(dir.path());
    let output_path = dir.path().join("daily-metrics-out.csv");

    let config = LongitudinalConfig {
        catalog_path: dir.path().join("catalog.csv"),
        data_dir: dir.path().to_path_buf(),
        dictionary_dir: dir.path().to_path_buf(),
        product: "Daily Metrics".to_string(),
        participant_type: "full".to_string(),
        crop: true,
        crop_end: true,
        output_path: output_path.clone(),
    };
    let summary = process_longitudinal(&config, today()).expect("run pipeline");

    let out = read_csv_table(&output_path).expect("read output");
    assert_eq!(out.headers, vec!["Subject ID", "Date", "steps"]);
    // 105 loses the pre-intervention row; withdrew 107 loses the row after
    // the end date.
    assert_eq!(out.rows.len(), 2);
    assert_eq!(out.rows[0], vec!["105", "2020-06-12", "900"]);
    assert_eq!(out.rows[1], vec!["107", "2020-06-10", "700"]);

    let crop = summary.crop.expect("crop stats");
    assert_eq!(crop.rows_in, 4);
    assert_eq!(crop.rows_out, 2);
}

#[test]
fn per_minute_product_skips_the_start_crop() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_study_folder(dir.path());
    let output_path = dir.path().join("heart-rate-out.csv");

    let config = LongitudinalConfig {
        catalog_path: dir.path().join("catalog.csv"),
        data_dir: dir.path().to_path_buf(),
        dictionary_dir: dir.path().to_path_buf(),
        product: "Heart Rate Per Minute".to_string(),
        participant_type: "full".to_string(),
        crop: true,
        crop_end: true,
        output_path: output_path.clone(),
    };
    process_longitudinal(&config, today()).expect("run pipeline");

    let out = read_csv_table(&output_path).expect("read output");
    // Only the end-date crop applies for the withdrew participant.
    assert_eq!(out.rows.len(), 1);
    assert_eq!(out.rows[0], vec!["107", "08:00:00", "2020-06-14", "64"]);
}
