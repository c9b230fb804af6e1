//! Tests for reverse-coding and composite scale scoring.

use study_core::scales::{
    agreement_reverse_map, compute_bipolar_scales, compute_multiitem_scales,
    motivation_definitions, reverse_code, tipi_definitions,
};
use study_ingest::CsvTable;
use study_model::EtlError;

fn table_of(headers: &[&str], rows: &[Vec<&str>]) -> CsvTable {
    let mut table = CsvTable::new(headers.iter().map(|h| (*h).to_string()).collect());
    for row in rows {
        table.rows.push(row.iter().map(|v| (*v).to_string()).collect());
    }
    table
}

#[test]
fn reverse_map_is_symmetric_around_center() {
    let map = agreement_reverse_map();
    assert_eq!(
        map.get("0: 1 = Disagree strongly").map(String::as_str),
        Some("6: 7 = Agree strongly")
    );
    assert_eq!(
        map.get("3: 4 = Neither agree nor disagree").map(String::as_str),
        Some("3: 4 = Neither agree nor disagree")
    );
    // Applying the relabeling twice restores every label.
    for (from, to) in &map {
        assert_eq!(map.get(to), Some(from));
    }
}

#[test]
fn reverse_code_passes_missing_and_rejects_unknown_labels() {
    let map = agreement_reverse_map();
    let values = vec![
        "6: 7 = Agree strongly".to_string(),
        "nan".to_string(),
        String::new(),
    ];
    let reversed = reverse_code("item", &values, &map).expect("reverse");
    assert_eq!(reversed[0], "0: 1 = Disagree strongly");
    assert_eq!(reversed[1], "nan");
    assert_eq!(reversed[2], "");

    let bad = vec!["7: 8 = Off the scale".to_string()];
    let err = reverse_code("item", &bad, &map).unwrap_err();
    assert!(matches!(err, EtlError::CodeNotFound { .. }));
}

const TIPI_HEADERS: [&str; 11] = [
    "study_id",
    "TIPI extravert 1",
    "TIPI critical 2",
    "TIPI dependable 3",
    "TIPI anxious 4",
    "TIPI open 5",
    "TIPI reserved 6",
    "TIPI sympathetic 7",
    "TIPI disorganized 8",
    "TIPI calm 9",
    "TIPI conventional 10",
];

#[test]
fn personality_definitions_pair_items_by_number() {
    let headers: Vec<String> = TIPI_HEADERS.iter().map(|h| (*h).to_string()).collect();
    let scales = tipi_definitions(&headers).expect("definitions");
    assert_eq!(scales.len(), 5);
    let extraversion = &scales[0];
    assert_eq!(extraversion.name, "Extraversion");
    assert_eq!(extraversion.items[0].field, "TIPI extravert 1");
    assert!(!extraversion.items[0].reverse);
    assert_eq!(extraversion.items[1].field, "TIPI reserved 6");
    assert!(extraversion.items[1].reverse);
}

#[test]
fn personality_definitions_require_all_items() {
    let headers = vec!["study_id".to_string(), "TIPI extravert 1".to_string()];
    let err = tipi_definitions(&headers).unwrap_err();
    assert!(matches!(err, EtlError::Configuration(_)));
}

#[test]
fn bipolar_score_ignores_a_missing_operand() {
    let mut row: Vec<&str> = vec!["101"];
    // extravert 1 = "3: 4 = ..." (4 points), everything else missing.
    row.push("3: 4 = Neither agree nor disagree");
    row.extend(["nan"; 9]);
    let table = table_of(&TIPI_HEADERS, &[row]);
    let scales = tipi_definitions(&table.headers).expect("definitions");
    let scores = compute_bipolar_scales(&table, "study_id", &scales).expect("score");
    // Extraversion: one operand missing, score equals the present one.
    assert_eq!(scores.rows[0][0], Some(4.0));
    // Agreeableness: both operands missing, score is missing.
    assert_eq!(scores.rows[0][1], None);
}

#[test]
fn bipolar_score_averages_reverse_coded_items() {
    let mut row: Vec<&str> = vec!["101"];
    // extravert 1 = 2 points; reserved 6 raw = 6 points, reverse-coded to 2.
    row.push("1: 2 = Disagree moderately");
    row.extend(["nan"; 4]);
    row.push("5: 6 = Agree moderately");
    row.extend(["nan"; 4]);
    let table = table_of(&TIPI_HEADERS, &[row]);
    let scales = tipi_definitions(&table.headers).expect("definitions");
    let scores = compute_bipolar_scales(&table, "study_id", &scales).expect("score");
    assert_eq!(scores.rows[0][0], Some(2.0));
}

fn motivation_headers() -> Vec<String> {
    let mut headers = vec!["study_id".to_string()];
    for number in 1..=19 {
        headers.push(format!("motivation item {number}"));
    }
    headers
}

#[test]
fn motivation_cardinality_guard_rejects_wrong_shape() {
    let mut headers = motivation_headers();
    headers.pop();
    let err = motivation_definitions(&headers).unwrap_err();
    match err {
        EtlError::Configuration(message) => {
            assert!(message.contains("19"));
            assert!(message.contains("18"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn motivation_subscales_average_members_ignoring_missing() {
    let headers = motivation_headers();
    let mut row = vec!["101".to_string()];
    for number in 1..=19 {
        // Items 5 and 9 score 4 and 2, item 12 missing, item 19 scores 0.
        row.push(match number {
            5 => "4: Very true for me".to_string(),
            9 => "2: Sometimes true for me".to_string(),
            12 => "nan".to_string(),
            19 => "0: Not true for me".to_string(),
            _ => "1: Rarely true for me".to_string(),
        });
    }
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let row_refs: Vec<&str> = row.iter().map(String::as_str).collect();
    let table = table_of(&header_refs, &[row_refs]);

    let scales = motivation_definitions(&table.headers).expect("definitions");
    let scores = compute_multiitem_scales(&table, "study_id", &scales).expect("score");
    assert_eq!(scores.scales[0], "Amotivation");
    // Amotivation members are items 5, 9, 12, 19 -> mean of {4, 2, 0}.
    assert_eq!(scores.rows[0][0], Some(2.0));
    // External regulation members all score 1.
    assert_eq!(scores.rows[0][1], Some(1.0));
}

#[test]
fn score_table_renders_missing_as_empty() {
    let headers = motivation_headers();
    let mut row = vec!["101".to_string()];
    row.extend(std::iter::repeat_n("nan".to_string(), 19));
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let row_refs: Vec<&str> = row.iter().map(String::as_str).collect();
    let table = table_of(&header_refs, &[row_refs]);

    let scales = motivation_definitions(&table.headers).expect("definitions");
    let scores = compute_multiitem_scales(&table, "study_id", &scales).expect("score");
    let rendered = scores.to_csv_table();
    assert_eq!(rendered.headers[0], "study_id");
    assert_eq!(rendered.rows[0][0], "101");
    assert!(rendered.rows[0][1..].iter().all(String::is_empty));
}
