//! Cell-value helpers: the missing sentinel, code parsing, and clock/date
//! normalization shared by coercion, cropping, and scoring.

use chrono::{NaiveDate, NaiveTime, Timelike};

/// Whether a raw cell is the missing sentinel.
///
/// Empty cells and the literal `nan` (any case) both mean missing. Missing
/// cells are never transformed anywhere in the pipeline.
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

/// Parse an integer code, tolerating a float rendering like `"3.0"`.
pub fn parse_code(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(code) = trimmed.parse::<i64>() {
        return Some(code);
    }
    let parsed = trimmed.parse::<f64>().ok()?;
    if parsed.fract() == 0.0 {
        Some(parsed as i64)
    } else {
        None
    }
}

/// The leading code of a decorated `"code: label"` cell.
pub fn code_prefix(value: &str) -> Option<i64> {
    let (code, _) = value.split_once(':')?;
    code.trim().parse().ok()
}

/// Parse a `%Y-%m-%d` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a clock time: `H:MM`, `H:MM:SS`, optionally with an AM/PM suffix.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    for format in ["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"] {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Some(time);
        }
    }
    None
}

/// Render a clock time as `HH:MM:SS`.
pub fn format_clock(time: NaiveTime) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// The path component of a URL, without scheme, host, or leading slash.
pub fn url_path(value: &str) -> String {
    let rest = match value.find("://") {
        Some(idx) => &value[idx + 3..],
        None => value,
    };
    match rest.find('/') {
        Some(idx) => rest[idx + 1..].to_string(),
        None => String::new(),
    }
}

/// The point value of a Likert label of the form `"code: points = text"`.
pub fn likert_points(value: &str) -> Option<i64> {
    let (_, rest) = value.split_once(':')?;
    let (points, _) = rest.split_once('=')?;
    points.trim().parse().ok()
}
