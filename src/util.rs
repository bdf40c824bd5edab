// Utility helpers for timestamp parsing and number formatting.
//
// Timestamps and years are parsed strictly and return `ReportError` on bad
// input. Day averages are rendered with one decimal, ties away from zero.
use crate::error::{ReportError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Parse a timestamp string into calendar fields.
///
/// - RFC 3339 values keep the calendar fields of their own offset.
/// - `YYYY-MM-DDTHH:MM:SS[.fff]` and `YYYY-MM-DD HH:MM:SS` are taken as-is.
/// - A bare `YYYY-MM-DD` means midnight of that day.
///
/// `field` names the offending column/record in the error.
pub fn parse_timestamp(s: &str, field: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt);
    }
    Err(ReportError::InvalidTimestamp {
        field: field.to_string(),
        value: s.to_string(),
    })
}

pub fn parse_optional_timestamp(s: Option<&str>, field: &str) -> Result<Option<NaiveDateTime>> {
    match s.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_timestamp(v, field).map(Some),
    }
}

/// Parse a four-digit report year such as `"2024"`.
pub fn parse_year(s: &str) -> Result<i32> {
    let t = s.trim();
    if t.len() != 4 || !t.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReportError::InvalidYear(s.to_string()));
    }
    t.parse::<i32>()
        .map_err(|_| ReportError::InvalidYear(s.to_string()))
}

/// Signed, fractional number of days from `start` to `end`.
pub fn days_between(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Render an average processing time, e.g. `3.2 days`.
///
/// An empty bucket renders as the literal `0 days`, not `0.0 days`. Ties
/// round away from zero, so 0.25 renders as `0.3 days`.
pub fn format_average_days(total_days: f64, count: usize) -> String {
    if count == 0 {
        return "0 days".to_string();
    }
    let avg = total_days / count as f64;
    format!("{:.1} days", (avg * 10.0).round() / 10.0)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages, e.g. `9,855 documents loaded`.
    n.to_formatted_string(&Locale::en)
}
