//! Module for handling date and timestamp parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Configuration for date format handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// List of date-time format strings to try when parsing timestamps
    pub timestamp_formats: Vec<String>,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%d-%m-%Y".to_string(), // European: 15-01-2023
                // Appointment exports are day-first; month-first only when that fails
                "%d/%m/%Y".to_string(), // UK: 15/01/2023
                "%m/%d/%Y".to_string(), // US: 01/15/2023
                "%d.%m.%Y".to_string(), // 15.01.2023
                "%Y%m%d".to_string(),   // Compact: 20230115
                "%d %b %Y".to_string(), // 15 Jan 2023
                "%d %B %Y".to_string(), // 15 January 2023
            ],
            timestamp_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
                "%d/%m/%Y %H:%M:%S".to_string(),
                "%d/%m/%Y %H:%M".to_string(),
                "%m/%d/%Y %H:%M".to_string(),
            ],
            enable_format_detection: true,
        }
    }
}

/// Parse a date string with multiple format attempts
///
/// Date-time strings are accepted too; the time part is discarded.
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    parse_datetime_only(s, config).map(|dt| dt.date())
}

/// Parse a timestamp string; plain dates resolve to midnight
#[must_use]
pub fn parse_timestamp_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    parse_datetime_only(s, config).or_else(|| {
        parse_date_string(s, config).and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

fn parse_datetime_only(s: &str, config: &DateFormatConfig) -> Option<NaiveDateTime> {
    for format in &config.timestamp_formats {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, format) {
            return Some(datetime);
        }
    }

    // Offsets are dropped; the wall-clock time is what the booking desk saw
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    // YYYY-MM-DD
    if s.len() == 10 && s.chars().nth(4) == Some('-') && s.chars().nth(7) == Some('-') {
        return Some("%Y-%m-%d");
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d");
            } else if parts[2].len() == 4 {
                if parts[0].parse::<u8>().is_ok() {
                    return Some("%d/%m/%Y");
                }
            }
        }
    }

    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y");
        }
    }

    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return Some("%Y%m%d");
    }

    None
}
