//! Shared date and column helpers for the bulletin parsers
//!
//! The bulletin prints day columns as `"Oct 23"` style labels padded with at
//! least two spaces, so a single space is part of a token and two or more
//! spaces separate columns.
//!
//! # Examples
//!
//! ```
//! use space_weather_forecast::utils::split_columns;
//!
//! assert_eq!(
//!     split_columns("             Oct 23       Oct 24       Oct 25"),
//!     vec!["Oct 23", "Oct 24", "Oct 25"]
//! );
//! assert_eq!(split_columns("1.33   4.67 (G1)   2.33"), vec!["1.33", "4.67 (G1)", "2.33"]);
//! ```

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Month abbreviations as printed in bulletin day labels, indexed 0 (Jan) to 11 (Dec).
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const DECEMBER: u32 = 11;
pub const JANUARY: u32 = 0;

static COLUMN_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4})\s*$").unwrap());
// Issued timestamps lead with the year; a later 4-digit token is a UTC time
static LEADING_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d{4})\b").unwrap());

/// Zero-based month index for a 3-letter abbreviation ("Oct" -> 9)
pub fn month_index(abbr: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbr))
        .map(|idx| idx as u32)
}

/// Split a table line into columns on runs of two or more whitespace characters
pub fn split_columns(line: &str) -> Vec<&str> {
    COLUMN_GAP
        .split(line.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// 4-digit year at the very end of a line: "NOAA Kp index breakdown Oct 23-Oct 25 2025" -> 2025
pub fn trailing_year(line: &str) -> Option<i32> {
    TRAILING_YEAR
        .captures(line)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// 4-digit year opening an issued timestamp: "2025 Oct 23 1230 UTC" -> 2025,
/// "Oct 23 1230 UTC" -> None
pub fn leading_year(text: &str) -> Option<i32> {
    LEADING_YEAR
        .captures(text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Year offsets for an ordered list of month indexes.
///
/// The first December -> January step bumps that entry and every later one by
/// one year. Only the first such step counts.
pub fn year_offsets(months: &[u32]) -> Vec<i32> {
    let mut offsets = vec![0; months.len()];
    if let Some(pos) = months
        .windows(2)
        .position(|pair| pair[0] == DECEMBER && pair[1] == JANUARY)
    {
        for offset in offsets.iter_mut().skip(pos + 1) {
            *offset = 1;
        }
    }
    offsets
}

/// Calendar day from a year, zero-based month and day of month
pub fn calendar_day(year: i32, month_index: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month_index + 1, day)
}

/// Clamp a scraped percentage into 0..=100
pub fn clamp_percentage(raw: i64) -> u8 {
    raw.clamp(0, 100) as u8
}
