//! Date-value coercion for attendance source cells.
//!
//! The date column of a human-entered sheet mixes native date cells, text in
//! several spellings, and raw spreadsheet serial numbers. This module turns
//! any of those into a local calendar date, or `None` when the value cannot
//! be read as a date at all.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::CellValue;

/// Days between the 1900-date-system serial epoch and 1970-01-01.
///
/// Spreadsheet serial 25569 is exactly 1970-01-01, so subtracting this
/// offset converts a serial day number into a unix day number.
const SERIAL_UNIX_OFFSET: f64 = 25569.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Text shapes attempted after the delimited year-month-day form fails.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%d %B %Y", "%B %d, %Y"];

/// Coerces a source cell into a calendar date.
///
/// Coercion tries, in order:
///
/// 1. A native date cell is taken as-is.
/// 2. Text splitting into exactly three numeric parts on `-` or `/` is read
///    as literal year, month, day components.
/// 3. A number cell is treated as a 1900-date-system spreadsheet serial.
/// 4. Any other text is tried against a short list of common datetime and
///    long-form date spellings.
///
/// Numeric-looking text is NOT treated as a serial; only true number cells
/// are. Empty cells and unreadable values return `None`.
///
/// # Example
///
/// ```
/// use attendance_engine::ingest::coerce_date;
/// use attendance_engine::models::CellValue;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(coerce_date(&CellValue::Text("2024-03-05".to_string())), Some(expected));
/// assert_eq!(coerce_date(&CellValue::Number(45356.0)), Some(expected));
/// assert_eq!(coerce_date(&CellValue::Text("no date here".to_string())), None);
/// ```
pub fn coerce_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::Number(serial) => from_serial(*serial),
        CellValue::Text(text) => parse_delimited(text).or_else(|| parse_fallback(text)),
        CellValue::Empty => None,
    }
}

/// Parses text of exactly three numeric parts as literal Y-M-D components.
///
/// The parts are read as local calendar components, never through a generic
/// format parser, so `2024-13-45` is invalid rather than reinterpreted.
fn parse_delimited(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.trim().split(['-', '/']).collect();
    if parts.len() != 3 {
        return None;
    }
    let year: i32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let day: u32 = parts[2].trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Converts a 1900-date-system spreadsheet serial to a calendar date.
///
/// The serial is shifted to unix seconds, floored, and reduced to a whole
/// day offset from 1970-01-01, so fractional serials (date plus time of
/// day) resolve to the date portion.
fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let unix_seconds = ((serial - SERIAL_UNIX_OFFSET) * SECONDS_PER_DAY).floor() as i64;
    let unix_days = unix_seconds.div_euclid(SECONDS_PER_DAY as i64);
    let offset = Duration::try_days(unix_days)?;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(offset)
}

/// Best-effort parse over the short fallback format list.
fn parse_fallback(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(datetime.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    None
}
