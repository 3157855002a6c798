//! Calendar utilities for monthly attendance reconciliation.
//!
//! This module provides pure date arithmetic over calendar months: month
//! lengths, weekday lookups, weekday counts, and the canonical date key used
//! to identify a calendar day throughout the engine. All functions work on
//! naive local dates; nothing here is timezone-aware.

use chrono::{Datelike, NaiveDate, Weekday};

/// Returns the number of days in the given calendar month.
///
/// # Arguments
///
/// * `year` - The calendar year
/// * `month` - The calendar month (1-12)
///
/// # Returns
///
/// The number of days in the month (28-31), or `0` if the month is not a
/// valid calendar month.
///
/// # Example
///
/// ```
/// use attendance_engine::calendar::days_in_month;
///
/// assert_eq!(days_in_month(2024, 3), 31);
/// assert_eq!(days_in_month(2024, 2), 29); // leap year
/// assert_eq!(days_in_month(2023, 2), 28);
/// ```
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

/// Returns the weekday of a given calendar day, if the day exists.
///
/// Doubles as the validity check for (year, month, day) triples: an
/// out-of-range day such as February 30 returns `None`.
///
/// # Arguments
///
/// * `year` - The calendar year
/// * `month` - The calendar month (1-12)
/// * `day` - The day of the month
///
/// # Returns
///
/// `Some(Weekday)` for a real calendar day, `None` otherwise.
///
/// # Example
///
/// ```
/// use attendance_engine::calendar::weekday_of;
/// use chrono::Weekday;
///
/// // 2024-03-01 is a Friday
/// assert_eq!(weekday_of(2024, 3, 1), Some(Weekday::Fri));
/// assert_eq!(weekday_of(2024, 2, 30), None);
/// ```
pub fn weekday_of(year: i32, month: u32, day: u32) -> Option<Weekday> {
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.weekday())
}

/// Counts how many times a weekday occurs in the given calendar month.
///
/// # Arguments
///
/// * `year` - The calendar year
/// * `month` - The calendar month (1-12)
/// * `weekday` - The weekday to count
///
/// # Returns
///
/// The number of occurrences (4 or 5 for any real month), or `0` if the
/// month is not a valid calendar month.
///
/// # Example
///
/// ```
/// use attendance_engine::calendar::count_weekday;
/// use chrono::Weekday;
///
/// // March 2024 runs Friday 1st through Sunday 31st
/// assert_eq!(count_weekday(2024, 3, Weekday::Fri), 5);
/// assert_eq!(count_weekday(2024, 3, Weekday::Sat), 5);
/// assert_eq!(count_weekday(2024, 3, Weekday::Mon), 4);
/// ```
pub fn count_weekday(year: i32, month: u32, weekday: Weekday) -> u32 {
    (1..=days_in_month(year, month))
        .filter(|&day| weekday_of(year, month, day) == Some(weekday))
        .count() as u32
}

/// Renders a date as the canonical `YYYY-MM-DD` key.
///
/// The key is built from the date's own components with fixed zero padding,
/// never through a timezone-aware formatter, so the same calendar day always
/// produces the same key on every host.
///
/// # Arguments
///
/// * `date` - The date to render
///
/// # Returns
///
/// The date key string, e.g. `"2024-03-05"`.
///
/// # Example
///
/// ```
/// use attendance_engine::calendar::date_key;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(date_key(date), "2024-03-05");
/// ```
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}
