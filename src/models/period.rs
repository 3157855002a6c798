//! Report period model.
//!
//! This module defines the ReportPeriod struct, the single calendar month
//! every report is scoped to.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::error::{EngineError, EngineResult};

/// The calendar month a report covers.
///
/// Constructed through [`ReportPeriod::new`], which rejects month numbers
/// outside 1-12, so a held value always names a real month.
///
/// # Example
///
/// ```
/// use attendance_engine::models::ReportPeriod;
///
/// let period = ReportPeriod::new(2024, 3).unwrap();
/// assert_eq!(period.days_in_month(), 31);
/// assert_eq!(period.fridays(), 5);
/// assert!(ReportPeriod::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    year: i32,
    month: u32,
}

impl ReportPeriod {
    /// Creates a report period for the given year and month.
    ///
    /// # Arguments
    ///
    /// * `year` - The calendar year
    /// * `month` - The calendar month (1-12)
    ///
    /// # Returns
    ///
    /// The period, or [`EngineError::InvalidPeriod`] when the month is not
    /// in the 1-12 range.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The number of days in the period's month.
    pub fn days_in_month(&self) -> u32 {
        calendar::days_in_month(self.year, self.month)
    }

    /// The number of Fridays in the period's month.
    pub fn fridays(&self) -> u32 {
        calendar::count_weekday(self.year, self.month, Weekday::Fri)
    }

    /// The number of Saturdays in the period's month.
    pub fn saturdays(&self) -> u32 {
        calendar::count_weekday(self.year, self.month, Weekday::Sat)
    }

    /// Returns true if the date falls inside the period's month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
