//! Attendance record model.
//!
//! This module defines the AttendanceRecord struct, the normalized form of
//! one accepted source row: one employee, one calendar day, one project.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::date_key;

/// Placeholder stored when a non-identifying source cell is blank.
///
/// Project code, project name, and the enteredBy column default to this
/// sentinel so downstream grouping never has to special-case empty strings.
pub const MISSING_VALUE: &str = "--";

/// One normalized attendance entry.
///
/// Records are immutable once ingested; every derivation works from clones
/// or references of the ingested set.
///
/// # Example
///
/// ```
/// use attendance_engine::models::AttendanceRecord;
/// use chrono::NaiveDate;
///
/// let record = AttendanceRecord {
///     employee_name: "Dana Cole".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
///     project_code: "P-100".to_string(),
///     project_name: "Harbour Works".to_string(),
///     entered_by: "site.lead".to_string(),
///     source_row: 2,
/// };
/// assert_eq!(record.date_key(), "2024-03-05");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee's name, trimmed but otherwise verbatim.
    ///
    /// This is the identity key for all per-employee grouping: two spellings
    /// that differ in case or internal spacing are two distinct employees.
    pub employee_name: String,
    /// The worked calendar day, local date, no timezone.
    pub date: NaiveDate,
    /// The project code, or [`MISSING_VALUE`] when the cell was blank.
    pub project_code: String,
    /// The project name with its raw spelling preserved, or [`MISSING_VALUE`].
    pub project_name: String,
    /// Who entered the row, trimmed, or [`MISSING_VALUE`].
    pub entered_by: String,
    /// The 1-based row number in the source sheet (the header is row 1).
    pub source_row: u32,
}

impl AttendanceRecord {
    /// Returns the canonical `YYYY-MM-DD` key for the record's date.
    pub fn date_key(&self) -> String {
        date_key(self.date)
    }
}
