//! Attendance ingest: raw tabular rows into a normalized record set.
//!
//! The source is a sheet with positional columns {0 projectCode,
//! 1 projectName, 2 date, 3 employeeName, 4 enteredBy} whose first row is
//! always a header. Ingest classifies every data row as accepted or
//! rejected, builds one calendar per employee, and keeps the full record
//! list in original row order for the data-quality auditor. Rejected rows
//! are returned with reasons, never surfaced as errors.

mod dates;

pub use dates::coerce_date;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, CellValue, MISSING_VALUE, ReportPeriod, WeekendPolicy, WeekendRoster,
};

/// Positional column indices of the attendance sheet.
const COL_PROJECT_CODE: usize = 0;
const COL_PROJECT_NAME: usize = 1;
const COL_DATE: usize = 2;
const COL_EMPLOYEE_NAME: usize = 3;
const COL_ENTERED_BY: usize = 4;

const EMPTY_CELL: CellValue = CellValue::Empty;

/// Why a data row was skipped during ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The employee-name cell was blank.
    MissingEmployee,
    /// The date cell was blank.
    MissingDate,
    /// The date cell held a value no coercion branch could read.
    UnparseableDate,
    /// The date was readable but falls outside the report period.
    OutsidePeriod,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingEmployee => write!(f, "missing employee name"),
            RejectReason::MissingDate => write!(f, "missing date"),
            RejectReason::UnparseableDate => write!(f, "unparseable date"),
            RejectReason::OutsidePeriod => write!(f, "date outside report period"),
        }
    }
}

/// A skipped data row, with its sheet position and the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRejection {
    /// The 1-based row number in the source sheet.
    pub source_row: u32,
    /// Why the row was skipped.
    pub reason: RejectReason,
}

/// The outcome of classifying one data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOutcome {
    /// The row carried a usable attendance entry.
    Accepted(AttendanceRecord),
    /// The row was skipped.
    Rejected(RowRejection),
}

/// One employee's attendance entries for the report period.
///
/// Records stay in source-row order; the distinct worked dates derived from
/// them are what the reconciler and allowance evaluator consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCalendar {
    /// The employee's name, trimmed but otherwise verbatim.
    pub employee_name: String,
    /// The employee's resolved weekly rest-day policy.
    pub policy: WeekendPolicy,
    /// All accepted records for this employee, in source-row order.
    pub records: Vec<AttendanceRecord>,
}

impl EmployeeCalendar {
    /// The distinct worked dates, ascending.
    pub fn worked_dates(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self.records.iter().map(|record| record.date).collect();
        dates.into_iter().collect()
    }

    /// The records grouped by date, source-row order preserved within a day.
    pub fn records_by_date(&self) -> BTreeMap<NaiveDate, Vec<&AttendanceRecord>> {
        let mut by_date: BTreeMap<NaiveDate, Vec<&AttendanceRecord>> = BTreeMap::new();
        for record in &self.records {
            by_date.entry(record.date).or_default().push(record);
        }
        by_date
    }

    /// The number of distinct worked dates.
    ///
    /// Multiple entries on the same day (one per project, or duplicates)
    /// still count that day once.
    pub fn distinct_worked_days(&self) -> u32 {
        self.records
            .iter()
            .map(|record| record.date)
            .collect::<BTreeSet<_>>()
            .len() as u32
    }
}

/// The normalized output of ingesting one attendance sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSet {
    /// The report period the rows were ingested against.
    pub period: ReportPeriod,
    /// Every accepted record, in original row order.
    pub records: Vec<AttendanceRecord>,
    /// Per-employee calendars, keyed by the trimmed verbatim name.
    pub calendars: BTreeMap<String, EmployeeCalendar>,
    /// Every skipped row, in original row order.
    pub skipped: Vec<RowRejection>,
}

impl AttendanceSet {
    /// The number of accepted rows.
    pub fn rows_ingested(&self) -> usize {
        self.records.len()
    }

    /// The number of skipped rows.
    pub fn rows_skipped(&self) -> usize {
        self.skipped.len()
    }
}

/// Classifies one data row against the report period.
///
/// A row is accepted when it names an employee and carries a readable date
/// inside the period. Everything else about the row is defaulted rather
/// than validated: blank project code, project name, and enteredBy cells
/// become the [`MISSING_VALUE`] sentinel.
///
/// # Arguments
///
/// * `row` - The row's cells in positional order; short rows read as blank
/// * `source_row` - The 1-based sheet row number, for provenance
/// * `period` - The report period rows must fall inside
///
/// # Example
///
/// ```
/// use attendance_engine::ingest::{classify_row, RowOutcome};
/// use attendance_engine::models::{CellValue, ReportPeriod};
///
/// let period = ReportPeriod::new(2024, 3).unwrap();
/// let row = vec![
///     CellValue::Text("P-100".to_string()),
///     CellValue::Text("Harbour Works".to_string()),
///     CellValue::Text("2024-03-05".to_string()),
///     CellValue::Text("Dana Cole".to_string()),
///     CellValue::Text("site.lead".to_string()),
/// ];
///
/// match classify_row(&row, 2, period) {
///     RowOutcome::Accepted(record) => assert_eq!(record.employee_name, "Dana Cole"),
///     RowOutcome::Rejected(rejection) => panic!("unexpected rejection: {:?}", rejection),
/// }
/// ```
pub fn classify_row(row: &[CellValue], source_row: u32, period: ReportPeriod) -> RowOutcome {
    let cell = |index: usize| row.get(index).unwrap_or(&EMPTY_CELL);

    let employee_cell = cell(COL_EMPLOYEE_NAME);
    if employee_cell.is_blank() {
        return RowOutcome::Rejected(RowRejection {
            source_row,
            reason: RejectReason::MissingEmployee,
        });
    }
    let employee_name = employee_cell.as_text().trim().to_string();

    let date_cell = cell(COL_DATE);
    if date_cell.is_blank() {
        return RowOutcome::Rejected(RowRejection {
            source_row,
            reason: RejectReason::MissingDate,
        });
    }
    let Some(date) = coerce_date(date_cell) else {
        return RowOutcome::Rejected(RowRejection {
            source_row,
            reason: RejectReason::UnparseableDate,
        });
    };
    if !period.contains(date) {
        return RowOutcome::Rejected(RowRejection {
            source_row,
            reason: RejectReason::OutsidePeriod,
        });
    }

    RowOutcome::Accepted(AttendanceRecord {
        employee_name,
        date,
        project_code: trimmed_or_missing(cell(COL_PROJECT_CODE)),
        project_name: verbatim_or_missing(cell(COL_PROJECT_NAME)),
        entered_by: trimmed_or_missing(cell(COL_ENTERED_BY)),
        source_row,
    })
}

fn trimmed_or_missing(cell: &CellValue) -> String {
    if cell.is_blank() {
        MISSING_VALUE.to_string()
    } else {
        cell.as_text().trim().to_string()
    }
}

/// Project names keep their raw spelling; only all-whitespace text is
/// treated as missing.
fn verbatim_or_missing(cell: &CellValue) -> String {
    if cell.is_blank() {
        MISSING_VALUE.to_string()
    } else {
        cell.as_text()
    }
}

/// Ingests a full attendance sheet into an [`AttendanceSet`].
///
/// Row 1 is always a header and is discarded. A source with no rows at all
/// fails with [`EngineError::MissingHeader`]; a source with only the header
/// fails with [`EngineError::EmptySource`]. Every other defect is row-level
/// and lands in the skipped list.
///
/// # Arguments
///
/// * `rows` - The sheet rows, header first
/// * `period` - The report period
/// * `roster` - The Friday-plus-Saturday roster used to resolve policies
pub fn ingest_rows(
    rows: &[Vec<CellValue>],
    period: ReportPeriod,
    roster: &WeekendRoster,
) -> EngineResult<AttendanceSet> {
    if rows.is_empty() {
        return Err(EngineError::MissingHeader);
    }
    if rows.len() == 1 {
        return Err(EngineError::EmptySource);
    }

    let mut records = Vec::new();
    let mut calendars: BTreeMap<String, EmployeeCalendar> = BTreeMap::new();
    let mut skipped = Vec::new();

    for (index, row) in rows.iter().enumerate().skip(1) {
        let source_row = (index + 1) as u32;
        match classify_row(row, source_row, period) {
            RowOutcome::Accepted(record) => {
                calendars
                    .entry(record.employee_name.clone())
                    .or_insert_with(|| EmployeeCalendar {
                        employee_name: record.employee_name.clone(),
                        policy: roster.policy_for(&record.employee_name),
                        records: Vec::new(),
                    })
                    .records
                    .push(record.clone());
                records.push(record);
            }
            RowOutcome::Rejected(rejection) => {
                debug!(
                    source_row = rejection.source_row,
                    reason = %rejection.reason,
                    "skipping attendance row"
                );
                skipped.push(rejection);
            }
        }
    }

    Ok(AttendanceSet {
        period,
        records,
        calendars,
        skipped,
    })
}
