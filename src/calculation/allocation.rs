//! Per-project time allocation.
//!
//! For each employee this module counts distinct worked dates per project
//! and expresses them as percentages of the employee's total worked days.
//! Counting is per (project, date) tuple, so a same-day re-entry under one
//! project never double-counts, while a day genuinely split across two
//! projects contributes one day to each.
//!
//! Three presentation modes share the same underlying percentages: raw
//! figures, highlighted rows whose totals drift from 100%, and a variant
//! with an implicit "Unassigned" bucket that tops the row up to 100%.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ingest::{AttendanceSet, EmployeeCalendar};

/// How far a row's summed percentage may drift from 100 before the
/// highlighted mode flags it (0.1 of a percentage point).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

const FULL_PERCENT: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Presentation mode for allocation rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMode {
    /// Percentages as computed; totals may drift from 100.
    Raw,
    /// Same figures, with rows off balance by more than
    /// [`BALANCE_TOLERANCE`] flagged for review.
    Highlighted,
    /// An implicit "Unassigned" bucket absorbs any shortfall so the row
    /// total reaches exactly 100.
    WithUnassigned,
}

/// One employee's share of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectShare {
    /// The project code.
    pub project_code: String,
    /// Distinct dates the employee worked this project.
    pub days: u32,
    /// `days / total_worked_days × 100`, rounded to two decimal places.
    pub percentage: Decimal,
}

/// One employee's allocation row.
///
/// Shares cover every project code observed anywhere in the dataset, in
/// ascending code order, with zero entries for projects the employee never
/// touched. `flagged` is present only in highlighted mode and
/// `unassigned_percentage` only in with-unassigned mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// The employee's name.
    pub employee_name: String,
    /// The employee's total distinct worked dates.
    pub total_worked_days: u32,
    /// Per-project shares over the whole dataset's project axis.
    pub shares: Vec<ProjectShare>,
    /// The row total. In with-unassigned mode this includes the bucket.
    pub total_percentage: Decimal,
    /// Whether the row drifted out of tolerance (highlighted mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    /// The "Unassigned" bucket (with-unassigned mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unassigned_percentage: Option<Decimal>,
}

/// Computes allocation rows for every employee in the set.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{allocate_projects, AllocationMode};
/// use attendance_engine::ingest::ingest_rows;
/// use attendance_engine::models::{CellValue, ReportPeriod, WeekendRoster};
///
/// let text = |value: &str| CellValue::Text(value.to_string());
/// let rows = vec![
///     vec![text("code"), text("name"), text("date"), text("employee"), text("by")],
///     vec![text("P-100"), text("Harbour"), text("2024-03-05"), text("Dana Cole"), text("x")],
///     vec![text("P-200"), text("Quay"), text("2024-03-06"), text("Dana Cole"), text("x")],
/// ];
/// let period = ReportPeriod::new(2024, 3).unwrap();
/// let set = ingest_rows(&rows, period, &WeekendRoster::default()).unwrap();
///
/// let summaries = allocate_projects(&set, AllocationMode::Raw);
/// let dana = &summaries["Dana Cole"];
/// assert_eq!(dana.total_worked_days, 2);
/// assert_eq!(dana.shares.len(), 2);
/// ```
pub fn allocate_projects(
    set: &AttendanceSet,
    mode: AllocationMode,
) -> BTreeMap<String, AllocationSummary> {
    let axis: BTreeSet<&str> = set
        .records
        .iter()
        .map(|record| record.project_code.as_str())
        .collect();

    set.calendars
        .iter()
        .map(|(name, calendar)| (name.clone(), allocate_calendar(calendar, &axis, mode)))
        .collect()
}

fn allocate_calendar(
    calendar: &EmployeeCalendar,
    axis: &BTreeSet<&str>,
    mode: AllocationMode,
) -> AllocationSummary {
    let mut dates_by_project: BTreeMap<&str, BTreeSet<NaiveDate>> = BTreeMap::new();
    for record in &calendar.records {
        dates_by_project
            .entry(record.project_code.as_str())
            .or_default()
            .insert(record.date);
    }
    let total_worked_days = calendar.distinct_worked_days();

    let shares: Vec<ProjectShare> = axis
        .iter()
        .map(|code| {
            let days = dates_by_project
                .get(code)
                .map_or(0, |dates| dates.len() as u32);
            ProjectShare {
                project_code: (*code).to_string(),
                days,
                percentage: share_percentage(days, total_worked_days),
            }
        })
        .collect();

    let assigned: Decimal = shares.iter().map(|share| share.percentage).sum();

    let (total_percentage, flagged, unassigned_percentage) = match mode {
        AllocationMode::Raw => (assigned, None, None),
        AllocationMode::Highlighted => {
            let off_balance = (assigned - FULL_PERCENT).abs() > BALANCE_TOLERANCE;
            (assigned, Some(off_balance), None)
        }
        AllocationMode::WithUnassigned => {
            let unassigned = (FULL_PERCENT - assigned).max(Decimal::ZERO);
            (assigned + unassigned, None, Some(unassigned))
        }
    };

    AllocationSummary {
        employee_name: calendar.employee_name.clone(),
        total_worked_days,
        shares,
        total_percentage,
        flagged,
        unassigned_percentage,
    }
}

fn share_percentage(days: u32, total: u32) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(days) / Decimal::from(total) * FULL_PERCENT).round_dp(2)
}
