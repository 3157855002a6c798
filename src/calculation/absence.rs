//! Attendance and absence reconciliation.
//!
//! This module interprets an employee's sparse worked-day set as a complete
//! month: days neither worked nor covered by the employee's weekly rest-day
//! policy count as absence, and absence in turn drives the payrun-days
//! figure reported to payroll.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::ingest::{AttendanceSet, EmployeeCalendar};
use crate::models::{ReportPeriod, WeekendPolicy};

/// The fixed baseline the payrun-days figure is counted down from.
///
/// Payroll treats every month as a 30-day entitlement regardless of its
/// calendar length; absence is subtracted from this baseline.
pub const PAYRUN_BASELINE_DAYS: u32 = 30;

/// An employee's worked-day counts for the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTally {
    /// Distinct days worked.
    pub worked_days: u32,
    /// Distinct Fridays worked.
    pub worked_fridays: u32,
    /// Distinct Saturdays worked.
    pub worked_saturdays: u32,
}

impl WorkTally {
    /// Tallies the distinct worked dates of a calendar.
    ///
    /// Multiple entries on one day (several projects, or duplicates) count
    /// that day once.
    pub fn from_calendar(calendar: &EmployeeCalendar) -> Self {
        let dates = calendar.worked_dates();
        Self {
            worked_days: dates.len() as u32,
            worked_fridays: dates
                .iter()
                .filter(|date| date.weekday() == Weekday::Fri)
                .count() as u32,
            worked_saturdays: dates
                .iter()
                .filter(|date| date.weekday() == Weekday::Sat)
                .count() as u32,
        }
    }
}

/// The reconciled month for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceSummary {
    /// The employee's name.
    pub employee_name: String,
    /// The rest-day policy the reconciliation used.
    pub policy: WeekendPolicy,
    /// Distinct days worked.
    pub worked_days: u32,
    /// Distinct Fridays worked.
    pub worked_fridays: u32,
    /// Distinct Saturdays worked.
    pub worked_saturdays: u32,
    /// Days neither worked nor covered by the rest-day policy.
    pub absent_days: u32,
    /// The payrun figure: the 30-day baseline minus absence, floored at
    /// zero.
    pub payrun_days: u32,
}

/// Counts the absent days for a tally against a month's shape.
///
/// The subtracted rest term is the policy's rest days NOT worked: a rest
/// day the employee worked anyway stops excusing a weekday absence. The
/// result is clamped at zero so working extra days never yields negative
/// absence.
///
/// With `D`/`F`/`S` the month's day/Friday/Saturday counts and `W`/`wf`/`ws`
/// the tally:
///
/// - Friday-only: `max(0, D - W - (F - wf))`
/// - Friday and Saturday: `max(0, D - W - (F + S - wf - ws))`
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{absent_day_count, WorkTally};
/// use attendance_engine::models::WeekendPolicy;
///
/// let tally = WorkTally {
///     worked_days: 2,
///     worked_fridays: 1,
///     worked_saturdays: 0,
/// };
/// // 31-day month with 4 Fridays: 31 - 2 - (4 - 1) = 26
/// assert_eq!(
///     absent_day_count(WeekendPolicy::FridayOnly, tally, 31, 4, 5),
///     26
/// );
/// ```
pub fn absent_day_count(
    policy: WeekendPolicy,
    tally: WorkTally,
    month_days: u32,
    month_fridays: u32,
    month_saturdays: u32,
) -> u32 {
    let rest_days_not_worked = match policy {
        WeekendPolicy::FridayOnly => i64::from(month_fridays) - i64::from(tally.worked_fridays),
        WeekendPolicy::FridayAndSaturday => {
            i64::from(month_fridays) + i64::from(month_saturdays)
                - i64::from(tally.worked_fridays)
                - i64::from(tally.worked_saturdays)
        }
    };

    let absence = i64::from(month_days) - i64::from(tally.worked_days) - rest_days_not_worked;
    absence.max(0) as u32
}

/// Reconciles one employee's calendar against the report period.
pub fn reconcile_absence(calendar: &EmployeeCalendar, period: ReportPeriod) -> AbsenceSummary {
    let tally = WorkTally::from_calendar(calendar);
    let absent_days = absent_day_count(
        calendar.policy,
        tally,
        period.days_in_month(),
        period.fridays(),
        period.saturdays(),
    );

    AbsenceSummary {
        employee_name: calendar.employee_name.clone(),
        policy: calendar.policy,
        worked_days: tally.worked_days,
        worked_fridays: tally.worked_fridays,
        worked_saturdays: tally.worked_saturdays,
        absent_days,
        payrun_days: PAYRUN_BASELINE_DAYS.saturating_sub(absent_days),
    }
}

/// Reconciles every employee in the set.
///
/// Employees appear exactly when they have at least one record; nobody is
/// synthesized as fully absent.
pub fn reconcile_all(set: &AttendanceSet) -> BTreeMap<String, AbsenceSummary> {
    set.calendars
        .iter()
        .map(|(name, calendar)| (name.clone(), reconcile_absence(calendar, set.period)))
        .collect()
}
