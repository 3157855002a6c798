//! Food-allowance evaluation.
//!
//! This module decides, day by day, whether an employee's worked dates
//! qualify for the daily food allowance. Coverage is opt-in through the
//! employee policy table; each covered employee's distinct worked dates are
//! evaluated independently against the leave settings and the project
//! eligibility flags for the employee's policy.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{AllowancePolicy, LeaveSettings, PolicyTables};
use crate::ingest::{AttendanceSet, EmployeeCalendar};
use crate::models::AttendanceRecord;

/// The reason recorded for a day spent on annual leave.
pub const REASON_ANNUAL_LEAVE: &str = "Annual Leave";

/// The reason recorded for a day with no qualifying project.
pub const REASON_PROJECT_NOT_ELIGIBLE: &str = "Project not eligible";

/// The allowance outcome for one worked day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayEligibility {
    /// The day qualifies; at least one of its projects matched the
    /// employee's policy.
    Eligible {
        /// The first project that matched.
        matched_project: String,
    },
    /// The day was annual leave and never qualifies.
    AnnualLeave,
    /// No project recorded that day matched the employee's policy.
    NotEligible,
}

impl DayEligibility {
    /// Returns true if the day counts toward the allowance.
    pub fn is_eligible(&self) -> bool {
        matches!(self, DayEligibility::Eligible { .. })
    }

    /// The ineligibility reason, if any.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            DayEligibility::Eligible { .. } => None,
            DayEligibility::AnnualLeave => Some(REASON_ANNUAL_LEAVE),
            DayEligibility::NotEligible => Some(REASON_PROJECT_NOT_ELIGIBLE),
        }
    }
}

/// One worked day's evaluation, kept for audit and reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayEvaluation {
    /// The worked date.
    pub date: NaiveDate,
    /// The distinct project codes recorded that day, in row order.
    pub project_codes: Vec<String>,
    /// The day's outcome.
    pub eligibility: DayEligibility,
}

/// The allowance result for one covered employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSummary {
    /// The employee's name.
    pub employee_name: String,
    /// The policy the employee is covered by.
    pub policy: AllowancePolicy,
    /// The daily amount for eligible days.
    pub amount_per_day: Decimal,
    /// How many distinct worked dates qualified.
    pub eligible_days: u32,
    /// `eligible_days` times `amount_per_day`.
    pub total_amount: Decimal,
    /// The day-by-day breakdown, in date order.
    pub days: Vec<DayEvaluation>,
}

/// Evaluates one employee's calendar.
///
/// Returns `None` when the employee has no row in the employee policy
/// table; uncovered employees are skipped entirely rather than reported
/// with a zero allowance.
///
/// Day rules, in order:
///
/// 1. A day with any annual-leave entry (reserved code, or marker phrase in
///    the project name when configured) is [`DayEligibility::AnnualLeave`].
/// 2. Otherwise the day is eligible if at least one of its projects carries
///    the flag for the employee's policy. One match suffices however many
///    projects the day lists.
/// 3. Otherwise the day is [`DayEligibility::NotEligible`]. Projects
///    missing from the project table never match.
pub fn evaluate_allowance(
    calendar: &EmployeeCalendar,
    tables: &PolicyTables,
    settings: &LeaveSettings,
) -> Option<AllowanceSummary> {
    let employee = tables.employee(&calendar.employee_name)?;

    let mut days = Vec::new();
    let mut eligible_days = 0;

    for (date, day_records) in calendar.records_by_date() {
        let eligibility = evaluate_day(&day_records, employee.policy, tables, settings);
        if eligibility.is_eligible() {
            eligible_days += 1;
        }
        days.push(DayEvaluation {
            date,
            project_codes: distinct_codes(&day_records),
            eligibility,
        });
    }

    Some(AllowanceSummary {
        employee_name: calendar.employee_name.clone(),
        policy: employee.policy,
        amount_per_day: employee.amount_per_day,
        eligible_days,
        total_amount: Decimal::from(eligible_days) * employee.amount_per_day,
        days,
    })
}

/// Evaluates every covered employee in the set.
///
/// The result maps only employees present in the employee policy table;
/// everyone else is absent from it, not zeroed.
pub fn evaluate_all(
    set: &AttendanceSet,
    tables: &PolicyTables,
    settings: &LeaveSettings,
) -> BTreeMap<String, AllowanceSummary> {
    set.calendars
        .iter()
        .filter_map(|(name, calendar)| {
            evaluate_allowance(calendar, tables, settings)
                .map(|summary| (name.clone(), summary))
        })
        .collect()
}

fn evaluate_day(
    day_records: &[&AttendanceRecord],
    policy: AllowancePolicy,
    tables: &PolicyTables,
    settings: &LeaveSettings,
) -> DayEligibility {
    let on_leave = day_records.iter().any(|record| {
        settings.is_leave_code(&record.project_code)
            || settings.name_marks_leave(&record.project_name)
    });
    if on_leave {
        return DayEligibility::AnnualLeave;
    }

    let matched = day_records.iter().find(|record| {
        tables
            .project(&record.project_code)
            .is_some_and(|project| project.eligible_for(policy))
    });
    match matched {
        Some(record) => DayEligibility::Eligible {
            matched_project: record.project_code.clone(),
        },
        None => DayEligibility::NotEligible,
    }
}

fn distinct_codes(day_records: &[&AttendanceRecord]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for record in day_records {
        if !codes.contains(&record.project_code) {
            codes.push(record.project_code.clone());
        }
    }
    codes
}
