//! Comprehensive integration tests for the Attendance Reconciliation Engine.
//!
//! This test suite covers all derivation scenarios including:
//! - Attendance/absence reconciliation under both weekend policies
//! - Payrun day counts
//! - Data-quality audits (duplicates, inconsistent project naming)
//! - Food-allowance evaluation against the policy tables
//! - Project allocation in all three presentation modes
//! - Structural error cases
//! - Engine-wide properties

use chrono::Weekday;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use attendance_engine::calculation::{
    AllocationMode, BALANCE_TOLERANCE, PAYRUN_BASELINE_DAYS, RecordStatus, WorkTally,
    absent_day_count,
};
use attendance_engine::calendar::{count_weekday, days_in_month};
use attendance_engine::config::{
    AllowancePolicy, EmployeePolicy, LeaveSettings, PolicyTables, ProjectPolicy,
};
use attendance_engine::engine::{
    absence_report, allocation_report, allowance_report, quality_report,
};
use attendance_engine::error::EngineError;
use attendance_engine::models::{CellValue, ReportPeriod, WeekendPolicy, WeekendRoster};

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn header() -> Vec<CellValue> {
    vec![
        text("Project Code"),
        text("Project Name"),
        text("Date"),
        text("Employee"),
        text("Entered By"),
    ]
}

fn entry(code: &str, name: &str, date: &str, employee: &str) -> Vec<CellValue> {
    vec![
        text(code),
        text(name),
        text(date),
        text(employee),
        text("site.lead"),
    ]
}

fn march() -> ReportPeriod {
    ReportPeriod::new(2024, 3).unwrap()
}

fn sample_tables() -> PolicyTables {
    PolicyTables::new(
        vec![
            ProjectPolicy {
                code: "P-100".to_string(),
                name: "Harbour Works".to_string(),
                location: "Fremantle".to_string(),
                policy1_eligible: true,
                policy2_eligible: false,
            },
            ProjectPolicy {
                code: "P-200".to_string(),
                name: "Quay Upgrade".to_string(),
                location: "Kwinana".to_string(),
                policy1_eligible: false,
                policy2_eligible: true,
            },
        ],
        vec![
            EmployeePolicy {
                name: "Dana Cole".to_string(),
                amount_per_day: decimal("12.50"),
                policy: AllowancePolicy::Policy1,
            },
            EmployeePolicy {
                name: "Omar Haddad".to_string(),
                amount_per_day: decimal("10.00"),
                policy: AllowancePolicy::Policy2,
            },
        ],
    )
}

/// Rows for an employee who worked every day of the given month.
fn full_month_rows(year: i32, month: u32, employee: &str) -> Vec<Vec<CellValue>> {
    let mut rows = vec![header()];
    for day in 1..=days_in_month(year, month) {
        rows.push(entry(
            "P-100",
            "Harbour Works",
            &format!("{:04}-{:02}-{:02}", year, month, day),
            employee,
        ));
    }
    rows
}

// =============================================================================
// Absence Reconciliation
// =============================================================================

#[test]
fn test_two_worked_fridays_under_friday_only_policy() {
    // Same-date re-entry on a second project must not inflate worked days
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-01", "Dana Cole"),
        entry("P2", "Crane Survey", "2024-03-01", "Dana Cole"),
        entry("P1", "Wharf Fitout", "2024-03-08", "Dana Cole"),
    ];

    let report = absence_report(&rows, march(), &WeekendRoster::default()).unwrap();
    let dana = &report.summaries["Dana Cole"];
    assert_eq!(dana.policy, WeekendPolicy::FridayOnly);
    assert_eq!(dana.worked_days, 2);
    assert_eq!(dana.worked_fridays, 2);
    assert_eq!(dana.absent_days, 26);
    assert_eq!(dana.payrun_days, 4);
}

#[test]
fn test_friday_and_saturday_policy_excuses_both_rest_days() {
    let roster = WeekendRoster::from_names(["Omar Haddad"]);
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-02", "Omar Haddad"),
    ];

    let report = absence_report(&rows, march(), &roster).unwrap();
    let omar = &report.summaries["Omar Haddad"];
    assert_eq!(omar.policy, WeekendPolicy::FridayAndSaturday);
    assert_eq!(omar.worked_saturdays, 1);
    // 31 - 1 - (5 + 5 - 0 - 1) = 21
    assert_eq!(omar.absent_days, 21);
    assert_eq!(omar.payrun_days, 9);
}

#[test]
fn test_full_attendance_restores_the_payrun_baseline() {
    let rows = full_month_rows(2024, 3, "Dana Cole");

    let report = absence_report(&rows, march(), &WeekendRoster::default()).unwrap();
    let dana = &report.summaries["Dana Cole"];
    assert_eq!(dana.absent_days, 0);
    assert_eq!(dana.payrun_days, PAYRUN_BASELINE_DAYS);
}

#[test]
fn test_employee_with_no_accepted_rows_is_absent_from_the_report() {
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-05", "Dana Cole"),
        // February date: rejected as outside the period
        entry("P1", "Wharf Fitout", "2024-02-27", "Omar Haddad"),
    ];

    let report = absence_report(&rows, march(), &WeekendRoster::default()).unwrap();
    assert!(report.summaries.contains_key("Dana Cole"));
    assert!(!report.summaries.contains_key("Omar Haddad"));
    assert_eq!(report.meta.rows_skipped, 1);
}

#[test]
fn test_serial_and_native_dates_reconcile_alike() {
    // 45356 is the spreadsheet serial for 2024-03-05
    let rows = vec![
        header(),
        vec![
            text("P1"),
            text("Wharf Fitout"),
            CellValue::Number(45356.0),
            text("Dana Cole"),
            text("site.lead"),
        ],
        entry("P1", "Wharf Fitout", "2024-03-05", "Omar Haddad"),
    ];

    let report = absence_report(&rows, march(), &WeekendRoster::default()).unwrap();
    assert_eq!(
        report.summaries["Dana Cole"].absent_days,
        report.summaries["Omar Haddad"].absent_days
    );
}

// =============================================================================
// Data-Quality Audit
// =============================================================================

#[test]
fn test_case_and_whitespace_variants_are_not_inconsistent() {
    let rows = vec![
        header(),
        entry("X1", "Website Redesign", "2024-03-04", "Dana Cole"),
        entry("X1", "website  redesign ", "2024-03-05", "Omar Haddad"),
    ];

    let report = quality_report(&rows, march()).unwrap();
    assert!(report.audit.inconsistencies.is_empty());
    assert!(
        report
            .audit
            .validations
            .iter()
            .all(|validation| validation.status == RecordStatus::Clean)
    );
}

#[test]
fn test_conflicting_project_names_flag_every_record_under_the_code() {
    let rows = vec![
        header(),
        entry("X2", "Website Redesign", "2024-03-04", "Dana Cole"),
        entry("X2", "Site Relaunch", "2024-03-05", "Omar Haddad"),
    ];

    let report = quality_report(&rows, march()).unwrap();
    assert_eq!(report.audit.inconsistencies.len(), 1);
    let group = &report.audit.inconsistencies[0];
    assert_eq!(group.project_code, "X2");
    assert_eq!(group.record_count, 2);
    assert!(
        report
            .audit
            .validations
            .iter()
            .all(|validation| validation.status == RecordStatus::Inconsistent)
    );
}

#[test]
fn test_duplicate_day_entries_keep_the_first_occurrence() {
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-05", "Dana Cole"),
        entry("P2", "Crane Survey", "2024-03-05", "Dana Cole"),
        entry("P1", "Wharf Fitout", "2024-03-06", "Dana Cole"),
    ];

    let report = quality_report(&rows, march()).unwrap();
    assert_eq!(report.audit.duplicates.len(), 1);
    assert_eq!(report.audit.duplicates[0].occurrences.len(), 2);
    assert_eq!(report.audit.clean_records.len(), 2);
    assert_eq!(report.audit.clean_records[0].project_code, "P1");

    let stats = &report.audit.statistics;
    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.clean_records, 2);
    assert_eq!(stats.duplicate_records, 1);
    assert_eq!(stats.validation_rate, decimal("66.7"));
}

// =============================================================================
// Food Allowance
// =============================================================================

#[test]
fn test_uncovered_employee_is_skipped_but_still_reconciled() {
    let rows = vec![
        header(),
        entry("P-100", "Harbour Works", "2024-03-05", "Priya Nair"),
    ];

    let allowance =
        allowance_report(&rows, march(), &sample_tables(), &LeaveSettings::default()).unwrap();
    assert!(allowance.summaries.is_empty());

    let absence = absence_report(&rows, march(), &WeekendRoster::default()).unwrap();
    assert!(absence.summaries.contains_key("Priya Nair"));
}

#[test]
fn test_leave_days_earn_nothing_and_eligible_days_accumulate() {
    let rows = vec![
        header(),
        entry("P-100", "Harbour Works", "2024-03-04", "Dana Cole"),
        entry("P-100", "Harbour Works", "2024-03-05", "Dana Cole"),
        entry("P-100", "Harbour Works", "2024-03-06", "Dana Cole"),
        entry("AL", "Annual Leave", "2024-03-07", "Dana Cole"),
    ];

    let report =
        allowance_report(&rows, march(), &sample_tables(), &LeaveSettings::default()).unwrap();
    let dana = &report.summaries["Dana Cole"];
    assert_eq!(dana.eligible_days, 3);
    assert_eq!(dana.total_amount, decimal("37.50"));
    assert_eq!(dana.days.len(), 4);
    assert!(!dana.days[3].eligibility.is_eligible());
}

#[test]
fn test_project_flags_are_matched_per_policy() {
    // P-100 qualifies policy1 only; Omar is on policy2
    let rows = vec![
        header(),
        entry("P-100", "Harbour Works", "2024-03-05", "Omar Haddad"),
        entry("P-200", "Quay Upgrade", "2024-03-06", "Omar Haddad"),
    ];

    let report =
        allowance_report(&rows, march(), &sample_tables(), &LeaveSettings::default()).unwrap();
    let omar = &report.summaries["Omar Haddad"];
    assert_eq!(omar.eligible_days, 1);
    assert_eq!(omar.total_amount, decimal("10.00"));
    assert!(!omar.days[0].eligibility.is_eligible());
    assert!(omar.days[1].eligibility.is_eligible());
}

// =============================================================================
// Project Allocation
// =============================================================================

#[test]
fn test_raw_mode_preserves_split_day_overshoot() {
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-05", "Dana Cole"),
        entry("P2", "Crane Survey", "2024-03-05", "Dana Cole"),
    ];

    let report = allocation_report(&rows, march(), AllocationMode::Raw).unwrap();
    let dana = &report.rows["Dana Cole"];
    assert_eq!(dana.total_worked_days, 1);
    assert_eq!(dana.total_percentage, decimal("200.00"));
}

#[test]
fn test_highlighted_mode_separates_balanced_from_drifted_rows() {
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-05", "Dana Cole"),
        entry("P2", "Crane Survey", "2024-03-05", "Dana Cole"),
        entry("P1", "Wharf Fitout", "2024-03-05", "Omar Haddad"),
    ];

    let report = allocation_report(&rows, march(), AllocationMode::Highlighted).unwrap();
    assert_eq!(report.rows["Dana Cole"].flagged, Some(true));
    assert_eq!(report.rows["Omar Haddad"].flagged, Some(false));
}

#[test]
fn test_with_unassigned_mode_tops_rounding_drift_up_to_100() {
    // Three equal thirds round to 33.33 each; the bucket supplies the 0.01
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-05", "Dana Cole"),
        entry("P2", "Crane Survey", "2024-03-06", "Dana Cole"),
        entry("P3", "Slipway Check", "2024-03-07", "Dana Cole"),
    ];

    let report = allocation_report(&rows, march(), AllocationMode::WithUnassigned).unwrap();
    let dana = &report.rows["Dana Cole"];
    assert_eq!(dana.unassigned_percentage, Some(decimal("0.01")));
    assert_eq!(dana.total_percentage, decimal("100.00"));
}

#[test]
fn test_every_project_in_the_dataset_appears_on_every_row() {
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "2024-03-05", "Dana Cole"),
        entry("P2", "Crane Survey", "2024-03-05", "Omar Haddad"),
    ];

    let report = allocation_report(&rows, march(), AllocationMode::Raw).unwrap();
    for summary in report.rows.values() {
        let codes: Vec<&str> = summary
            .shares
            .iter()
            .map(|share| share.project_code.as_str())
            .collect();
        assert_eq!(codes, vec!["P1", "P2"]);
    }
}

// =============================================================================
// Structural Errors and Noisy Input
// =============================================================================

#[test]
fn test_missing_header_and_empty_source_are_fatal() {
    let no_rows: Vec<Vec<CellValue>> = Vec::new();
    let err = quality_report(&no_rows, march()).unwrap_err();
    assert!(matches!(err, EngineError::MissingHeader));

    let header_only = vec![header()];
    let err = quality_report(&header_only, march()).unwrap_err();
    assert!(matches!(err, EngineError::EmptySource));
}

#[test]
fn test_entirely_noisy_data_yields_an_empty_report_not_an_error() {
    let rows = vec![
        header(),
        entry("P1", "Wharf Fitout", "", "Dana Cole"),
        entry("P1", "Wharf Fitout", "2024-03-05", ""),
        entry("P1", "Wharf Fitout", "not a date", "Dana Cole"),
        entry("P1", "Wharf Fitout", "2024-04-01", "Dana Cole"),
    ];

    let report = absence_report(&rows, march(), &WeekendRoster::default()).unwrap();
    assert!(report.summaries.is_empty());
    assert_eq!(report.meta.rows_ingested, 0);
    assert_eq!(report.meta.rows_skipped, 4);
}

#[test]
fn test_invalid_period_is_rejected_up_front() {
    let err = ReportPeriod::new(2024, 13).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidPeriod { year: 2024, month: 13 }
    ));
}

// =============================================================================
// Engine Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_weekday_counts_sum_to_the_month_length(year in 1970i32..2100, month in 1u32..=12) {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        let total: u32 = weekdays
            .iter()
            .map(|weekday| count_weekday(year, month, *weekday))
            .sum();
        prop_assert_eq!(total, days_in_month(year, month));
    }

    #[test]
    fn prop_absence_clamp_matches_the_signed_reference(
        worked_days in 0u32..60,
        worked_fridays in 0u32..60,
        worked_saturdays in 0u32..60,
        month_days in 28u32..=31,
        month_fridays in 4u32..=5,
        month_saturdays in 4u32..=5,
    ) {
        let tally = WorkTally {
            worked_days,
            worked_fridays,
            worked_saturdays,
        };

        let friday_only = i64::from(month_days)
            - i64::from(worked_days)
            - (i64::from(month_fridays) - i64::from(worked_fridays));
        prop_assert_eq!(
            absent_day_count(
                WeekendPolicy::FridayOnly,
                tally,
                month_days,
                month_fridays,
                month_saturdays,
            ),
            friday_only.max(0) as u32
        );

        let both_days = i64::from(month_days)
            - i64::from(worked_days)
            - (i64::from(month_fridays) + i64::from(month_saturdays)
                - i64::from(worked_fridays)
                - i64::from(worked_saturdays));
        prop_assert_eq!(
            absent_day_count(
                WeekendPolicy::FridayAndSaturday,
                tally,
                month_days,
                month_fridays,
                month_saturdays,
            ),
            both_days.max(0) as u32
        );
    }

    #[test]
    fn prop_full_attendance_always_restores_the_baseline(year in 2000i32..2100, month in 1u32..=12) {
        let rows = full_month_rows(year, month, "Dana Cole");
        let period = ReportPeriod::new(year, month).unwrap();

        let report = absence_report(&rows, period, &WeekendRoster::default()).unwrap();
        let dana = &report.summaries["Dana Cole"];
        prop_assert_eq!(dana.absent_days, 0);
        prop_assert_eq!(dana.payrun_days, PAYRUN_BASELINE_DAYS);
    }

    #[test]
    fn prop_with_unassigned_rows_total_100_within_tolerance(
        assignments in proptest::collection::vec(0usize..4, 1..=12),
    ) {
        let codes = ["P1", "P2", "P3", "P4"];
        let mut rows = vec![header()];
        for (day_offset, code_index) in assignments.iter().enumerate() {
            rows.push(entry(
                codes[*code_index],
                "Site Works",
                &format!("2024-03-{:02}", day_offset + 1),
                "Dana Cole",
            ));
        }

        let report = allocation_report(&rows, march(), AllocationMode::WithUnassigned).unwrap();
        let total = report.rows["Dana Cole"].total_percentage;
        prop_assert!((total - Decimal::from(100)).abs() <= BALANCE_TOLERANCE);
    }

    #[test]
    fn prop_quality_audit_is_idempotent(
        days in proptest::collection::vec((1u32..=28, 0usize..3, 0usize..2), 1..=16),
    ) {
        let codes = ["X1", "X2", "X3"];
        let employees = ["Dana Cole", "Omar Haddad"];
        let mut rows = vec![header()];
        for (day, code_index, employee_index) in days {
            rows.push(entry(
                codes[code_index],
                &format!("{} works", codes[code_index]),
                &format!("2024-03-{:02}", day),
                employees[employee_index],
            ));
        }

        let first = quality_report(&rows, march()).unwrap();
        let second = quality_report(&rows, march()).unwrap();
        prop_assert_eq!(first.audit, second.audit);
    }
}
