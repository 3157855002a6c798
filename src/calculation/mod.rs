//! Calculation logic for the Attendance Reconciliation Engine.
//!
//! This module contains the four independent derivations run over one
//! ingested attendance set: attendance/absence reconciliation with payrun
//! day counts, the data-quality audit (duplicates and inconsistent project
//! naming), food-allowance evaluation against the policy tables, and
//! per-project time-allocation percentages. Each derivation is a pure
//! function of the attendance set; none of them calls another.

mod absence;
mod allocation;
mod allowance;
mod audit;

pub use absence::{
    AbsenceSummary, PAYRUN_BASELINE_DAYS, WorkTally, absent_day_count, reconcile_absence,
    reconcile_all,
};
pub use allocation::{
    AllocationMode, AllocationSummary, BALANCE_TOLERANCE, ProjectShare, allocate_projects,
};
pub use allowance::{
    AllowanceSummary, DayEligibility, DayEvaluation, REASON_ANNUAL_LEAVE,
    REASON_PROJECT_NOT_ELIGIBLE, evaluate_all, evaluate_allowance,
};
pub use audit::{
    AuditStatistics, DuplicateGroup, DuplicateOccurrence, InconsistencyGroup, NameVariant,
    QualityAudit, RecordStatus, ValidationRecord, audit_records,
};
