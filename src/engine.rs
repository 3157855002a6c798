//! Report assembly for the Attendance Reconciliation Engine.
//!
//! This module is the engine's public surface: one entry point per report
//! type. Each entry point ingests the raw rows fresh, runs exactly one
//! derivation over the resulting attendance set, and wraps the outcome in
//! a [`ReportMeta`] carrying provenance (report id, timestamp, engine
//! version, row counts, timing). The four derivations never feed each
//! other; callers wanting several reports call several entry points.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculation::{
    AbsenceSummary, AllocationMode, AllocationSummary, AllowanceSummary, QualityAudit,
    allocate_projects, audit_records, evaluate_all, reconcile_all,
};
use crate::config::{LeaveSettings, PolicyTables};
use crate::error::EngineResult;
use crate::ingest::{AttendanceSet, ingest_rows};
use crate::models::{CellValue, ReportPeriod, WeekendRoster};

/// The version stamped on every report this engine produces.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provenance common to every report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Unique identifier for this report run.
    pub report_id: Uuid,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that produced it.
    pub engine_version: String,
    /// The month the report covers.
    pub period: ReportPeriod,
    /// Rows accepted by ingest.
    pub rows_ingested: usize,
    /// Rows skipped by ingest.
    pub rows_skipped: usize,
    /// Wall-clock time spent ingesting and deriving, in microseconds.
    pub duration_us: u64,
}

/// The monthly attendance/absence report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenceReport {
    /// Report provenance.
    pub meta: ReportMeta,
    /// Per-employee summaries, keyed by employee name.
    pub summaries: BTreeMap<String, AbsenceSummary>,
}

/// The data-quality report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    /// Report provenance.
    pub meta: ReportMeta,
    /// The full audit: classifications, duplicates, inconsistencies,
    /// the deduplicated clean set, and summary statistics.
    pub audit: QualityAudit,
}

/// The food-allowance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowanceReport {
    /// Report provenance.
    pub meta: ReportMeta,
    /// Per-employee summaries for covered employees only.
    pub summaries: BTreeMap<String, AllowanceSummary>,
}

/// The per-project time-allocation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    /// Report provenance.
    pub meta: ReportMeta,
    /// The presentation mode the rows were computed under.
    pub mode: AllocationMode,
    /// Per-employee allocation rows, keyed by employee name.
    pub rows: BTreeMap<String, AllocationSummary>,
}

/// Assembles the attendance/absence report for one month.
///
/// The roster names the employees on the Friday-and-Saturday rest policy;
/// everyone else defaults to Friday-only.
///
/// # Example
///
/// ```
/// use attendance_engine::engine::absence_report;
/// use attendance_engine::models::{CellValue, ReportPeriod, WeekendRoster};
///
/// let text = |value: &str| CellValue::Text(value.to_string());
/// let rows = vec![
///     vec![text("code"), text("name"), text("date"), text("employee"), text("by")],
///     vec![text("P-100"), text("Harbour"), text("2024-03-01"), text("Dana Cole"), text("x")],
///     vec![text("P-100"), text("Harbour"), text("2024-03-08"), text("Dana Cole"), text("x")],
/// ];
/// let period = ReportPeriod::new(2024, 3).unwrap();
///
/// let report = absence_report(&rows, period, &WeekendRoster::default()).unwrap();
/// assert_eq!(report.summaries["Dana Cole"].absent_days, 26);
/// ```
pub fn absence_report(
    rows: &[Vec<CellValue>],
    period: ReportPeriod,
    roster: &WeekendRoster,
) -> EngineResult<AbsenceReport> {
    let start_time = Instant::now();
    let set = ingest_rows(rows, period, roster)?;
    let summaries = reconcile_all(&set);
    let meta = assemble_meta(&set, start_time);
    info!(
        report_id = %meta.report_id,
        period = %period,
        employees = summaries.len(),
        rows_ingested = meta.rows_ingested,
        rows_skipped = meta.rows_skipped,
        duration_us = meta.duration_us,
        "Absence report assembled"
    );
    Ok(AbsenceReport { meta, summaries })
}

/// Assembles the data-quality report for one month.
pub fn quality_report(
    rows: &[Vec<CellValue>],
    period: ReportPeriod,
) -> EngineResult<QualityReport> {
    let start_time = Instant::now();
    let set = ingest_rows(rows, period, &WeekendRoster::default())?;
    let audit = audit_records(&set.records);
    let meta = assemble_meta(&set, start_time);
    info!(
        report_id = %meta.report_id,
        period = %period,
        duplicates = audit.duplicates.len(),
        inconsistencies = audit.inconsistencies.len(),
        duration_us = meta.duration_us,
        "Quality report assembled"
    );
    Ok(QualityReport { meta, audit })
}

/// Assembles the food-allowance report for one month.
///
/// Employees without a row in the employee policy table are excluded, not
/// zeroed; their attendance still feeds the other reports.
pub fn allowance_report(
    rows: &[Vec<CellValue>],
    period: ReportPeriod,
    tables: &PolicyTables,
    settings: &LeaveSettings,
) -> EngineResult<AllowanceReport> {
    let start_time = Instant::now();
    let set = ingest_rows(rows, period, &WeekendRoster::default())?;
    let summaries = evaluate_all(&set, tables, settings);
    let meta = assemble_meta(&set, start_time);
    info!(
        report_id = %meta.report_id,
        period = %period,
        covered_employees = summaries.len(),
        duration_us = meta.duration_us,
        "Allowance report assembled"
    );
    Ok(AllowanceReport { meta, summaries })
}

/// Assembles the time-allocation report for one month.
pub fn allocation_report(
    rows: &[Vec<CellValue>],
    period: ReportPeriod,
    mode: AllocationMode,
) -> EngineResult<AllocationReport> {
    let start_time = Instant::now();
    let set = ingest_rows(rows, period, &WeekendRoster::default())?;
    let allocation_rows = allocate_projects(&set, mode);
    let meta = assemble_meta(&set, start_time);
    info!(
        report_id = %meta.report_id,
        period = %period,
        employees = allocation_rows.len(),
        duration_us = meta.duration_us,
        "Allocation report assembled"
    );
    Ok(AllocationReport {
        meta,
        mode,
        rows: allocation_rows,
    })
}

fn assemble_meta(set: &AttendanceSet, start_time: Instant) -> ReportMeta {
    ReportMeta {
        report_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        engine_version: ENGINE_VERSION.to_string(),
        period: set.period,
        rows_ingested: set.rows_ingested(),
        rows_skipped: set.rows_skipped(),
        duration_us: start_time.elapsed().as_micros() as u64,
    }
}
