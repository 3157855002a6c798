//! Data-quality audit over the full attendance record set.
//!
//! The auditor works on the non-deduplicated record list in original row
//! order. It tags duplicate (employee, date) entries, detects project codes
//! recorded under more than one name, builds the deduplicated clean set,
//! and summarizes everything as counts and percentage rates.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::AttendanceRecord;

/// The audit classification of one record.
///
/// A record is never double-tagged: duplicate status takes precedence over
/// inconsistency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// First occurrence of its (employee, date) key, with a consistently
    /// named project.
    Clean,
    /// A later occurrence of an (employee, date) key seen earlier.
    Duplicate,
    /// First occurrence of its key, but its project code is recorded under
    /// more than one distinct normalized name across the set.
    Inconsistent,
}

/// One record with its audit classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    /// The audited record.
    pub record: AttendanceRecord,
    /// The classification assigned to it.
    pub status: RecordStatus,
}

/// One occurrence inside a duplicated (employee, date) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateOccurrence {
    /// The sheet row the occurrence came from.
    pub source_row: u32,
    /// The project code the occurrence was recorded under.
    pub project_code: String,
}

/// All occurrences of one duplicated (employee, date) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The employee the key belongs to.
    pub employee_name: String,
    /// The duplicated date.
    pub date: NaiveDate,
    /// Every occurrence of the key, the kept first one included.
    pub occurrences: Vec<DuplicateOccurrence>,
}

/// One original spelling of an inconsistently named project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameVariant {
    /// The project name exactly as recorded.
    pub project_name: String,
    /// The sheet rows that used this spelling.
    pub source_rows: Vec<u32>,
}

/// A project code recorded under more than one normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InconsistencyGroup {
    /// The project code.
    pub project_code: String,
    /// How many records in the set carry this code.
    pub record_count: usize,
    /// The distinct original spellings observed, in first-seen order.
    pub names: Vec<NameVariant>,
}

/// Count and rate summary of one audit run.
///
/// Rates are percentages of the total record count, rounded to one decimal
/// place, and zero when the set is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStatistics {
    /// Records audited.
    pub total_records: usize,
    /// Records surviving deduplication (first occurrence per key).
    pub clean_records: usize,
    /// Records tagged duplicate.
    pub duplicate_records: usize,
    /// Records carrying an inconsistently named project code, duplicates
    /// included.
    pub inconsistent_records: usize,
    /// Deduplication survivors that still carry an inconsistent code.
    pub clean_with_inconsistency: usize,
    /// Share of records surviving deduplication, as a percentage.
    pub validation_rate: Decimal,
    /// Share of records tagged duplicate, as a percentage.
    pub duplicate_rate: Decimal,
    /// Share of records carrying an inconsistent code, as a percentage.
    pub inconsistency_rate: Decimal,
}

/// The full output of one audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAudit {
    /// Every record with its classification, in original row order.
    pub validations: Vec<ValidationRecord>,
    /// Duplicated keys, in first-seen key order.
    pub duplicates: Vec<DuplicateGroup>,
    /// Inconsistently named project codes, in first-seen code order.
    pub inconsistencies: Vec<InconsistencyGroup>,
    /// The deduplicated clean set, in original row order.
    ///
    /// Inconsistency alone does not exclude a record here; only duplication
    /// does.
    pub clean_records: Vec<AttendanceRecord>,
    /// Count and rate summary.
    pub statistics: AuditStatistics,
}

/// Normalizes a project name for comparison: lowercase, trimmed, internal
/// whitespace collapsed to single spaces.
fn normalize_project_name(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Audits the full record set.
///
/// The same input always yields the identical report: classification,
/// grouping, and ordering depend only on record content and original order.
///
/// # Arguments
///
/// * `records` - The non-deduplicated record set, in original row order
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{audit_records, RecordStatus};
/// use attendance_engine::models::AttendanceRecord;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// let entry = AttendanceRecord {
///     employee_name: "Dana Cole".to_string(),
///     date,
///     project_code: "P-100".to_string(),
///     project_name: "Harbour Works".to_string(),
///     entered_by: "site.lead".to_string(),
///     source_row: 2,
/// };
/// let repeat = AttendanceRecord { source_row: 3, ..entry.clone() };
///
/// let audit = audit_records(&[entry, repeat]);
/// assert_eq!(audit.validations[0].status, RecordStatus::Clean);
/// assert_eq!(audit.validations[1].status, RecordStatus::Duplicate);
/// assert_eq!(audit.clean_records.len(), 1);
/// ```
pub fn audit_records(records: &[AttendanceRecord]) -> QualityAudit {
    // Duplicate pass: first occurrence per (employee, dateKey) survives.
    let mut occurrences_by_key: HashMap<(String, String), Vec<usize>> = HashMap::new();
    let mut duplicate_key_order: Vec<(String, String)> = Vec::new();
    let mut is_duplicate = vec![false; records.len()];

    for (index, record) in records.iter().enumerate() {
        let key = (record.employee_name.clone(), record.date_key());
        let entry = occurrences_by_key.entry(key.clone()).or_default();
        if !entry.is_empty() {
            is_duplicate[index] = true;
            if entry.len() == 1 {
                duplicate_key_order.push(key);
            }
        }
        entry.push(index);
    }

    // Inconsistency pass: distinct normalized names per project code.
    let mut code_order: Vec<String> = Vec::new();
    let mut normalized_names: HashMap<String, BTreeSet<String>> = HashMap::new();
    let mut name_variants: HashMap<String, Vec<NameVariant>> = HashMap::new();
    let mut records_per_code: HashMap<String, usize> = HashMap::new();

    for record in records {
        let code = record.project_code.clone();
        if !normalized_names.contains_key(&code) {
            code_order.push(code.clone());
        }
        normalized_names
            .entry(code.clone())
            .or_default()
            .insert(normalize_project_name(&record.project_name));
        *records_per_code.entry(code.clone()).or_insert(0) += 1;

        let variants = name_variants.entry(code).or_default();
        match variants
            .iter_mut()
            .find(|variant| variant.project_name == record.project_name)
        {
            Some(variant) => variant.source_rows.push(record.source_row),
            None => variants.push(NameVariant {
                project_name: record.project_name.clone(),
                source_rows: vec![record.source_row],
            }),
        }
    }

    let inconsistent_codes: HashSet<&String> = normalized_names
        .iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(code, _)| code)
        .collect();

    // Classification, clean set, and counts in one ordered pass.
    let mut validations = Vec::with_capacity(records.len());
    let mut clean_records = Vec::new();
    let mut inconsistent_records = 0;
    let mut clean_with_inconsistency = 0;

    for (index, record) in records.iter().enumerate() {
        let code_inconsistent = inconsistent_codes.contains(&record.project_code);
        if code_inconsistent {
            inconsistent_records += 1;
        }

        let status = if is_duplicate[index] {
            RecordStatus::Duplicate
        } else if code_inconsistent {
            clean_with_inconsistency += 1;
            RecordStatus::Inconsistent
        } else {
            RecordStatus::Clean
        };

        if !is_duplicate[index] {
            clean_records.push(record.clone());
        }
        validations.push(ValidationRecord {
            record: record.clone(),
            status,
        });
    }

    let duplicates = duplicate_key_order
        .into_iter()
        .map(|key| {
            let indices = &occurrences_by_key[&key];
            DuplicateGroup {
                employee_name: key.0,
                date: records[indices[0]].date,
                occurrences: indices
                    .iter()
                    .map(|&index| DuplicateOccurrence {
                        source_row: records[index].source_row,
                        project_code: records[index].project_code.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    let inconsistencies = code_order
        .into_iter()
        .filter(|code| inconsistent_codes.contains(code))
        .map(|code| InconsistencyGroup {
            record_count: records_per_code[&code],
            names: name_variants.remove(&code).unwrap_or_default(),
            project_code: code,
        })
        .collect();

    let total_records = records.len();
    let duplicate_records = is_duplicate.iter().filter(|&&flag| flag).count();
    let clean_count = total_records - duplicate_records;

    let statistics = AuditStatistics {
        total_records,
        clean_records: clean_count,
        duplicate_records,
        inconsistent_records,
        clean_with_inconsistency,
        validation_rate: rate_of(clean_count, total_records),
        duplicate_rate: rate_of(duplicate_records, total_records),
        inconsistency_rate: rate_of(inconsistent_records, total_records),
    };

    QualityAudit {
        validations,
        duplicates,
        inconsistencies,
        clean_records,
        statistics,
    }
}

/// Percentage of `count` over `total`, one decimal place, zero on an empty
/// set.
fn rate_of(count: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(count as u64) / Decimal::from(total as u64) * Decimal::from(100)).round_dp(1)
}
