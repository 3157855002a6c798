//! Policy reference-data loading.
//!
//! This module provides the [`PolicyLoader`] type for loading policy tables
//! from YAML files, and the row-based builder that materializes the same
//! tables from auxiliary tabular sources.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::CellValue;

use super::types::{AllowancePolicy, EmployeePolicy, LeaveSettings, PolicyTables, ProjectPolicy};

/// Positional columns of the auxiliary project table.
const PROJECT_COL_CODE: usize = 0;
const PROJECT_COL_NAME: usize = 1;
const PROJECT_COL_LOCATION: usize = 2;
const PROJECT_COL_POLICY1: usize = 3;
const PROJECT_COL_POLICY2: usize = 4;

/// Positional columns of the auxiliary employee table.
const EMPLOYEE_COL_NAME: usize = 0;
const EMPLOYEE_COL_AMOUNT: usize = 1;
const EMPLOYEE_COL_POLICY: usize = 2;

const EMPTY_CELL: CellValue = CellValue::Empty;

/// `projects.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
struct ProjectsConfig {
    projects: Vec<ProjectPolicy>,
}

/// `employees.yaml` file structure.
#[derive(Debug, Clone, Deserialize)]
struct EmployeesConfig {
    employees: Vec<EmployeePolicy>,
}

/// Loads and provides access to policy reference data.
///
/// # Directory Structure
///
/// The policy directory should have the following structure:
/// ```text
/// config/policies/
/// ├── projects.yaml   # Project allowance flags
/// ├── employees.yaml  # Employee coverage and daily amounts
/// └── leave.yaml      # Optional leave recognition overrides
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::PolicyLoader;
///
/// let loader = PolicyLoader::load("./config/policies").unwrap();
/// assert!(loader.tables().project("P-100").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct PolicyLoader {
    tables: PolicyTables,
    leave: LeaveSettings,
}

impl PolicyLoader {
    /// Loads policy reference data from the specified directory.
    ///
    /// `projects.yaml` and `employees.yaml` are required; `leave.yaml` is
    /// optional and falls back to [`LeaveSettings::default`] when absent.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the policy directory (e.g., "./config/policies")
    ///
    /// # Returns
    ///
    /// Returns a `PolicyLoader` on success, or an error if a required file
    /// is missing or any present file contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let projects_path = path.join("projects.yaml");
        let projects = Self::load_yaml::<ProjectsConfig>(&projects_path)?;

        let employees_path = path.join("employees.yaml");
        let employees = Self::load_yaml::<EmployeesConfig>(&employees_path)?;

        let leave_path = path.join("leave.yaml");
        let leave = if leave_path.exists() {
            Self::load_yaml::<LeaveSettings>(&leave_path)?
        } else {
            LeaveSettings::default()
        };

        Ok(Self {
            tables: PolicyTables::new(projects.projects, employees.employees),
            leave,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded policy tables.
    pub fn tables(&self) -> &PolicyTables {
        &self.tables
    }

    /// Returns the loaded leave recognition settings.
    pub fn leave(&self) -> &LeaveSettings {
        &self.leave
    }

    /// Consumes the loader, yielding the tables and leave settings.
    pub fn into_parts(self) -> (PolicyTables, LeaveSettings) {
        (self.tables, self.leave)
    }
}

impl PolicyTables {
    /// Builds the tables from the two auxiliary tabular sources.
    ///
    /// Both tables follow the attendance-sheet cell contract, and row 1 of
    /// each is a discarded header. Project rows are {code, name, location,
    /// policy1 yes/no, policy2 yes/no}; employee rows are {name,
    /// amountPerDay, policyName}. Yes/no cells accept `yes`, `y`, `true`,
    /// or `1` case-insensitively; anything else reads as no.
    ///
    /// Reference data is opt-in, so malformed rows (blank key, unparseable
    /// amount, unknown policy name) are logged and skipped rather than
    /// failing the load.
    pub fn from_rows(project_rows: &[Vec<CellValue>], employee_rows: &[Vec<CellValue>]) -> Self {
        let mut projects = Vec::new();
        for (index, row) in project_rows.iter().enumerate().skip(1) {
            let source_row = (index + 1) as u32;
            match parse_project_row(row) {
                Some(project) => projects.push(project),
                None => warn!(source_row, "skipping malformed project policy row"),
            }
        }

        let mut employees = Vec::new();
        for (index, row) in employee_rows.iter().enumerate().skip(1) {
            let source_row = (index + 1) as u32;
            match parse_employee_row(row) {
                Some(employee) => employees.push(employee),
                None => warn!(source_row, "skipping malformed employee policy row"),
            }
        }

        PolicyTables::new(projects, employees)
    }
}

fn cell_at(row: &[CellValue], index: usize) -> &CellValue {
    row.get(index).unwrap_or(&EMPTY_CELL)
}

fn parse_project_row(row: &[CellValue]) -> Option<ProjectPolicy> {
    let code_cell = cell_at(row, PROJECT_COL_CODE);
    if code_cell.is_blank() {
        return None;
    }

    Some(ProjectPolicy {
        code: code_cell.as_text().trim().to_string(),
        name: cell_at(row, PROJECT_COL_NAME).as_text().trim().to_string(),
        location: cell_at(row, PROJECT_COL_LOCATION)
            .as_text()
            .trim()
            .to_string(),
        policy1_eligible: parse_flag(cell_at(row, PROJECT_COL_POLICY1)),
        policy2_eligible: parse_flag(cell_at(row, PROJECT_COL_POLICY2)),
    })
}

fn parse_employee_row(row: &[CellValue]) -> Option<EmployeePolicy> {
    let name_cell = cell_at(row, EMPLOYEE_COL_NAME);
    if name_cell.is_blank() {
        return None;
    }

    let amount_per_day = parse_amount(cell_at(row, EMPLOYEE_COL_AMOUNT))?;
    let policy = AllowancePolicy::parse(&cell_at(row, EMPLOYEE_COL_POLICY).as_text()).ok()?;

    Some(EmployeePolicy {
        name: name_cell.as_text().trim().to_string(),
        amount_per_day,
        policy,
    })
}

/// Reads a yes/no cell. Only affirmative spellings count as yes.
fn parse_flag(cell: &CellValue) -> bool {
    matches!(
        cell.as_text().trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "1"
    )
}

fn parse_amount(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Number(value) => Decimal::from_f64(*value),
        CellValue::Text(text) => text.trim().parse().ok(),
        CellValue::Date(_) | CellValue::Empty => None,
    }
}
