//! Policy reference-data types.
//!
//! This module contains the strongly-typed reference data behind the
//! food-allowance evaluator: which projects qualify under which allowance
//! policy, which employees are covered and at what daily amount, and how
//! annual leave is recognized in the attendance data.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The two food-allowance policies an employee can be covered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowancePolicy {
    /// The first allowance policy.
    Policy1,
    /// The second allowance policy.
    Policy2,
}

impl AllowancePolicy {
    /// Parses a policy identifier, case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::config::AllowancePolicy;
    ///
    /// assert_eq!(AllowancePolicy::parse("Policy1").unwrap(), AllowancePolicy::Policy1);
    /// assert!(AllowancePolicy::parse("policy3").is_err());
    /// ```
    pub fn parse(name: &str) -> EngineResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "policy1" => Ok(AllowancePolicy::Policy1),
            "policy2" => Ok(AllowancePolicy::Policy2),
            _ => Err(EngineError::UnknownPolicy {
                name: name.trim().to_string(),
            }),
        }
    }
}

/// One project's allowance eligibility flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectPolicy {
    /// The project code, as it appears in attendance data.
    pub code: String,
    /// The project's reference name.
    pub name: String,
    /// The project's location.
    pub location: String,
    /// Whether days on this project qualify under policy 1.
    pub policy1_eligible: bool,
    /// Whether days on this project qualify under policy 2.
    pub policy2_eligible: bool,
}

impl ProjectPolicy {
    /// Returns true if days on this project qualify under the given policy.
    pub fn eligible_for(&self, policy: AllowancePolicy) -> bool {
        match policy {
            AllowancePolicy::Policy1 => self.policy1_eligible,
            AllowancePolicy::Policy2 => self.policy2_eligible,
        }
    }
}

/// One employee's allowance coverage.
///
/// Employees without a row in the employee table are not covered at all:
/// the evaluator skips them rather than assuming a policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmployeePolicy {
    /// The employee's name, the same identity key attendance rows use.
    pub name: String,
    /// The daily allowance amount for eligible days.
    pub amount_per_day: Decimal,
    /// The policy the employee is covered by.
    pub policy: AllowancePolicy,
}

/// How annual leave is recognized in attendance entries.
///
/// A day counts as leave when any of its entries carries the reserved leave
/// project code, or (when a marker is configured) a project name containing
/// the marker phrase. Both checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LeaveSettings {
    /// The reserved project code recording annual leave.
    #[serde(default = "default_leave_code")]
    pub leave_code: String,
    /// The phrase marking a project name as annual leave, if any.
    ///
    /// `None` disables the name check; some report variants match on the
    /// code alone.
    #[serde(default = "default_leave_marker")]
    pub leave_marker: Option<String>,
}

fn default_leave_code() -> String {
    "AL".to_string()
}

fn default_leave_marker() -> Option<String> {
    Some("annual leave".to_string())
}

impl Default for LeaveSettings {
    fn default() -> Self {
        Self {
            leave_code: default_leave_code(),
            leave_marker: default_leave_marker(),
        }
    }
}

impl LeaveSettings {
    /// Returns true if the project code is the reserved leave code.
    pub fn is_leave_code(&self, project_code: &str) -> bool {
        project_code.trim().eq_ignore_ascii_case(&self.leave_code)
    }

    /// Returns true if the project name contains the leave marker phrase.
    ///
    /// Always false when no marker is configured.
    pub fn name_marks_leave(&self, project_name: &str) -> bool {
        match &self.leave_marker {
            Some(marker) => project_name.to_lowercase().contains(&marker.to_lowercase()),
            None => false,
        }
    }
}

/// The loaded policy reference data, indexed for lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyTables {
    projects: HashMap<String, ProjectPolicy>,
    employees: HashMap<String, EmployeePolicy>,
}

impl PolicyTables {
    /// Builds the tables from already-validated policy rows.
    pub fn new(projects: Vec<ProjectPolicy>, employees: Vec<EmployeePolicy>) -> Self {
        Self {
            projects: projects
                .into_iter()
                .map(|project| (project.code.clone(), project))
                .collect(),
            employees: employees
                .into_iter()
                .map(|employee| (employee.name.clone(), employee))
                .collect(),
        }
    }

    /// Looks up a project by code.
    pub fn project(&self, code: &str) -> Option<&ProjectPolicy> {
        self.projects.get(code)
    }

    /// Looks up an employee's coverage by name.
    pub fn employee(&self, name: &str) -> Option<&EmployeePolicy> {
        self.employees.get(name)
    }

    /// The number of projects in the table.
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    /// The number of covered employees.
    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn harbour_works() -> ProjectPolicy {
        ProjectPolicy {
            code: "P-100".to_string(),
            name: "Harbour Works".to_string(),
            location: "Fremantle".to_string(),
            policy1_eligible: true,
            policy2_eligible: false,
        }
    }

    #[test]
    fn test_parse_policy_identifiers() {
        assert_eq!(
            AllowancePolicy::parse("policy1").unwrap(),
            AllowancePolicy::Policy1
        );
        assert_eq!(
            AllowancePolicy::parse("  POLICY2 ").unwrap(),
            AllowancePolicy::Policy2
        );
    }

    #[test]
    fn test_parse_unknown_policy_is_error() {
        let error = AllowancePolicy::parse("policy3").unwrap_err();
        assert!(matches!(error, EngineError::UnknownPolicy { name } if name == "policy3"));
    }

    #[test]
    fn test_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&AllowancePolicy::Policy1).unwrap(),
            "\"policy1\""
        );
        assert_eq!(
            serde_json::to_string(&AllowancePolicy::Policy2).unwrap(),
            "\"policy2\""
        );
    }

    #[test]
    fn test_project_eligibility_per_policy() {
        let project = harbour_works();
        assert!(project.eligible_for(AllowancePolicy::Policy1));
        assert!(!project.eligible_for(AllowancePolicy::Policy2));
    }

    #[test]
    fn test_leave_settings_defaults() {
        let settings = LeaveSettings::default();
        assert_eq!(settings.leave_code, "AL");
        assert_eq!(settings.leave_marker.as_deref(), Some("annual leave"));
    }

    #[test]
    fn test_leave_code_match_is_case_insensitive() {
        let settings = LeaveSettings::default();
        assert!(settings.is_leave_code("AL"));
        assert!(settings.is_leave_code("al"));
        assert!(settings.is_leave_code(" Al "));
        assert!(!settings.is_leave_code("P-100"));
    }

    #[test]
    fn test_leave_marker_is_substring_case_insensitive() {
        let settings = LeaveSettings::default();
        assert!(settings.name_marks_leave("Annual Leave"));
        assert!(settings.name_marks_leave("2024 ANNUAL LEAVE carryover"));
        assert!(!settings.name_marks_leave("Harbour Works"));
    }

    #[test]
    fn test_disabled_marker_never_matches() {
        let settings = LeaveSettings {
            leave_code: "AL".to_string(),
            leave_marker: None,
        };
        assert!(!settings.name_marks_leave("Annual Leave"));
    }

    #[test]
    fn test_leave_settings_deserialize_fills_defaults() {
        let settings: LeaveSettings = serde_yaml::from_str("leave_code: HOLIDAY").unwrap();
        assert_eq!(settings.leave_code, "HOLIDAY");
        assert_eq!(settings.leave_marker.as_deref(), Some("annual leave"));
    }

    #[test]
    fn test_tables_lookup_by_code_and_name() {
        let tables = PolicyTables::new(
            vec![harbour_works()],
            vec![EmployeePolicy {
                name: "Dana Cole".to_string(),
                amount_per_day: dec("12.50"),
                policy: AllowancePolicy::Policy1,
            }],
        );

        assert_eq!(tables.project_count(), 1);
        assert_eq!(tables.employee_count(), 1);
        assert!(tables.project("P-100").is_some());
        assert!(tables.project("P-999").is_none());
        assert_eq!(
            tables.employee("Dana Cole").unwrap().amount_per_day,
            dec("12.50")
        );
        assert!(tables.employee("Nobody").is_none());
    }
}
