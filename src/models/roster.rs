//! Weekly rest-day policy and roster.
//!
//! Every employee observes one of two weekly rest-day arrangements, which
//! decide how many calendar days of a month they were expected to work. The
//! roster is the caller-supplied list of employees on the Friday-plus-
//! Saturday arrangement; everyone else defaults to Friday-only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The weekly rest-day arrangement for one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendPolicy {
    /// Fridays are the only expected rest days. This is the default.
    FridayOnly,
    /// Both Fridays and Saturdays are expected rest days.
    FridayAndSaturday,
}

/// The set of employees observing the Friday-plus-Saturday arrangement.
///
/// Membership is matched on the trimmed, otherwise-verbatim employee name,
/// the same identity key used everywhere else in the engine. An empty
/// roster (the default) places every employee on [`WeekendPolicy::FridayOnly`].
///
/// # Example
///
/// ```
/// use attendance_engine::models::{WeekendPolicy, WeekendRoster};
///
/// let roster = WeekendRoster::from_names(["Dana Cole", " Omar Haddad "]);
/// assert_eq!(roster.policy_for("Dana Cole"), WeekendPolicy::FridayAndSaturday);
/// assert_eq!(roster.policy_for("Omar Haddad"), WeekendPolicy::FridayAndSaturday);
/// assert_eq!(roster.policy_for("Priya Nair"), WeekendPolicy::FridayOnly);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekendRoster {
    members: BTreeSet<String>,
}

impl WeekendRoster {
    /// Builds a roster from employee names.
    ///
    /// Names are trimmed before storage; blank entries are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let members = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self { members }
    }

    /// Returns true if the employee is on the Friday-plus-Saturday roster.
    pub fn is_member(&self, employee_name: &str) -> bool {
        self.members.contains(employee_name.trim())
    }

    /// Resolves the rest-day policy for an employee.
    pub fn policy_for(&self, employee_name: &str) -> WeekendPolicy {
        if self.is_member(employee_name) {
            WeekendPolicy::FridayAndSaturday
        } else {
            WeekendPolicy::FridayOnly
        }
    }
}
