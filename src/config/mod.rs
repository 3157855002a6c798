//! Policy reference data for the Attendance Reconciliation Engine.
//!
//! This module provides the food-allowance reference tables (project flags,
//! employee coverage, leave recognition), loadable from YAML files or built
//! from auxiliary tabular sources.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::PolicyLoader;
//!
//! let loader = PolicyLoader::load("./config/policies").unwrap();
//! println!("Loaded {} covered employees", loader.tables().employee_count());
//! ```

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::{AllowancePolicy, EmployeePolicy, LeaveSettings, PolicyTables, ProjectPolicy};
