//! Error types for the Attendance Reconciliation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while deriving monthly reports.
//!
//! Row-level defects (missing fields, unparseable or out-of-window dates)
//! are deliberately NOT errors: the source data is assumed noisy and such
//! rows are skipped during ingest. Only structural defects abort a run.

use thiserror::Error;

/// The main error type for the Attendance Reconciliation Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policies.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Policy file not found: /missing/policies.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The attendance source contained no rows at all, so the mandatory
    /// header row is missing.
    #[error("Attendance source has no header row")]
    MissingHeader,

    /// The attendance source contained a header row but no data rows.
    #[error("Attendance source has no data rows below the header")]
    EmptySource,

    /// The requested report period is not a valid calendar month.
    #[error("Invalid report period: month {month} of year {year} (month must be 1-12)")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month (outside the 1-12 range).
        month: u32,
    },

    /// A policy reference-data file was not found at the specified path.
    #[error("Policy file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A policy reference-data file could not be parsed.
    #[error("Failed to parse policy file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An allowance policy identifier was not one of the known policies.
    #[error("Unknown allowance policy: {name}")]
    UnknownPolicy {
        /// The policy identifier that was not recognized.
        name: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
