//! Attendance Reconciliation Engine for monthly workforce reporting
//!
//! This crate ingests raw daily attendance rows (one row per employee per
//! worked day, tagged with a project) and derives monthly reports:
//! attendance/absence counts with payrun days, a data-quality audit,
//! food-allowance eligibility and cost, and per-project time-allocation
//! percentages.

#![warn(missing_docs)]

pub mod calculation;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod models;
