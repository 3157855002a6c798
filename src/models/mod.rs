//! Core data models for the Attendance Reconciliation Engine.
//!
//! This module contains the domain models shared by ingest and every
//! derivation component.

mod cell;
mod period;
mod record;
mod roster;

pub use cell::CellValue;
pub use period::ReportPeriod;
pub use record::{AttendanceRecord, MISSING_VALUE};
pub use roster::{WeekendPolicy, WeekendRoster};
