//! Cell values from tabular attendance sources.
//!
//! Attendance data arrives as rows of loosely-typed spreadsheet cells. This
//! module defines the cell contract the ingest layer consumes: a cell is a
//! native date, free text, a number, or empty.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::date_key;

/// A single cell from a tabular attendance source.
///
/// Human-entered sheets mix cell types freely within one column, so every
/// positional column is read through this contract and coerced afterwards.
///
/// # Example
///
/// ```
/// use attendance_engine::models::CellValue;
///
/// let cell = CellValue::Text("  Dana Cole ".to_string());
/// assert_eq!(cell.as_text(), "  Dana Cole ");
/// assert!(!cell.is_blank());
/// assert!(CellValue::Empty.is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    /// A cell holding a native date value.
    Date(NaiveDate),
    /// A cell holding free text, kept verbatim.
    Text(String),
    /// A cell holding a numeric value.
    Number(f64),
    /// A cell with no value.
    Empty,
}

impl CellValue {
    /// Renders the cell as text.
    ///
    /// Text is returned verbatim. Numbers render through their shortest
    /// representation (no trailing zeros). Dates render as the canonical
    /// `YYYY-MM-DD` key. Empty cells render as the empty string.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::CellValue;
    ///
    /// assert_eq!(CellValue::Number(42.0).as_text(), "42");
    /// assert_eq!(CellValue::Number(42.5).as_text(), "42.5");
    /// assert_eq!(CellValue::Empty.as_text(), "");
    /// ```
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Date(date) => date_key(*date),
            CellValue::Text(text) => text.clone(),
            CellValue::Number(number) => format!("{}", number),
            CellValue::Empty => String::new(),
        }
    }

    /// Returns true if the cell carries no usable value.
    ///
    /// Empty cells are blank, and so is text that trims to nothing.
    /// Dates and numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Date(_) | CellValue::Number(_) => false,
        }
    }
}
