//! Display formatting for terminal output
//!
//! Provides utilities for formatting sheets, change reports, and lists
//! for terminal display.

pub mod sheet;

pub use sheet::{format_change_report, format_sheet, format_sheet_list};
