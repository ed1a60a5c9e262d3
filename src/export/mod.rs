//! Export module for topsheet
//!
//! Provides complete sheet export functionality in multiple formats:
//! - CSV: The spreadsheet layout (round-trips through the CSV importer)
//! - JSON: For machine-readable full sheet export
//! - YAML: For human-readable full sheet export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::export_sheet_csv;
pub use json::{export_sheet_json, import_from_json, SheetExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_sheet_yaml, import_from_yaml};
