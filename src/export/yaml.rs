//! YAML Export functionality
//!
//! Exports a complete sheet to YAML format for human-readable backup.

use crate::error::{TopsheetError, TopsheetResult};
use crate::export::json::SheetExport;
use crate::models::TopSheet;
use std::io::Write;

/// Export a sheet to YAML format
pub fn export_sheet_yaml<W: Write>(sheet: &TopSheet, writer: &mut W) -> TopsheetResult<()> {
    let export = SheetExport::from_sheet(sheet);

    // Add a header comment
    writeln!(writer, "# Topsheet Export")
        .map_err(|e| TopsheetError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| TopsheetError::Export(e.to_string()))?;
    writeln!(writer, "# App Version: {}", export.app_version)
        .map_err(|e| TopsheetError::Export(e.to_string()))?;
    writeln!(writer, "#").map_err(|e| TopsheetError::Export(e.to_string()))?;
    writeln!(writer, "# This file can be used to restore the sheet.")
        .map_err(|e| TopsheetError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| TopsheetError::Export(e.to_string()))?;

    // Serialize to YAML
    serde_yaml::to_writer(writer, &export)
        .map_err(|e| TopsheetError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a YAML export
pub fn import_from_yaml(yaml_str: &str) -> TopsheetResult<SheetExport> {
    let export: SheetExport =
        serde_yaml::from_str(yaml_str).map_err(|e| TopsheetError::Import(e.to_string()))?;

    // Validate the import
    export.validate().map_err(TopsheetError::Import)?;

    Ok(export)
}
