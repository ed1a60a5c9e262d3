//! CLI command for sheet export
//!
//! Writes a stored sheet to disk in CSV, JSON, or YAML form.

use clap::ValueEnum;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::Settings;
use crate::error::{TopsheetError, TopsheetResult};
use crate::export::{export_sheet_csv, export_sheet_json, export_sheet_yaml};
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (spreadsheet layout, re-importable)
    Csv,
    /// JSON format (full sheet, machine-readable)
    Json,
    /// YAML format (full sheet, human-readable)
    Yaml,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    sheet: &str,
    output: &Path,
    format: ExportFormat,
    pretty: bool,
) -> TopsheetResult<()> {
    let sheet = storage.sheets.get_required(sheet)?;

    let file = File::create(output).map_err(|e| {
        TopsheetError::Export(format!("Failed to create file {}: {}", output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => {
            export_sheet_csv(&sheet, &mut writer)?;
            println!("Sheet '{}' exported to: {}", sheet.name, output.display());
            println!("Note: CSV keeps the category layout only. Use JSON or YAML for a full export.");
        }
        ExportFormat::Json => {
            let pretty = pretty || settings.pretty_export;
            export_sheet_json(&sheet, &mut writer, pretty)?;
            println!("Sheet '{}' exported to: {}", sheet.name, output.display());
        }
        ExportFormat::Yaml => {
            export_sheet_yaml(&sheet, &mut writer)?;
            println!("Sheet '{}' exported to: {}", sheet.name, output.display());
        }
    }

    Ok(())
}
