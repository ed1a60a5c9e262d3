//! CSV import CLI command
//!
//! Builds a new sheet from a spreadsheet-style CSV file.

use std::path::Path;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::cli::sheet::parse_base;
use crate::display::format_sheet;
use crate::error::{TopsheetError, TopsheetResult};
use crate::services::import_sheet_csv_file;
use crate::storage::Storage;

/// Import a sheet from a CSV file
pub fn handle_import_command(
    storage: &Storage,
    audit: &AuditLogger,
    file: &Path,
    name: &str,
    target: Option<&str>,
) -> TopsheetResult<()> {
    if !file.exists() {
        return Err(TopsheetError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }
    if storage.sheets.exists(name)? {
        return Err(TopsheetError::InvalidValue(format!(
            "a sheet named '{}' already exists; delete it first or pick another name",
            name
        )));
    }

    let base = parse_base(target)?;
    let result = import_sheet_csv_file(file, name, base)?;

    audit.log(&AuditEntry::create(
        EntityType::Sheet,
        &result.sheet.name,
        &result.sheet.name,
        &result.sheet,
    ))?;
    storage.sheets.upsert(result.sheet.clone())?;
    storage.save_all()?;

    println!(
        "Imported {} categories and {} fees from {}.",
        result.categories,
        result.fees,
        file.display()
    );
    println!();
    print!("{}", format_sheet(&result.sheet));
    Ok(())
}
