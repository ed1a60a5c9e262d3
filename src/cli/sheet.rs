//! Sheet CLI commands
//!
//! Implements CLI commands for creating, listing, showing, and deleting
//! stored sheets.

use clap::Subcommand;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::display::{format_sheet, format_sheet_list};
use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{BaseConfig, Money, TopSheet};
use crate::services::SheetInput;
use crate::storage::Storage;

/// Sheet subcommands
#[derive(Subcommand)]
pub enum SheetCommands {
    /// Create a new empty sheet
    New {
        /// Sheet name
        name: String,
        /// Target total (e.g., "10000.00"); omit to float on the grand subtotal
        #[arg(short, long)]
        target: Option<String>,
    },
    /// List all sheets
    List,
    /// Show a sheet
    Show {
        /// Sheet name
        sheet: String,
    },
    /// Delete a sheet
    Delete {
        /// Sheet name
        sheet: String,
    },
}

/// Handle a sheet command
pub fn handle_sheet_command(
    storage: &Storage,
    audit: &AuditLogger,
    cmd: SheetCommands,
) -> TopsheetResult<()> {
    match cmd {
        SheetCommands::New { name, target } => {
            if storage.sheets.exists(&name)? {
                return Err(TopsheetError::InvalidValue(format!(
                    "a sheet named '{}' already exists",
                    name
                )));
            }

            let base = parse_base(target.as_deref())?;
            let sheet = TopSheet::build(SheetInput {
                name: name.clone(),
                base,
                groups: Vec::new(),
                fees: Vec::new(),
            })?;

            audit.log(&AuditEntry::create(
                EntityType::Sheet,
                &sheet.name,
                &sheet.name,
                &sheet,
            ))?;

            storage.sheets.upsert(sheet.clone())?;
            storage.save_all()?;

            println!("Created sheet: {}", sheet.name);
            match sheet.base {
                BaseConfig::FixedTotal(target) => println!("  Target total: {}", target),
                BaseConfig::GrandSubtotal => println!("  Base: grand subtotal"),
            }
            println!("Run 'topsheet import <file> --name {}' to load categories from CSV.", sheet.name);
        }

        SheetCommands::List => {
            let names = storage.sheets.list()?;
            print!("{}", format_sheet_list(&names));
        }

        SheetCommands::Show { sheet } => {
            let sheet = storage.sheets.get_required(&sheet)?;
            print!("{}", format_sheet(&sheet));
        }

        SheetCommands::Delete { sheet } => {
            let found = storage.sheets.get_required(&sheet)?;

            audit.log(&AuditEntry::delete(
                EntityType::Sheet,
                &found.name,
                &found.name,
                &found,
            ))?;

            storage.sheets.delete(&found.name)?;
            storage.save_all()?;

            println!("Deleted sheet: {}", found.name);
        }
    }

    Ok(())
}

/// Parse an optional target total into a base configuration
pub fn parse_base(target: Option<&str>) -> TopsheetResult<BaseConfig> {
    match target {
        Some(raw) => {
            let target = Money::parse(raw).map_err(|e| {
                TopsheetError::InvalidValue(format!("Invalid target total '{}': {}", raw, e))
            })?;
            Ok(BaseConfig::FixedTotal(target))
        }
        None => Ok(BaseConfig::GrandSubtotal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base() {
        assert_eq!(
            parse_base(Some("10000.00")).unwrap(),
            BaseConfig::FixedTotal(Money::from_cents(1_000_000))
        );
        assert_eq!(parse_base(None).unwrap(), BaseConfig::GrandSubtotal);
        assert!(parse_base(Some("not money")).is_err());
    }
}
