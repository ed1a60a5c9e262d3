//! Edit CLI commands
//!
//! Implements the category edit, lock, and base-change commands. Every
//! command loads the named sheet, runs the matching engine operation,
//! records the change in the audit log, and persists the new sheet.

use clap::Subcommand;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::display::format_change_report;
use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{LockMode, Money, Percent, TopSheet};
use crate::services::recalc::{recalculate, EditValue, Recalculation};
use crate::services::{lock_all, set_base, set_lock_mode, unlock_all};
use crate::storage::Storage;

/// Edit subcommands
#[derive(Subcommand)]
pub enum EditCommands {
    /// Set a category's amount
    SetAmount {
        /// Sheet name
        sheet: String,
        /// Category name
        category: String,
        /// New amount (e.g., "2500.00" or "2500")
        amount: String,
    },
    /// Set a category's percentage of the sheet base
    SetPercent {
        /// Sheet name
        sheet: String,
        /// Category name
        category: String,
        /// New percentage (e.g., "12.5" or "12.5%")
        percent: String,
    },
    /// Lock a category so recalculation cannot move it
    Lock {
        /// Sheet name
        sheet: String,
        /// Category name
        category: String,
        /// Lock the percentage instead of the amount
        #[arg(long)]
        percent: bool,
    },
    /// Unlock a category
    Unlock {
        /// Sheet name
        sheet: String,
        /// Category name
        category: String,
    },
    /// Lock every category's amount
    LockAll {
        /// Sheet name
        sheet: String,
    },
    /// Unlock every category
    UnlockAll {
        /// Sheet name
        sheet: String,
    },
    /// Change the sheet's target total
    Base {
        /// Sheet name
        sheet: String,
        /// New target total (e.g., "12000.00")
        target: String,
    },
}

/// Handle an edit command
pub fn handle_edit_command(
    storage: &Storage,
    audit: &AuditLogger,
    cmd: EditCommands,
) -> TopsheetResult<()> {
    match cmd {
        EditCommands::SetAmount {
            sheet,
            category,
            amount,
        } => {
            let amount = parse_amount(&amount)?;
            handle_category_edit(storage, audit, &sheet, &category, EditValue::Amount(amount))
        }

        EditCommands::SetPercent {
            sheet,
            category,
            percent,
        } => {
            let percent = parse_percent(&percent)?;
            handle_category_edit(
                storage,
                audit,
                &sheet,
                &category,
                EditValue::Percentage(percent),
            )
        }

        EditCommands::Lock {
            sheet,
            category,
            percent,
        } => {
            let mode = if percent {
                LockMode::LockedPercentage
            } else {
                LockMode::LockedAmount
            };
            handle_lock(storage, audit, &sheet, &category, mode)
        }

        EditCommands::Unlock { sheet, category } => {
            handle_lock(storage, audit, &sheet, &category, LockMode::Unlocked)
        }

        EditCommands::LockAll { sheet } => {
            let sheet = storage.sheets.get_required(&sheet)?;
            let result = lock_all(&sheet)?;

            audit.log(&AuditEntry::update(
                EntityType::Sheet,
                &sheet.name,
                &sheet.name,
                &sheet,
                &result.sheet,
                Some("all categories amount-locked".to_string()),
            ))?;
            persist(storage, &result)?;

            println!("Locked every category in '{}'.", result.sheet.name);
            Ok(())
        }

        EditCommands::UnlockAll { sheet } => {
            let sheet = storage.sheets.get_required(&sheet)?;
            let result = unlock_all(&sheet)?;

            audit.log(&AuditEntry::update(
                EntityType::Sheet,
                &sheet.name,
                &sheet.name,
                &sheet,
                &result.sheet,
                Some("all categories unlocked".to_string()),
            ))?;
            persist(storage, &result)?;

            println!("Unlocked every category in '{}'.", result.sheet.name);
            Ok(())
        }

        EditCommands::Base { sheet, target } => {
            let new_target = parse_amount(&target)?;
            let sheet = storage.sheets.get_required(&sheet)?;
            let result = set_base(&sheet, new_target)?;

            audit.log(&AuditEntry::update(
                EntityType::Sheet,
                &sheet.name,
                &sheet.name,
                &sheet.base,
                &result.sheet.base,
                Some(format!("target total set to {}", new_target)),
            ))?;
            persist(storage, &result)?;

            println!("Target total for '{}' is now {}.", result.sheet.name, new_target);
            print_advisories(&result);
            print!("{}", format_change_report(&result.deltas));
            Ok(())
        }
    }
}

fn handle_category_edit(
    storage: &Storage,
    audit: &AuditLogger,
    sheet_name: &str,
    category_name: &str,
    value: EditValue,
) -> TopsheetResult<()> {
    let sheet = storage.sheets.get_required(sheet_name)?;
    let before = find_category(&sheet, category_name)?.clone();

    let result = recalculate(&sheet, before.id, value)?;
    let after = result
        .sheet
        .category(before.id)
        .ok_or_else(|| TopsheetError::category_not_found(category_name))?;

    let summary = match value {
        EditValue::Amount(_) => format!("amount: {} -> {}", before.amount, after.amount),
        EditValue::Percentage(_) => {
            format!("percentage: {} -> {}", before.percentage, after.percentage)
        }
    };
    audit.log(&AuditEntry::update(
        EntityType::Category,
        &sheet.name,
        &before.name,
        &before,
        after,
        Some(summary),
    ))?;
    persist(storage, &result)?;

    print_advisories(&result);
    print!("{}", format_change_report(&result.deltas));
    Ok(())
}

fn handle_lock(
    storage: &Storage,
    audit: &AuditLogger,
    sheet_name: &str,
    category_name: &str,
    mode: LockMode,
) -> TopsheetResult<()> {
    let sheet = storage.sheets.get_required(sheet_name)?;
    let before = find_category(&sheet, category_name)?.clone();

    let result = set_lock_mode(&sheet, before.id, mode)?;
    let after = result
        .sheet
        .category(before.id)
        .ok_or_else(|| TopsheetError::category_not_found(category_name))?;

    audit.log(&AuditEntry::update(
        EntityType::Category,
        &sheet.name,
        &before.name,
        &before,
        after,
        Some(format!(
            "lock: {} -> {}",
            mode_name(before.lock_mode),
            mode_name(mode)
        )),
    ))?;
    persist(storage, &result)?;

    println!("'{}' is now {}.", before.name, mode_name(mode));
    Ok(())
}

fn find_category<'a>(
    sheet: &'a TopSheet,
    name: &str,
) -> TopsheetResult<&'a crate::models::Category> {
    sheet
        .category_by_name(name)
        .map(|(_, c)| c)
        .ok_or_else(|| TopsheetError::category_not_found(name))
}

fn persist(storage: &Storage, result: &Recalculation) -> TopsheetResult<()> {
    storage.sheets.upsert(result.sheet.clone())?;
    storage.save_all()
}

fn print_advisories(result: &Recalculation) {
    for advisory in &result.advisories {
        println!("Warning: {}", advisory);
    }
}

fn mode_name(mode: LockMode) -> &'static str {
    match mode {
        LockMode::Unlocked => "unlocked",
        LockMode::LockedAmount => "amount-locked",
        LockMode::LockedPercentage => "percentage-locked",
    }
}

fn parse_amount(raw: &str) -> TopsheetResult<Money> {
    Money::parse(raw)
        .map_err(|e| TopsheetError::InvalidValue(format!("Invalid amount '{}': {}", raw, e)))
}

fn parse_percent(raw: &str) -> TopsheetResult<Percent> {
    Percent::parse(raw)
        .map_err(|e| TopsheetError::InvalidValue(format!("Invalid percentage '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("2500.00").unwrap(), Money::from_cents(250_000));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("12.5%").unwrap(), Percent::parse("12.5").unwrap());
        assert!(parse_percent("x").is_err());
    }

    #[test]
    fn test_mode_name() {
        assert_eq!(mode_name(LockMode::Unlocked), "unlocked");
        assert_eq!(mode_name(LockMode::LockedAmount), "amount-locked");
        assert_eq!(mode_name(LockMode::LockedPercentage), "percentage-locked");
    }
}
