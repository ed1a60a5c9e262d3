//! Fee CLI commands
//!
//! Implements CLI commands for managing sheet-level fee rules.

use clap::Subcommand;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::display::format_change_report;
use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{FeeBase, FeeKind, Money, Percent, TopSheet};
use crate::services::{add_fee, remove_fee, set_fee};
use crate::storage::Storage;

/// Fee subcommands
#[derive(Subcommand)]
pub enum FeeCommands {
    /// Add a fee rule to a sheet
    Add {
        /// Sheet name
        sheet: String,
        /// Fee name
        name: String,
        /// Flat fee amount (e.g., "500.00")
        #[arg(short, long, conflicts_with_all = ["rate", "of_group"])]
        amount: Option<String>,
        /// Percentage rate (e.g., "5" or "7.5%")
        #[arg(short, long)]
        rate: Option<String>,
        /// Compute the rate against a group's subtotal instead of the grand subtotal
        #[arg(long, requires = "rate")]
        of_group: Option<String>,
    },
    /// Replace a fee rule's amount or rate
    Set {
        /// Sheet name
        sheet: String,
        /// Fee name
        fee: String,
        /// Flat fee amount
        #[arg(short, long, conflicts_with_all = ["rate", "of_group"])]
        amount: Option<String>,
        /// Percentage rate
        #[arg(short, long)]
        rate: Option<String>,
        /// Compute the rate against a group's subtotal instead of the grand subtotal
        #[arg(long, requires = "rate")]
        of_group: Option<String>,
    },
    /// Remove a fee rule
    Remove {
        /// Sheet name
        sheet: String,
        /// Fee name
        fee: String,
    },
    /// List a sheet's fee rules
    List {
        /// Sheet name
        sheet: String,
    },
}

/// Handle a fee command
pub fn handle_fee_command(
    storage: &Storage,
    audit: &AuditLogger,
    cmd: FeeCommands,
) -> TopsheetResult<()> {
    match cmd {
        FeeCommands::Add {
            sheet,
            name,
            amount,
            rate,
            of_group,
        } => {
            let sheet = storage.sheets.get_required(&sheet)?;
            let kind = resolve_kind(&sheet, amount.as_deref(), rate.as_deref(), of_group.as_deref())?;

            let result = add_fee(&sheet, &name, kind)?;
            let fee = result
                .sheet
                .fee_by_name(&name)
                .ok_or_else(|| TopsheetError::fee_not_found(&name))?;

            audit.log(&AuditEntry::create(
                EntityType::Fee,
                &sheet.name,
                &fee.name,
                fee,
            ))?;
            storage.sheets.upsert(result.sheet.clone())?;
            storage.save_all()?;

            println!("Added fee '{}': {}", fee.name, fee.computed_amount);
            print!("{}", format_change_report(&result.deltas));
        }

        FeeCommands::Set {
            sheet,
            fee,
            amount,
            rate,
            of_group,
        } => {
            let sheet = storage.sheets.get_required(&sheet)?;
            let before = sheet
                .fee_by_name(&fee)
                .ok_or_else(|| TopsheetError::fee_not_found(&fee))?
                .clone();
            let kind = resolve_kind(&sheet, amount.as_deref(), rate.as_deref(), of_group.as_deref())?;

            let result = set_fee(&sheet, before.id, kind)?;
            let after = result
                .sheet
                .fee(before.id)
                .ok_or_else(|| TopsheetError::fee_not_found(&fee))?;

            audit.log(&AuditEntry::update(
                EntityType::Fee,
                &sheet.name,
                &before.name,
                &before,
                after,
                Some(format!(
                    "computed: {} -> {}",
                    before.computed_amount, after.computed_amount
                )),
            ))?;
            storage.sheets.upsert(result.sheet.clone())?;
            storage.save_all()?;

            println!("Updated fee '{}': {}", after.name, after.computed_amount);
            print!("{}", format_change_report(&result.deltas));
        }

        FeeCommands::Remove { sheet, fee } => {
            let sheet = storage.sheets.get_required(&sheet)?;
            let found = sheet
                .fee_by_name(&fee)
                .ok_or_else(|| TopsheetError::fee_not_found(&fee))?
                .clone();

            let result = remove_fee(&sheet, found.id)?;

            audit.log(&AuditEntry::delete(
                EntityType::Fee,
                &sheet.name,
                &found.name,
                &found,
            ))?;
            storage.sheets.upsert(result.sheet.clone())?;
            storage.save_all()?;

            println!("Removed fee '{}'.", found.name);
            print!("{}", format_change_report(&result.deltas));
        }

        FeeCommands::List { sheet } => {
            let sheet = storage.sheets.get_required(&sheet)?;

            if sheet.fees.is_empty() {
                println!("No fees on '{}'.", sheet.name);
                return Ok(());
            }

            println!("Fees on '{}':", sheet.name);
            for fee in &sheet.fees {
                println!(
                    "  {}  {}  {}",
                    fee.name,
                    kind_label(&sheet, &fee.kind),
                    fee.computed_amount
                );
            }
        }
    }

    Ok(())
}

/// Resolve CLI flags into a fee kind; exactly one of amount or rate
fn resolve_kind(
    sheet: &TopSheet,
    amount: Option<&str>,
    rate: Option<&str>,
    of_group: Option<&str>,
) -> TopsheetResult<FeeKind> {
    match (amount, rate) {
        (Some(raw), None) => {
            let amount = Money::parse(raw).map_err(|e| {
                TopsheetError::InvalidValue(format!("Invalid fee amount '{}': {}", raw, e))
            })?;
            Ok(FeeKind::Flat(amount))
        }
        (None, Some(raw)) => {
            let rate = Percent::parse(raw).map_err(|e| {
                TopsheetError::InvalidValue(format!("Invalid fee rate '{}': {}", raw, e))
            })?;
            let base = match of_group {
                Some(name) => {
                    let group = sheet
                        .group_by_name(name)
                        .ok_or_else(|| TopsheetError::group_not_found(name))?;
                    FeeBase::Group(group.id)
                }
                None => FeeBase::GrandSubtotal,
            };
            Ok(FeeKind::Percentage { rate, base })
        }
        _ => Err(TopsheetError::InvalidValue(
            "provide exactly one of --amount or --rate".into(),
        )),
    }
}

fn kind_label(sheet: &TopSheet, kind: &FeeKind) -> String {
    match kind {
        FeeKind::Flat(_) => "flat".to_string(),
        FeeKind::Percentage {
            rate,
            base: FeeBase::GrandSubtotal,
        } => format!("{} of subtotal", rate),
        FeeKind::Percentage {
            rate,
            base: FeeBase::Group(group_id),
        } => {
            let name = sheet
                .group(*group_id)
                .map(|g| g.name.as_str())
                .unwrap_or("?");
            format!("{} of {}", rate, name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BaseConfig;

    fn empty_sheet() -> TopSheet {
        TopSheet::new("Pilot", BaseConfig::GrandSubtotal)
    }

    #[test]
    fn test_resolve_kind_flat() {
        let kind = resolve_kind(&empty_sheet(), Some("500.00"), None, None).unwrap();
        assert_eq!(kind, FeeKind::Flat(Money::from_cents(50_000)));
    }

    #[test]
    fn test_resolve_kind_rate() {
        let kind = resolve_kind(&empty_sheet(), None, Some("5"), None).unwrap();
        assert_eq!(
            kind,
            FeeKind::Percentage {
                rate: Percent::from_percent(5),
                base: FeeBase::GrandSubtotal,
            }
        );
    }

    #[test]
    fn test_resolve_kind_requires_one_flag() {
        assert!(resolve_kind(&empty_sheet(), None, None, None).is_err());
        assert!(resolve_kind(&empty_sheet(), Some("1"), Some("1"), None).is_err());
    }

    #[test]
    fn test_resolve_kind_unknown_group() {
        let err = resolve_kind(&empty_sheet(), None, Some("5"), Some("Post")).unwrap_err();
        assert!(err.is_not_found());
    }
}
