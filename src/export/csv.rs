//! CSV Export functionality
//!
//! Writes the spreadsheet layout read back by the CSV importer:
//! `Group,Category,Amount,Percentage` rows per category, then fee rows
//! under the `FEES` group label. Category rows carry both the amount and
//! the derived percentage. Group-based percentage fees cannot name their
//! base in this layout, so they are written as their computed flat amount.

use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{FeeBase, FeeKind, Money, Percent, TopSheet};
use std::io::Write;

/// Export a sheet to CSV
pub fn export_sheet_csv<W: Write>(sheet: &TopSheet, writer: &mut W) -> TopsheetResult<()> {
    writeln!(writer, "Group,Category,Amount,Percentage")
        .map_err(|e| TopsheetError::Export(e.to_string()))?;

    for group in &sheet.groups {
        for category in &group.categories {
            writeln!(
                writer,
                "{},{},{},{}",
                escape_csv(&group.name),
                escape_csv(&category.name),
                format_money(category.amount),
                format_percent(category.percentage)
            )
            .map_err(|e| TopsheetError::Export(e.to_string()))?;
        }
    }

    for fee in &sheet.fees {
        let (amount, percentage) = match fee.kind {
            FeeKind::Flat(amount) => (format_money(amount), String::new()),
            FeeKind::Percentage {
                rate,
                base: FeeBase::GrandSubtotal,
            } => (String::new(), format_percent(rate)),
            FeeKind::Percentage {
                base: FeeBase::Group(_),
                ..
            } => (format_money(fee.computed_amount), String::new()),
        };
        writeln!(
            writer,
            "FEES,{},{},{}",
            escape_csv(&fee.name),
            amount,
            percentage
        )
        .map_err(|e| TopsheetError::Export(e.to_string()))?;
    }

    Ok(())
}

fn format_money(amount: Money) -> String {
    format!("{:.2}", amount.cents() as f64 / 100.0)
}

fn format_percent(pct: Percent) -> String {
    pct.to_string().trim_end_matches('%').to_string()
}

/// Escape a string for CSV format
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseConfig, LockMode};
    use crate::services::builder::{
        CategoryInput, FeeBaseInput, FeeInput, FeeKindInput, GroupInput, SheetInput,
    };
    use crate::services::import::import_sheet_csv;
    use crate::services::recalc::EditValue;

    fn cat(name: &str, cents: i64) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            value: EditValue::Amount(Money::from_cents(cents)),
            lock: LockMode::Unlocked,
        }
    }

    fn sample_sheet() -> TopSheet {
        TopSheet::build(SheetInput {
            name: "Pilot".to_string(),
            base: BaseConfig::FixedTotal(Money::from_cents(1_000_000)),
            groups: vec![
                GroupInput {
                    name: "Above the Line".to_string(),
                    categories: vec![cat("Director", 200_000), cat("Cast", 300_000)],
                },
                GroupInput {
                    name: "Production".to_string(),
                    categories: vec![cat("Camera", 400_000)],
                },
            ],
            fees: vec![
                FeeInput {
                    name: "Production Fee".to_string(),
                    kind: FeeKindInput::Percentage {
                        rate: Percent::from_percent(5),
                        base: FeeBaseInput::GrandSubtotal,
                    },
                },
                FeeInput {
                    name: "Completion Bond".to_string(),
                    kind: FeeKindInput::Flat(Money::from_cents(25_000)),
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_export_sheet_csv() {
        let sheet = sample_sheet();

        let mut output = Vec::new();
        export_sheet_csv(&sheet, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.starts_with("Group,Category,Amount,Percentage\n"));
        assert!(csv.contains("Above the Line,Director,2000.00,20"));
        assert!(csv.contains("Production,Camera,4000.00,40"));
        assert!(csv.contains("FEES,Production Fee,,5"));
        assert!(csv.contains("FEES,Completion Bond,250.00,"));
        // Contingency is derived; it never appears as a row
        assert!(!csv.contains("Contingency"));
    }

    #[test]
    fn test_export_escapes_names() {
        let mut sheet = sample_sheet();
        sheet.groups[0].name = "Above, the Line".to_string();

        let mut output = Vec::new();
        export_sheet_csv(&sheet, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.contains("\"Above, the Line\",Director"));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let sheet = sample_sheet();

        let mut output = Vec::new();
        export_sheet_csv(&sheet, &mut output).unwrap();

        let result = import_sheet_csv(
            output.as_slice(),
            "Reimported",
            BaseConfig::FixedTotal(Money::from_cents(1_000_000)),
        )
        .unwrap();

        assert_eq!(result.categories, 3);
        assert_eq!(result.fees, 2);
        assert_eq!(result.sheet.grand_subtotal(), sheet.grand_subtotal());
        assert_eq!(result.sheet.grand_total(), sheet.grand_total());
    }
}
