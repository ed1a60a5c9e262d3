//! CSV sheet import
//!
//! Reads the spreadsheet layout: `Group,Category,Amount,Percentage` rows
//! for category lines, and fee rows under a group label starting with
//! `FEES`. Category rows must consistently carry either amounts or
//! percentages; mixing the two is an import error. Fee rows choose their
//! kind per row (flat amount or percentage of the grand subtotal).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{BaseConfig, LockMode, Money, Percent, TopSheet};
use crate::services::builder::{
    CategoryInput, FeeBaseInput, FeeInput, FeeKindInput, GroupInput, SheetInput,
};
use crate::services::recalc::EditValue;

/// Summary of a completed CSV import
#[derive(Debug)]
pub struct CsvImportResult {
    /// The built sheet
    pub sheet: TopSheet,
    /// Number of category rows imported
    pub categories: usize,
    /// Number of fee rows imported
    pub fees: usize,
}

struct CsvRow {
    line: usize,
    group: String,
    name: String,
    amount: String,
    percentage: String,
}

/// Import a sheet from CSV text
pub fn import_sheet_csv<R: Read>(
    reader: R,
    sheet_name: &str,
    base: BaseConfig,
) -> TopsheetResult<CsvImportResult> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut category_rows: Vec<CsvRow> = Vec::new();
    let mut fee_rows: Vec<CsvRow> = Vec::new();

    for (index, record) in csv_reader.records().enumerate() {
        let record = record
            .map_err(|e| TopsheetError::Import(format!("CSV parse error: {}", e)))?;
        // Header is row 1; data starts at row 2
        let line = index + 2;

        let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        let row = CsvRow {
            line,
            group: field(0),
            name: field(1),
            amount: field(2),
            percentage: field(3),
        };

        if row.group.is_empty() && row.name.is_empty() {
            continue;
        }
        if row.group.is_empty() || row.name.is_empty() {
            return Err(TopsheetError::Import(format!(
                "row {}: group and category names are required",
                line
            )));
        }

        if row.group.to_uppercase().starts_with("FEES") {
            fee_rows.push(row);
        } else {
            category_rows.push(row);
        }
    }

    if category_rows.is_empty() {
        return Err(TopsheetError::Import("no category rows found".into()));
    }

    let amount_mode = detect_mode(&category_rows)?;

    let mut groups: Vec<GroupInput> = Vec::new();
    for row in &category_rows {
        let value = if amount_mode {
            EditValue::Amount(parse_amount(row, &row.amount)?)
        } else {
            EditValue::Percentage(parse_percentage(row, &row.percentage)?)
        };
        let category = CategoryInput {
            name: row.name.clone(),
            value,
            lock: LockMode::Unlocked,
        };

        match groups
            .iter_mut()
            .find(|g| g.name.eq_ignore_ascii_case(&row.group))
        {
            Some(group) => group.categories.push(category),
            None => groups.push(GroupInput {
                name: row.group.clone(),
                categories: vec![category],
            }),
        }
    }

    let mut fees: Vec<FeeInput> = Vec::new();
    for row in &fee_rows {
        let kind = match (!row.amount.is_empty(), !row.percentage.is_empty()) {
            (true, false) => FeeKindInput::Flat(parse_amount(row, &row.amount)?),
            (false, true) => FeeKindInput::Percentage {
                rate: parse_percentage(row, &row.percentage)?,
                base: FeeBaseInput::GrandSubtotal,
            },
            (true, true) => {
                return Err(TopsheetError::Import(format!(
                    "row {}: fee '{}' has both an amount and a percentage",
                    row.line, row.name
                )))
            }
            (false, false) => {
                return Err(TopsheetError::Import(format!(
                    "row {}: fee '{}' has neither an amount nor a percentage",
                    row.line, row.name
                )))
            }
        };
        fees.push(FeeInput {
            name: row.name.clone(),
            kind,
        });
    }

    let categories = category_rows.len();
    let fee_count = fee_rows.len();

    let sheet = TopSheet::build(SheetInput {
        name: sheet_name.to_string(),
        base,
        groups,
        fees,
    })?;

    Ok(CsvImportResult {
        sheet,
        categories,
        fees: fee_count,
    })
}

/// Import a sheet from a CSV file on disk
pub fn import_sheet_csv_file(
    path: &Path,
    sheet_name: &str,
    base: BaseConfig,
) -> TopsheetResult<CsvImportResult> {
    let file = File::open(path)?;
    import_sheet_csv(file, sheet_name, base)
}

/// Decide whether category rows carry amounts or percentages.
///
/// Rows carrying both count as amount rows (the amount wins, matching the
/// exported layout where the percentage column is derived).
fn detect_mode(rows: &[CsvRow]) -> TopsheetResult<bool> {
    let mut amount_rows = 0usize;
    let mut percent_only_rows = 0usize;

    for row in rows {
        match (!row.amount.is_empty(), !row.percentage.is_empty()) {
            (true, _) => amount_rows += 1,
            (false, true) => percent_only_rows += 1,
            (false, false) => {
                return Err(TopsheetError::Import(format!(
                    "row {}: '{}' has neither an amount nor a percentage",
                    row.line, row.name
                )))
            }
        }
    }

    if amount_rows > 0 && percent_only_rows > 0 {
        return Err(TopsheetError::Import(
            "mixed amount and percentage rows; use one column consistently".into(),
        ));
    }
    Ok(amount_rows > 0)
}

fn parse_amount(row: &CsvRow, text: &str) -> TopsheetResult<Money> {
    Money::parse(text).map_err(|e| {
        TopsheetError::Import(format!("row {}: '{}': {}", row.line, row.name, e))
    })
}

fn parse_percentage(row: &CsvRow, text: &str) -> TopsheetResult<Percent> {
    Percent::parse(text).map_err(|e| {
        TopsheetError::Import(format!("row {}: '{}': {}", row.line, row.name, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AMOUNT_CSV: &str = "\
Group,Category,Amount,Percentage
Above the Line,Director,2000.00,
Above the Line,Cast,3000.00,
Production,Camera,4000.00,
FEES,Production Fee,,5
FEES,Completion Bond,250.00,
";

    fn fixed_base() -> BaseConfig {
        BaseConfig::FixedTotal(Money::from_cents(1_000_000))
    }

    #[test]
    fn test_import_amount_mode() {
        let result =
            import_sheet_csv(AMOUNT_CSV.as_bytes(), "Imported", fixed_base()).unwrap();
        assert_eq!(result.categories, 3);
        assert_eq!(result.fees, 2);

        let sheet = &result.sheet;
        assert_eq!(sheet.groups.len(), 2);
        assert_eq!(sheet.grand_subtotal(), Money::from_cents(900_000));

        let fee = sheet.fee_by_name("Production Fee").unwrap();
        assert_eq!(fee.computed_amount, Money::from_cents(45_000));
        let bond = sheet.fee_by_name("Completion Bond").unwrap();
        assert_eq!(bond.computed_amount, Money::from_cents(25_000));

        assert_eq!(sheet.grand_total(), Money::from_cents(1_000_000));
    }

    #[test]
    fn test_import_percentage_mode() {
        let csv = "\
Group,Category,Amount,Percentage
Main,Director,,20
Main,Cast,,30
";
        let result = import_sheet_csv(csv.as_bytes(), "Percentages", fixed_base()).unwrap();
        let director = result.sheet.category_by_name("Director").unwrap().1;
        assert_eq!(director.amount, Money::from_cents(200_000));
    }

    #[test]
    fn test_import_mixed_modes_rejected() {
        let csv = "\
Group,Category,Amount,Percentage
Main,Director,2000.00,
Main,Cast,,30
";
        let err = import_sheet_csv(csv.as_bytes(), "Mixed", fixed_base()).unwrap_err();
        assert!(matches!(err, TopsheetError::Import(_)));
        assert!(err.to_string().contains("mixed"));
    }

    #[test]
    fn test_import_empty_cell_rejected() {
        let csv = "\
Group,Category,Amount,Percentage
Main,Director,,
";
        let err = import_sheet_csv(csv.as_bytes(), "Empty", fixed_base()).unwrap_err();
        assert!(err.to_string().contains("neither"));
    }

    #[test]
    fn test_import_no_categories() {
        let csv = "Group,Category,Amount,Percentage\n";
        let err = import_sheet_csv(csv.as_bytes(), "Nothing", fixed_base()).unwrap_err();
        assert!(err.to_string().contains("no category rows"));
    }

    #[test]
    fn test_import_fee_with_both_cells_rejected() {
        let csv = "\
Group,Category,Amount,Percentage
Main,Director,2000.00,
FEES,Bond,250.00,5
";
        let err = import_sheet_csv(csv.as_bytes(), "BadFee", fixed_base()).unwrap_err();
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_import_groups_keep_order() {
        let result =
            import_sheet_csv(AMOUNT_CSV.as_bytes(), "Imported", fixed_base()).unwrap();
        let names: Vec<&str> = result.sheet.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Above the Line", "Production"]);
    }
}
