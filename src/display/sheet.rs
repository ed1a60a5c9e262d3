//! Sheet display formatting
//!
//! Formats top sheets and change reports for terminal output.

use crate::models::{BaseConfig, FeeBase, FeeKind, FeeRule, TopSheet};
use crate::services::recalc::CategoryDelta;

/// Format a complete top sheet for terminal output
pub fn format_sheet(sheet: &TopSheet) -> String {
    let name_width = name_column_width(sheet);

    let mut output = String::new();
    output.push_str(&format!("Sheet: {}\n", sheet.name));
    match sheet.base {
        BaseConfig::FixedTotal(target) => {
            output.push_str(&format!("Target total: {}\n", target));
        }
        BaseConfig::GrandSubtotal => {
            output.push_str("Base: grand subtotal (no fixed target)\n");
        }
    }
    output.push('\n');

    for group in &sheet.groups {
        output.push_str(&format!("{}\n", group.name));

        if group.categories.is_empty() {
            output.push_str("  (no categories)\n");
        } else {
            for (i, category) in group.categories.iter().enumerate() {
                let is_last = i == group.categories.len() - 1;
                let prefix = if is_last { "└──" } else { "├──" };
                output.push_str(&format!(
                    "  {} {} {:<width$}  {:>12}  {:>8}\n",
                    prefix,
                    category.lock_mode.marker(),
                    category.name,
                    category.amount.to_string(),
                    category.percentage.to_string(),
                    width = name_width
                ));
            }
        }
        output.push_str(&format!(
            "        {:<width$}  {:>12}\n\n",
            "subtotal",
            group.subtotal().to_string(),
            width = name_width
        ));
    }

    output.push_str(&format!(
        "{:<width$}  {:>12}\n",
        "SUBTOTAL",
        sheet.grand_subtotal().to_string(),
        width = name_width + 8
    ));

    for fee in &sheet.fees {
        output.push_str(&format!(
            "{:<width$}  {:>12}\n",
            fee_label(sheet, fee),
            fee.computed_amount.to_string(),
            width = name_width + 8
        ));
    }

    if let BaseConfig::FixedTotal(_) = sheet.base {
        output.push_str(&format!(
            "{:<width$}  {:>12}\n",
            "CONTINGENCY",
            sheet.contingency.amount.to_string(),
            width = name_width + 8
        ));
    }

    output.push_str(&format!(
        "{:<width$}  {:>12}\n",
        "GRAND TOTAL",
        sheet.grand_total().to_string(),
        width = name_width + 8
    ));

    output
}

fn fee_label(sheet: &TopSheet, fee: &FeeRule) -> String {
    match &fee.kind {
        FeeKind::Flat(_) => format!("{} (flat)", fee.name),
        FeeKind::Percentage {
            rate,
            base: FeeBase::GrandSubtotal,
        } => format!("{} ({})", fee.name, rate),
        FeeKind::Percentage {
            rate,
            base: FeeBase::Group(group_id),
        } => {
            let base_name = sheet
                .group(*group_id)
                .map(|g| g.name.as_str())
                .unwrap_or("?");
            format!("{} ({} of {})", fee.name, rate, base_name)
        }
    }
}

fn name_column_width(sheet: &TopSheet) -> usize {
    sheet
        .categories()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(8)
        .max(8)
}

/// Format the change report against the last committed snapshot
///
/// Only changed lines are shown; the contingency appears without a group
/// prefix.
pub fn format_change_report(deltas: &[CategoryDelta]) -> String {
    let changed: Vec<&CategoryDelta> = deltas.iter().filter(|d| !d.delta.is_zero()).collect();

    if changed.is_empty() {
        return "No changes since last commit.\n".to_string();
    }

    let labels: Vec<String> = changed.iter().map(|d| delta_label(d)).collect();
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(8);

    let mut output = String::new();
    output.push_str("Changes since last commit:\n");
    for (delta, label) in changed.iter().zip(labels.iter()) {
        output.push_str(&format!(
            "  {:<width$}  {:>12} -> {:>12}  ({})\n",
            label,
            delta.prior_amount.to_string(),
            delta.amount.to_string(),
            signed_amount(delta),
            width = label_width
        ));
    }

    output
}

fn delta_label(delta: &CategoryDelta) -> String {
    match &delta.group {
        Some(group) => format!("{} / {}", group, delta.name),
        None => delta.name.clone(),
    }
}

fn signed_amount(delta: &CategoryDelta) -> String {
    if delta.delta.is_negative() {
        delta.delta.to_string()
    } else {
        format!("+{}", delta.delta)
    }
}

/// Format a simple list of stored sheet names
pub fn format_sheet_list(names: &[String]) -> String {
    if names.is_empty() {
        return "No sheets found.\n\nRun 'topsheet new' to create one.".to_string();
    }

    let mut output = String::new();
    output.push_str("Sheets:\n");
    for name in names {
        output.push_str(&format!("  {}\n", name));
    }

    output
}
