//! Validated sheet construction
//!
//! Builds a `TopSheet` from plain inputs. All violations are collected and
//! returned as a single error so a caller sees every problem at once; no
//! partially-built sheet ever escapes. A successful build ends with a
//! normalization pass and an initial snapshot.

use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{
    BaseConfig, Category, FeeBase, FeeKind, FeeRule, Group, LockMode, Money, Percent, TopSheet,
};
use crate::services::recalc::{self, EditValue};

/// Input for one category line
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub value: EditValue,
    pub lock: LockMode,
}

/// Input for one group and its categories
#[derive(Debug, Clone)]
pub struct GroupInput {
    pub name: String,
    pub categories: Vec<CategoryInput>,
}

/// What a fee input's percentage is computed against; groups are
/// referenced by name since ids do not exist yet
#[derive(Debug, Clone)]
pub enum FeeBaseInput {
    GrandSubtotal,
    Group(String),
}

/// Input for one fee rule
#[derive(Debug, Clone)]
pub enum FeeKindInput {
    Percentage { rate: Percent, base: FeeBaseInput },
    Flat(Money),
}

/// Input for one fee line
#[derive(Debug, Clone)]
pub struct FeeInput {
    pub name: String,
    pub kind: FeeKindInput,
}

/// Complete input for building a sheet
#[derive(Debug, Clone)]
pub struct SheetInput {
    pub name: String,
    pub base: BaseConfig,
    pub groups: Vec<GroupInput>,
    pub fees: Vec<FeeInput>,
}

impl TopSheet {
    /// Build a validated sheet from inputs.
    ///
    /// Returns a `MalformedSheet` error listing every violation found,
    /// or a fully recalculated sheet with a committed initial snapshot.
    pub fn build(input: SheetInput) -> TopsheetResult<TopSheet> {
        let violations = validate(&input);
        if !violations.is_empty() {
            return Err(TopsheetError::MalformedSheet(violations.join("; ")));
        }

        let mut sheet = TopSheet::new(input.name, input.base);
        let mut percent_seeded = Vec::new();

        for group_input in &input.groups {
            let mut group = Group::new(group_input.name.trim());
            for cat_input in &group_input.categories {
                let mut category = Category::new(cat_input.name.trim());
                category.lock_mode = cat_input.lock;
                match cat_input.value {
                    EditValue::Amount(amount) => category.amount = amount,
                    EditValue::Percentage(pct) => {
                        category.percentage = pct;
                        percent_seeded.push(category.id);
                    }
                }
                group.categories.push(category);
            }
            sheet.groups.push(group);
        }

        // Percent base sampled once: the target, or the sum of the
        // amount-seeded categories
        let base = sheet.percent_base();
        for id in percent_seeded {
            if let Some(category) = sheet.category_mut(id) {
                category.amount = base.percent_of(category.percentage);
            }
        }

        for fee_input in &input.fees {
            let kind = match &fee_input.kind {
                FeeKindInput::Flat(amount) => FeeKind::Flat(*amount),
                FeeKindInput::Percentage { rate, base } => FeeKind::Percentage {
                    rate: *rate,
                    base: match base {
                        FeeBaseInput::GrandSubtotal => FeeBase::GrandSubtotal,
                        FeeBaseInput::Group(name) => {
                            // Presence was checked during validation
                            match sheet.group_by_name(name) {
                                Some(g) => FeeBase::Group(g.id),
                                None => {
                                    return Err(TopsheetError::group_not_found(name.clone()))
                                }
                            }
                        }
                    },
                },
            };
            sheet.fees.push(FeeRule::new(fee_input.name.trim(), kind));
        }

        recalc::refresh(&mut sheet, base);

        // Initial snapshot: the build state is the baseline
        for group in &mut sheet.groups {
            for category in &mut group.categories {
                category.prior_amount = category.amount;
            }
        }
        sheet.contingency.prior_amount = sheet.contingency.amount;

        Ok(sheet)
    }
}

fn validate(input: &SheetInput) -> Vec<String> {
    let mut violations = Vec::new();

    if input.name.trim().is_empty() {
        violations.push("sheet name must not be empty".to_string());
    }
    if let BaseConfig::FixedTotal(target) = input.base {
        if target.is_negative() {
            violations.push("target total must not be negative".to_string());
        }
    }

    let mut group_names: Vec<String> = Vec::new();
    for group in &input.groups {
        let group_name = group.name.trim();
        if group_name.is_empty() {
            violations.push("group name must not be empty".to_string());
        } else if group_names.iter().any(|n| n.eq_ignore_ascii_case(group_name)) {
            violations.push(format!("duplicate group name '{}'", group_name));
        } else {
            group_names.push(group_name.to_string());
        }

        let mut category_names: Vec<String> = Vec::new();
        for category in &group.categories {
            let cat_name = category.name.trim();
            if cat_name.is_empty() {
                violations.push(format!(
                    "category name in group '{}' must not be empty",
                    group_name
                ));
            } else if category_names
                .iter()
                .any(|n| n.eq_ignore_ascii_case(cat_name))
            {
                violations.push(format!(
                    "duplicate category name '{}' in group '{}'",
                    cat_name, group_name
                ));
            } else {
                category_names.push(cat_name.to_string());
            }

            let negative = match category.value {
                EditValue::Amount(m) => m.is_negative(),
                EditValue::Percentage(p) => p.is_negative(),
            };
            if negative {
                violations.push(format!(
                    "category '{}' must not have a negative value",
                    cat_name
                ));
            }
        }
    }

    let mut fee_names: Vec<String> = Vec::new();
    for fee in &input.fees {
        let fee_name = fee.name.trim();
        if fee_name.is_empty() {
            violations.push("fee name must not be empty".to_string());
        } else if fee_names.iter().any(|n| n.eq_ignore_ascii_case(fee_name)) {
            violations.push(format!("duplicate fee name '{}'", fee_name));
        } else {
            fee_names.push(fee_name.to_string());
        }

        match &fee.kind {
            FeeKindInput::Flat(amount) => {
                if amount.is_negative() {
                    violations.push(format!("fee '{}' must not be negative", fee_name));
                }
            }
            FeeKindInput::Percentage { rate, base } => {
                if rate.is_negative() {
                    violations.push(format!("fee '{}' rate must not be negative", fee_name));
                }
                if let FeeBaseInput::Group(name) = base {
                    if !input
                        .groups
                        .iter()
                        .any(|g| g.name.trim().eq_ignore_ascii_case(name.trim()))
                    {
                        violations.push(format!(
                            "fee '{}' references unknown group '{}'",
                            fee_name, name
                        ));
                    }
                }
            }
        }
    }

    violations
}
