//! Sheet-level edit operations
//!
//! Lock changes, base changes, and fee editing. Each operation clones the
//! sheet, runs a full recomputation pass, and returns the same
//! all-or-nothing `Recalculation` the category edit path does.

use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{
    BaseConfig, CategoryId, FeeBase, FeeId, FeeKind, FeeRule, LockMode, Money, Percent, TopSheet,
};
use crate::services::recalc::{self, Recalculation};

/// Change a category's lock mode directly, then recalculate.
///
/// Unlike the edit path, this can unlock a category or swap which of its
/// quantities is authoritative without touching either value.
pub fn set_lock_mode(
    sheet: &TopSheet,
    category_id: CategoryId,
    mode: LockMode,
) -> TopsheetResult<Recalculation> {
    if sheet.is_contingency(category_id) {
        return Err(TopsheetError::InvalidValue(
            "the contingency line is not editable".into(),
        ));
    }
    let mut next = sheet.clone();
    let base = next.percent_base();
    let category = next
        .category_mut(category_id)
        .ok_or_else(|| TopsheetError::category_not_found(category_id.to_string()))?;
    category.lock_mode = mode;

    finish(next, base)
}

/// Lock every category's amount in place
pub fn lock_all(sheet: &TopSheet) -> TopsheetResult<Recalculation> {
    set_all_locks(sheet, LockMode::LockedAmount)
}

/// Unlock every category
pub fn unlock_all(sheet: &TopSheet) -> TopsheetResult<Recalculation> {
    set_all_locks(sheet, LockMode::Unlocked)
}

fn set_all_locks(sheet: &TopSheet, mode: LockMode) -> TopsheetResult<Recalculation> {
    let mut next = sheet.clone();
    let base = next.percent_base();
    for group in &mut next.groups {
        for category in &mut group.categories {
            category.lock_mode = mode;
        }
    }
    finish(next, base)
}

/// Move the sheet to a new fixed target total.
///
/// Every category that is not amount-locked re-derives its amount from
/// its retained percentage against the new base; amount-locked categories
/// keep their amounts and re-derive their percentages.
pub fn set_base(sheet: &TopSheet, new_base: Money) -> TopsheetResult<Recalculation> {
    if new_base.is_negative() {
        return Err(TopsheetError::InvalidValue(
            "the target total must not be negative".into(),
        ));
    }
    let mut next = sheet.clone();
    next.base = BaseConfig::FixedTotal(new_base);
    for group in &mut next.groups {
        for category in &mut group.categories {
            match category.lock_mode {
                LockMode::LockedAmount => {
                    category.percentage = Percent::ratio_of(category.amount, new_base);
                }
                LockMode::LockedPercentage | LockMode::Unlocked => {
                    category.amount = new_base.percent_of(category.percentage);
                }
            }
        }
    }
    recalc::recompute_fees(&mut next);
    recalc::settle_contingency(&mut next);
    next.touch();

    let deltas = recalc::delta_report(&next);
    Ok(Recalculation {
        sheet: next,
        deltas,
        advisories: Vec::new(),
    })
}

/// Add a fee rule, then recalculate
pub fn add_fee(sheet: &TopSheet, name: &str, kind: FeeKind) -> TopsheetResult<Recalculation> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TopsheetError::InvalidValue("fee name must not be empty".into()));
    }
    if sheet.fee_by_name(name).is_some() {
        return Err(TopsheetError::InvalidValue(format!(
            "a fee named '{}' already exists",
            name
        )));
    }
    validate_fee_kind(sheet, &kind)?;

    let mut next = sheet.clone();
    next.fees.push(FeeRule::new(name, kind));
    let base = next.percent_base();
    finish(next, base)
}

/// Replace a fee rule's kind, then recalculate
pub fn set_fee(sheet: &TopSheet, fee_id: FeeId, kind: FeeKind) -> TopsheetResult<Recalculation> {
    validate_fee_kind(sheet, &kind)?;

    let mut next = sheet.clone();
    let base = next.percent_base();
    let fee = next
        .fees
        .iter_mut()
        .find(|f| f.id == fee_id)
        .ok_or_else(|| TopsheetError::fee_not_found(fee_id.to_string()))?;
    fee.kind = kind;

    finish(next, base)
}

/// Remove a fee rule, then recalculate
pub fn remove_fee(sheet: &TopSheet, fee_id: FeeId) -> TopsheetResult<Recalculation> {
    let mut next = sheet.clone();
    let base = next.percent_base();
    let before = next.fees.len();
    next.fees.retain(|f| f.id != fee_id);
    if next.fees.len() == before {
        return Err(TopsheetError::fee_not_found(fee_id.to_string()));
    }
    finish(next, base)
}

fn validate_fee_kind(sheet: &TopSheet, kind: &FeeKind) -> TopsheetResult<()> {
    match kind {
        FeeKind::Flat(amount) => {
            if amount.is_negative() {
                return Err(TopsheetError::InvalidValue(
                    "flat fee amount must not be negative".into(),
                ));
            }
        }
        FeeKind::Percentage { rate, base } => {
            if rate.is_negative() {
                return Err(TopsheetError::InvalidValue(
                    "fee rate must not be negative".into(),
                ));
            }
            if let FeeBase::Group(group_id) = base {
                if sheet.group(*group_id).is_none() {
                    return Err(TopsheetError::group_not_found(group_id.to_string()));
                }
            }
        }
    }
    Ok(())
}

fn finish(mut next: TopSheet, base: Money) -> TopsheetResult<Recalculation> {
    recalc::refresh(&mut next, base);
    next.touch();
    let deltas = recalc::delta_report(&next);
    Ok(Recalculation {
        sheet: next,
        deltas,
        advisories: Vec::new(),
    })
}
