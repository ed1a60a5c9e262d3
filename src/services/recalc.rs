//! The recalculation engine
//!
//! Every mutating operation funnels through the passes in this module:
//! group redistribution, fee recomputation, and contingency settlement.
//! Operations take a sheet by reference, compute into a clone, and return
//! a fully consistent result or an error with the original untouched.

use crate::error::{TopsheetError, TopsheetResult};
use crate::models::money::round_div;
use crate::models::{
    BaseConfig, CategoryId, EditField, FeeBase, FeeKind, Group, LockMode, Money, Percent, TopSheet,
};
use std::fmt;

/// The value carried by an edit (and by category seeds at construction)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditValue {
    Amount(Money),
    Percentage(Percent),
}

impl EditValue {
    /// Which field this value targets
    pub fn field(&self) -> EditField {
        match self {
            Self::Amount(_) => EditField::Amount,
            Self::Percentage(_) => EditField::Percentage,
        }
    }

    fn is_negative(&self) -> bool {
        match self {
            Self::Amount(m) => m.is_negative(),
            Self::Percentage(p) => p.is_negative(),
        }
    }
}

/// One row of the change map
#[derive(Debug, Clone)]
pub struct CategoryDelta {
    pub category_id: CategoryId,
    /// Group name, or `None` for the contingency line
    pub group: Option<String>,
    pub name: String,
    pub amount: Money,
    pub prior_amount: Money,
    pub delta: Money,
}

/// Non-fatal conditions surfaced alongside a successful recalculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The edited group had no unlocked category to redistribute into,
    /// so the remainder flowed to the contingency
    NoMutableCategories { group: String },
    /// Locked amounts exceed the group's budget; the excess flowed to
    /// the contingency
    OverAllocated { group: String, excess: Money },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMutableCategories { group } => write!(
                f,
                "No unlocked categories in '{}'; the remainder moved to the contingency",
                group
            ),
            Self::OverAllocated { group, excess } => write!(
                f,
                "Locked amounts in '{}' exceed its budget by {}; the excess moved to the contingency",
                group, excess
            ),
        }
    }
}

/// Result of any engine operation: the new sheet, the change map, and
/// any advisories raised along the way
#[derive(Debug, Clone)]
pub struct Recalculation {
    pub sheet: TopSheet,
    pub deltas: Vec<CategoryDelta>,
    pub advisories: Vec<Advisory>,
}

/// Apply a single edit to a category and recalculate the whole sheet.
///
/// Percentages are always interpreted against the sheet's global base,
/// never the group subtotal. In grand-subtotal mode the base is sampled
/// once, before the edit lands.
pub fn recalculate(
    sheet: &TopSheet,
    category_id: CategoryId,
    value: EditValue,
) -> TopsheetResult<Recalculation> {
    if value.is_negative() {
        return Err(TopsheetError::InvalidValue(
            "amounts and percentages must not be negative".into(),
        ));
    }
    if sheet.is_contingency(category_id) {
        return Err(TopsheetError::InvalidValue(
            "the contingency line is not editable".into(),
        ));
    }
    let group_id = sheet
        .group_of(category_id)
        .ok_or_else(|| TopsheetError::category_not_found(category_id.to_string()))?;

    let mut next = sheet.clone();
    let mut advisories = Vec::new();
    let base = next.percent_base();

    {
        let group = next
            .groups
            .iter_mut()
            .find(|g| g.id == group_id)
            .ok_or_else(|| TopsheetError::group_not_found(group_id.to_string()))?;

        // Pre-edit group subtotal is the budget the group redistributes within
        let target = group.subtotal();
        apply_edit(group, category_id, value, base)?;
        redistribute(group, target, base, &mut advisories);
    }

    recompute_fees(&mut next);
    settle_contingency(&mut next);
    next.touch();

    let deltas = delta_report(&next);
    Ok(Recalculation {
        sheet: next,
        deltas,
        advisories,
    })
}

/// Store the edited value and move the category to the matching lock
fn apply_edit(
    group: &mut Group,
    category_id: CategoryId,
    value: EditValue,
    base: Money,
) -> TopsheetResult<()> {
    let category = group
        .category_mut(category_id)
        .ok_or_else(|| TopsheetError::category_not_found(category_id.to_string()))?;

    category.lock_mode = LockMode::for_edit(value.field());
    match value {
        EditValue::Amount(amount) => {
            category.amount = amount;
            category.percentage = Percent::ratio_of(amount, base);
        }
        EditValue::Percentage(pct) => {
            category.percentage = pct;
            category.amount = base.percent_of(pct);
        }
    }
    Ok(())
}

/// Redistribute the group's pre-edit budget across its categories.
///
/// Locked-amount categories keep their amounts, locked-percentage
/// categories recompute against the base, and unlocked categories split
/// whatever remains in proportion to their current amounts. Per-category
/// rounding drift is left for the contingency to absorb.
fn redistribute(group: &mut Group, target: Money, base: Money, advisories: &mut Vec<Advisory>) {
    for category in &mut group.categories {
        match category.lock_mode {
            LockMode::LockedPercentage => {
                category.amount = base.percent_of(category.percentage);
            }
            LockMode::LockedAmount => {
                category.percentage = Percent::ratio_of(category.amount, base);
            }
            LockMode::Unlocked => {}
        }
    }

    let pinned: Money = group
        .categories
        .iter()
        .filter(|c| c.lock_mode.is_locked())
        .map(|c| c.amount)
        .sum();

    let mut remaining = target - pinned;
    if remaining.is_negative() {
        advisories.push(Advisory::OverAllocated {
            group: group.name.clone(),
            excess: -remaining,
        });
        remaining = Money::zero();
    }

    let unlocked: Vec<usize> = group
        .categories
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.lock_mode.is_locked())
        .map(|(i, _)| i)
        .collect();

    if unlocked.is_empty() {
        if target != pinned {
            advisories.push(Advisory::NoMutableCategories {
                group: group.name.clone(),
            });
        }
        return;
    }

    let weight_total: i64 = unlocked
        .iter()
        .map(|&i| group.categories[i].amount.cents())
        .sum();

    for &i in &unlocked {
        let share = if weight_total > 0 {
            round_div(
                remaining.cents() as i128 * group.categories[i].amount.cents() as i128,
                weight_total as i128,
            )
        } else {
            // Nothing to weight by; split evenly
            round_div(remaining.cents() as i128, unlocked.len() as i128)
        };
        let category = &mut group.categories[i];
        category.amount = Money::from_cents(share);
        category.percentage = Percent::ratio_of(category.amount, base);
    }
}

/// Recompute every fee's cached amount from its basis
pub(crate) fn recompute_fees(sheet: &mut TopSheet) {
    let grand_subtotal = sheet.grand_subtotal();
    let group_subtotals: Vec<(crate::models::GroupId, Money)> =
        sheet.groups.iter().map(|g| (g.id, g.subtotal())).collect();

    for fee in &mut sheet.fees {
        fee.computed_amount = match fee.kind {
            FeeKind::Flat(amount) => amount,
            FeeKind::Percentage { rate, base } => {
                let basis = match base {
                    FeeBase::GrandSubtotal => grand_subtotal,
                    FeeBase::Group(group_id) => group_subtotals
                        .iter()
                        .find(|(id, _)| *id == group_id)
                        .map(|(_, subtotal)| *subtotal)
                        .unwrap_or_else(Money::zero),
                };
                basis.percent_of(rate)
            }
        };
    }
}

/// Settle the contingency line: the one place residuals are absorbed.
///
/// In fixed-total mode the contingency takes `target − (categories + fees)`
/// so the grand total lands on the target to the cent. In grand-subtotal
/// mode it rests at zero.
pub(crate) fn settle_contingency(sheet: &mut TopSheet) {
    match sheet.base {
        BaseConfig::FixedTotal(targ) => {
            let residual = targ - sheet.grand_subtotal() - sheet.fees_total();
            sheet.contingency.amount = residual;
            sheet.contingency.percentage = Percent::ratio_of(residual, targ);
        }
        BaseConfig::GrandSubtotal => {
            sheet.contingency.amount = Money::zero();
            sheet.contingency.percentage = Percent::zero();
        }
    }
}

/// Re-derive the dependent field of every category against `base`, then
/// refresh fees and the contingency. Used by operations that change locks,
/// fees, or the base without editing a category value.
pub(crate) fn refresh(sheet: &mut TopSheet, base: Money) {
    for group in &mut sheet.groups {
        for category in &mut group.categories {
            match category.lock_mode {
                LockMode::LockedPercentage => {
                    category.amount = base.percent_of(category.percentage);
                }
                LockMode::LockedAmount | LockMode::Unlocked => {
                    category.percentage = Percent::ratio_of(category.amount, base);
                }
            }
        }
    }
    recompute_fees(sheet);
    settle_contingency(sheet);
}

/// The current change map in tree order, contingency last
pub fn delta_report(sheet: &TopSheet) -> Vec<CategoryDelta> {
    let mut deltas = Vec::new();
    for group in &sheet.groups {
        for category in &group.categories {
            deltas.push(CategoryDelta {
                category_id: category.id,
                group: Some(group.name.clone()),
                name: category.name.clone(),
                amount: category.amount,
                prior_amount: category.prior_amount,
                delta: category.delta(),
            });
        }
    }
    let contingency = &sheet.contingency;
    deltas.push(CategoryDelta {
        category_id: contingency.id,
        group: None,
        name: contingency.name.clone(),
        amount: contingency.amount,
        prior_amount: contingency.prior_amount,
        delta: contingency.delta(),
    });
    deltas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, FeeRule};

    fn fixed_sheet() -> TopSheet {
        // $10,000.00 target, one group with three categories
        let mut sheet = TopSheet::new(
            "Feature",
            BaseConfig::FixedTotal(Money::from_cents(1_000_000)),
        );
        let mut group = Group::new("Production");
        for (name, cents) in [("Camera", 400_000), ("Grip", 300_000), ("Electric", 300_000)] {
            let mut cat = Category::new(name);
            cat.amount = Money::from_cents(cents);
            cat.prior_amount = cat.amount;
            group.categories.push(cat);
        }
        sheet.groups.push(group);
        let mut sheet = sheet;
        refresh(&mut sheet, Money::from_cents(1_000_000));
        sheet.contingency.prior_amount = sheet.contingency.amount;
        sheet
    }

    fn cat_id(sheet: &TopSheet, name: &str) -> CategoryId {
        sheet.category_by_name(name).unwrap().1.id
    }

    fn cat_amount(sheet: &TopSheet, name: &str) -> i64 {
        sheet.category_by_name(name).unwrap().1.amount.cents()
    }

    #[test]
    fn test_amount_edit_locks_and_redistributes() {
        let sheet = fixed_sheet();
        let id = cat_id(&sheet, "Camera");

        let result =
            recalculate(&sheet, id, EditValue::Amount(Money::from_cents(500_000))).unwrap();
        let next = &result.sheet;

        let camera = next.category_by_name("Camera").unwrap().1;
        assert_eq!(camera.amount.cents(), 500_000);
        assert_eq!(camera.lock_mode, LockMode::LockedAmount);

        // Remaining 500_000 of the pre-edit 1_000_000 subtotal splits
        // between Grip and Electric in proportion to 300_000 : 300_000
        assert_eq!(cat_amount(next, "Grip"), 250_000);
        assert_eq!(cat_amount(next, "Electric"), 250_000);

        // Original sheet untouched
        assert_eq!(cat_amount(&sheet, "Camera"), 400_000);
    }

    #[test]
    fn test_percentage_edit_uses_global_base() {
        let sheet = fixed_sheet();
        let id = cat_id(&sheet, "Camera");

        // 25% of the $10,000.00 base, not of the group subtotal
        let result =
            recalculate(&sheet, id, EditValue::Percentage(Percent::from_percent(25))).unwrap();
        let camera = result.sheet.category_by_name("Camera").unwrap().1;
        assert_eq!(camera.amount.cents(), 250_000);
        assert_eq!(camera.lock_mode, LockMode::LockedPercentage);
    }

    #[test]
    fn test_fixed_total_grand_total_is_exact() {
        let sheet = fixed_sheet();
        let id = cat_id(&sheet, "Grip");

        for cents in [123_457, 0, 999_999] {
            let result =
                recalculate(&sheet, id, EditValue::Amount(Money::from_cents(cents))).unwrap();
            assert_eq!(result.sheet.grand_total().cents(), 1_000_000);
        }
    }

    #[test]
    fn test_locked_categories_keep_amounts() {
        let mut sheet = fixed_sheet();
        let grip_id = cat_id(&sheet, "Grip");
        sheet.category_mut(grip_id).unwrap().lock_mode = LockMode::LockedAmount;

        let camera_id = cat_id(&sheet, "Camera");
        let result =
            recalculate(&sheet, camera_id, EditValue::Amount(Money::from_cents(500_000))).unwrap();

        // Grip is pinned; only Electric absorbs
        assert_eq!(cat_amount(&result.sheet, "Grip"), 300_000);
        assert_eq!(cat_amount(&result.sheet, "Electric"), 200_000);
    }

    #[test]
    fn test_negative_value_rejected() {
        let sheet = fixed_sheet();
        let id = cat_id(&sheet, "Camera");
        let err = recalculate(&sheet, id, EditValue::Amount(Money::from_cents(-1))).unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn test_contingency_not_editable() {
        let sheet = fixed_sheet();
        let id = sheet.contingency.id;
        let err = recalculate(&sheet, id, EditValue::Amount(Money::zero())).unwrap_err();
        assert!(err.is_invalid_value());
    }

    #[test]
    fn test_unknown_category() {
        let sheet = fixed_sheet();
        let err =
            recalculate(&sheet, CategoryId::new(), EditValue::Amount(Money::zero())).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_no_mutable_categories_advisory() {
        let mut sheet = fixed_sheet();
        for name in ["Grip", "Electric"] {
            let id = cat_id(&sheet, name);
            sheet.category_mut(id).unwrap().lock_mode = LockMode::LockedAmount;
        }

        let camera_id = cat_id(&sheet, "Camera");
        let result =
            recalculate(&sheet, camera_id, EditValue::Amount(Money::from_cents(100_000))).unwrap();

        assert!(result
            .advisories
            .iter()
            .any(|a| matches!(a, Advisory::NoMutableCategories { .. })));
        // The shortfall lands on the contingency; the target still holds
        assert_eq!(result.sheet.grand_total().cents(), 1_000_000);
    }

    #[test]
    fn test_over_allocated_advisory() {
        let mut sheet = fixed_sheet();
        let grip_id = cat_id(&sheet, "Grip");
        sheet.category_mut(grip_id).unwrap().lock_mode = LockMode::LockedAmount;

        // Push Camera past the whole group budget
        let camera_id = cat_id(&sheet, "Camera");
        let result = recalculate(
            &sheet,
            camera_id,
            EditValue::Amount(Money::from_cents(900_000)),
        )
        .unwrap();

        assert!(result
            .advisories
            .iter()
            .any(|a| matches!(a, Advisory::OverAllocated { .. })));
        // Electric is floored at zero rather than going negative
        assert_eq!(cat_amount(&result.sheet, "Electric"), 0);
        assert_eq!(result.sheet.grand_total().cents(), 1_000_000);
    }

    #[test]
    fn test_even_split_when_all_unlocked_are_zero() {
        let mut sheet = fixed_sheet();
        for name in ["Grip", "Electric"] {
            let id = cat_id(&sheet, name);
            sheet.category_mut(id).unwrap().amount = Money::zero();
        }
        // Group subtotal is now 400_000, all of it on Camera
        let camera_id = cat_id(&sheet, "Camera");
        let result = recalculate(
            &sheet,
            camera_id,
            EditValue::Amount(Money::from_cents(100_000)),
        )
        .unwrap();

        assert_eq!(cat_amount(&result.sheet, "Grip"), 150_000);
        assert_eq!(cat_amount(&result.sheet, "Electric"), 150_000);
    }

    #[test]
    fn test_recalculation_idempotent() {
        let sheet = fixed_sheet();
        let id = cat_id(&sheet, "Camera");

        let once =
            recalculate(&sheet, id, EditValue::Amount(Money::from_cents(350_000))).unwrap();
        let twice = recalculate(
            &once.sheet,
            id,
            EditValue::Amount(Money::from_cents(350_000)),
        )
        .unwrap();

        for (a, b) in once.sheet.categories().zip(twice.sheet.categories()) {
            assert_eq!(a.amount, b.amount, "category {} drifted", a.name);
        }
        assert_eq!(
            once.sheet.contingency.amount,
            twice.sheet.contingency.amount
        );
    }

    #[test]
    fn test_grand_subtotal_mode_contingency_rests_at_zero() {
        let mut sheet = fixed_sheet();
        sheet.base = BaseConfig::GrandSubtotal;
        let base = sheet.percent_base();
        refresh(&mut sheet, base);

        let id = cat_id(&sheet, "Camera");
        let result =
            recalculate(&sheet, id, EditValue::Amount(Money::from_cents(500_000))).unwrap();
        assert!(result.sheet.contingency.amount.is_zero());
    }

    #[test]
    fn test_percentage_fee_recomputes() {
        let mut sheet = fixed_sheet();
        sheet.fees.push(FeeRule::new(
            "Production Fee",
            FeeKind::Percentage {
                rate: Percent::from_percent(10),
                base: FeeBase::GrandSubtotal,
            },
        ));
        let base = sheet.percent_base();
        refresh(&mut sheet, base);

        let id = cat_id(&sheet, "Camera");
        let result =
            recalculate(&sheet, id, EditValue::Amount(Money::from_cents(500_000))).unwrap();

        // Group subtotal stays at 1_000_000 (redistribution), so the fee
        // is 10% of that and the contingency covers it
        let fee = result.sheet.fee_by_name("Production Fee").unwrap();
        assert_eq!(fee.computed_amount.cents(), 100_000);
        assert_eq!(result.sheet.grand_total().cents(), 1_000_000);
        assert_eq!(result.sheet.contingency.amount.cents(), -100_000);
    }

    #[test]
    fn test_group_based_fee() {
        let mut sheet = fixed_sheet();
        let group_id = sheet.groups[0].id;
        sheet.fees.push(FeeRule::new(
            "Dept Overhead",
            FeeKind::Percentage {
                rate: Percent::from_percent(5),
                base: FeeBase::Group(group_id),
            },
        ));
        let base = sheet.percent_base();
        refresh(&mut sheet, base);
        assert_eq!(
            sheet.fee_by_name("Dept Overhead").unwrap().computed_amount,
            Money::from_cents(50_000)
        );
    }

    #[test]
    fn test_deltas_track_prior_amounts() {
        let sheet = fixed_sheet();
        let id = cat_id(&sheet, "Camera");
        let result =
            recalculate(&sheet, id, EditValue::Amount(Money::from_cents(450_000))).unwrap();

        let camera_delta = result
            .deltas
            .iter()
            .find(|d| d.name == "Camera")
            .unwrap();
        assert_eq!(camera_delta.delta, Money::from_cents(50_000));
        assert_eq!(camera_delta.prior_amount, Money::from_cents(400_000));

        // Contingency appears last in the report
        assert!(result.deltas.last().unwrap().group.is_none());
    }
}
