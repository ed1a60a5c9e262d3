//! Snapshot and change tracking
//!
//! A sheet carries one snapshot: the per-category amounts at the last
//! commit. Deltas are always measured against it; committing simply makes
//! the present the new baseline.

use crate::models::TopSheet;
use crate::services::recalc::{self, CategoryDelta};

/// Commit the current amounts as the new snapshot (contingency included).
///
/// Idempotent: committing twice in a row changes nothing.
pub fn commit_snapshot(sheet: &TopSheet) -> TopSheet {
    let mut next = sheet.clone();
    for group in &mut next.groups {
        for category in &mut group.categories {
            category.prior_amount = category.amount;
        }
    }
    next.contingency.prior_amount = next.contingency.amount;
    next.touch();
    next
}

/// The current change map without performing an edit
pub fn deltas(sheet: &TopSheet) -> Vec<CategoryDelta> {
    recalc::delta_report(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseConfig, Category, Group, Money};
    use crate::services::recalc::{recalculate, refresh, EditValue};

    fn fixed_sheet() -> TopSheet {
        let mut sheet = TopSheet::new(
            "Short",
            BaseConfig::FixedTotal(Money::from_cents(600_000)),
        );
        let mut group = Group::new("Main");
        for (name, cents) in [("A", 200_000), ("B", 200_000), ("C", 200_000)] {
            let mut cat = Category::new(name);
            cat.amount = Money::from_cents(cents);
            cat.prior_amount = cat.amount;
            group.categories.push(cat);
        }
        sheet.groups.push(group);
        refresh(&mut sheet, Money::from_cents(600_000));
        sheet.contingency.prior_amount = sheet.contingency.amount;
        sheet
    }

    #[test]
    fn test_commit_zeroes_deltas() {
        let sheet = fixed_sheet();
        let id = sheet.category_by_name("A").unwrap().1.id;
        let edited = recalculate(&sheet, id, EditValue::Amount(Money::from_cents(300_000)))
            .unwrap()
            .sheet;

        assert!(deltas(&edited).iter().any(|d| !d.delta.is_zero()));

        let committed = commit_snapshot(&edited);
        assert!(deltas(&committed).iter().all(|d| d.delta.is_zero()));
    }

    #[test]
    fn test_commit_is_idempotent() {
        let sheet = fixed_sheet();
        let once = commit_snapshot(&sheet);
        let twice = commit_snapshot(&once);

        for (a, b) in once.categories().zip(twice.categories()) {
            assert_eq!(a.prior_amount, b.prior_amount);
        }
        assert_eq!(
            once.contingency.prior_amount,
            twice.contingency.prior_amount
        );
    }

    #[test]
    fn test_commit_includes_contingency() {
        let mut sheet = fixed_sheet();
        sheet.contingency.amount = Money::from_cents(12_345);
        let committed = commit_snapshot(&sheet);
        assert_eq!(
            committed.contingency.prior_amount,
            Money::from_cents(12_345)
        );
    }

    #[test]
    fn test_deltas_without_edit() {
        let sheet = fixed_sheet();
        let report = deltas(&sheet);
        // Three categories plus the contingency, in tree order
        assert_eq!(report.len(), 4);
        assert_eq!(report[0].name, "A");
        assert!(report[3].group.is_none());
    }
}
