//! Category model
//!
//! A category is one line of a top sheet: a name, its current amount, the
//! percentage it represents of the sheet base, a lock mode, and the amount
//! it held when the last snapshot was committed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::lock::LockMode;
use super::money::Money;
use super::percent::Percent;

/// A budget line within a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Current allocated amount
    pub amount: Money,

    /// Percentage of the sheet base this amount represents
    pub percentage: Percent,

    /// Which quantity is authoritative during recalculation
    #[serde(default)]
    pub lock_mode: LockMode,

    /// Amount at the last committed snapshot
    pub prior_amount: Money,
}

impl Category {
    /// Create a new unlocked category with zero amounts
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            amount: Money::zero(),
            percentage: Percent::zero(),
            lock_mode: LockMode::Unlocked,
            prior_amount: Money::zero(),
        }
    }

    /// Change since the last committed snapshot
    pub fn delta(&self) -> Money {
        self.amount - self.prior_amount
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
