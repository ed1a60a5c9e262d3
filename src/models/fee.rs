//! Fee rule model
//!
//! Fees are sheet-level adjustments applied on top of the group tree:
//! either a percentage of some basis (the grand subtotal or a single
//! group's subtotal) or a flat amount. The stored `computed_amount` is a
//! cache; the engine recomputes it on every pass.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{FeeId, GroupId};
use super::money::Money;
use super::percent::Percent;

/// What a percentage fee is computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeBase {
    /// Sum of all group subtotals
    GrandSubtotal,
    /// Subtotal of one named group
    Group(GroupId),
}

/// How a fee's amount is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    /// A rate applied to a basis
    Percentage { rate: Percent, base: FeeBase },
    /// A fixed amount independent of the tree
    Flat(Money),
}

/// A named fee line on the sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeRule {
    /// Unique identifier
    pub id: FeeId,

    /// Fee name
    pub name: String,

    /// How the amount is derived
    pub kind: FeeKind,

    /// Last computed amount; refreshed by every recalculation
    pub computed_amount: Money,
}

impl FeeRule {
    /// Create a new fee rule with a zero cached amount
    pub fn new(name: impl Into<String>, kind: FeeKind) -> Self {
        Self {
            id: FeeId::new(),
            name: name.into(),
            kind,
            computed_amount: Money::zero(),
        }
    }
}

impl fmt::Display for FeeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
