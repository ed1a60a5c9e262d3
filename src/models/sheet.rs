//! Top sheet model
//!
//! The budget tree: ordered groups of categories, sheet-level fee rules,
//! and a contingency line that absorbs whatever the tree and fees do not
//! account for. The contingency is engine-owned; it is never edited
//! directly and may go negative.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::fee::FeeRule;
use super::group::Group;
use super::ids::{CategoryId, FeeId, GroupId};
use super::money::Money;

/// What percentages are measured against, and whether the sheet
/// reconciles to an external target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseConfig {
    /// A configured target total: the percent base, and the figure the
    /// grand total must equal exactly after every recalculation
    FixedTotal(Money),
    /// No external target; the percent base is the current sum of group
    /// subtotals and the contingency rests at zero
    GrandSubtotal,
}

impl BaseConfig {
    /// The configured target, if the sheet has one
    pub fn target(&self) -> Option<Money> {
        match self {
            Self::FixedTotal(t) => Some(*t),
            Self::GrandSubtotal => None,
        }
    }
}

/// A complete top sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopSheet {
    /// Sheet name
    pub name: String,

    /// Percent base / reconciliation target configuration
    pub base: BaseConfig,

    /// Groups in display order
    pub groups: Vec<Group>,

    /// Fee rules in display order
    pub fees: Vec<FeeRule>,

    /// The contingency line; engine-computed, never user-edited
    pub contingency: Category,

    /// When the sheet was created
    pub created_at: DateTime<Utc>,

    /// When the sheet was last modified
    pub updated_at: DateTime<Utc>,
}

impl TopSheet {
    /// Create a new empty sheet
    pub fn new(name: impl Into<String>, base: BaseConfig) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            base,
            groups: Vec::new(),
            fees: Vec::new(),
            contingency: Category::new("Contingency"),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sum of all group subtotals
    pub fn grand_subtotal(&self) -> Money {
        self.groups.iter().map(|g| g.subtotal()).sum()
    }

    /// Sum of all computed fee amounts
    pub fn fees_total(&self) -> Money {
        self.fees.iter().map(|f| f.computed_amount).sum()
    }

    /// Grand total: subtotals + contingency + fees
    ///
    /// Equals the configured target exactly after every recalculation
    /// when the sheet is in fixed-total mode.
    pub fn grand_total(&self) -> Money {
        self.grand_subtotal() + self.contingency.amount + self.fees_total()
    }

    /// The base percentages are measured against
    pub fn percent_base(&self) -> Money {
        match self.base {
            BaseConfig::FixedTotal(t) => t,
            BaseConfig::GrandSubtotal => self.grand_subtotal(),
        }
    }

    /// Whether `id` addresses the contingency line
    pub fn is_contingency(&self, id: CategoryId) -> bool {
        self.contingency.id == id
    }

    /// Find a group by id
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Find a group by name (case-insensitive)
    pub fn group_by_name(&self, name: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }

    /// Find a category anywhere in the tree
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.groups.iter().find_map(|g| g.category(id))
    }

    /// Find a category anywhere in the tree, mutably
    pub fn category_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.groups.iter_mut().find_map(|g| g.category_mut(id))
    }

    /// Find a category by name (case-insensitive), with its group
    pub fn category_by_name(&self, name: &str) -> Option<(&Group, &Category)> {
        self.groups.iter().find_map(|g| {
            g.categories
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .map(|c| (g, c))
        })
    }

    /// The group containing a category
    pub fn group_of(&self, id: CategoryId) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|g| g.category(id).is_some())
            .map(|g| g.id)
    }

    /// Find a fee rule by id
    pub fn fee(&self, id: FeeId) -> Option<&FeeRule> {
        self.fees.iter().find(|f| f.id == id)
    }

    /// Find a fee rule by name (case-insensitive)
    pub fn fee_by_name(&self, name: &str) -> Option<&FeeRule> {
        self.fees
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Iterate over every category in tree order (contingency excluded)
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.groups.iter().flat_map(|g| g.categories.iter())
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
