//! Category lock modes
//!
//! A lock decides which of a category's two quantities (amount or
//! percentage) is authoritative during recalculation. Editing a field
//! always moves the category to the matching lock; nothing in the edit
//! path ever unlocks a category implicitly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which field of a category an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Amount,
    Percentage,
}

/// Lock state of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    /// Absorbs redistribution; both fields are derived
    #[default]
    Unlocked,
    /// The amount is authoritative; percentage is derived
    LockedAmount,
    /// The percentage is authoritative; amount is derived from the base
    LockedPercentage,
}

impl LockMode {
    /// The lock mode a category ends up in after editing `field`
    pub fn for_edit(field: EditField) -> Self {
        match field {
            EditField::Amount => Self::LockedAmount,
            EditField::Percentage => Self::LockedPercentage,
        }
    }

    /// Whether the category is pinned during redistribution
    pub fn is_locked(&self) -> bool {
        !matches!(self, Self::Unlocked)
    }

    /// Short marker for table display
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Unlocked => " ",
            Self::LockedAmount => "$",
            Self::LockedPercentage => "%",
        }
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unlocked => "unlocked",
            Self::LockedAmount => "amount",
            Self::LockedPercentage => "percentage",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for LockMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unlocked" | "none" => Ok(Self::Unlocked),
            "amount" => Ok(Self::LockedAmount),
            "percentage" | "percent" => Ok(Self::LockedPercentage),
            other => Err(format!(
                "Unknown lock mode '{}' (expected: unlocked, amount, percentage)",
                other
            )),
        }
    }
}
