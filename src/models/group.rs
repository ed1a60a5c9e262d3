//! Group model
//!
//! Groups partition a top sheet into ordered sections (departments, phases).
//! A group's subtotal is always the literal sum of its categories; it is
//! never stored.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::Category;
use super::ids::{CategoryId, GroupId};
use super::money::Money;

/// An ordered section of categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Group name
    pub name: String,

    /// Categories in display order
    pub categories: Vec<Category>,
}

impl Group {
    /// Create a new empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            categories: Vec::new(),
        }
    }

    /// Sum of the category amounts
    pub fn subtotal(&self) -> Money {
        self.categories.iter().map(|c| c.amount).sum()
    }

    /// Find a category by id
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Find a category by id, mutably
    pub fn category_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.categories.iter_mut().find(|c| c.id == id)
    }

    /// Whether any category in this group is unlocked
    pub fn has_unlocked(&self) -> bool {
        self.categories.iter().any(|c| !c.lock_mode.is_locked())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LockMode;

    #[test]
    fn test_new_group() {
        let group = Group::new("Above the Line");
        assert_eq!(group.name, "Above the Line");
        assert!(group.categories.is_empty());
        assert!(group.subtotal().is_zero());
    }

    #[test]
    fn test_subtotal_is_literal_sum() {
        let mut group = Group::new("Production");
        let mut a = Category::new("Camera");
        a.amount = Money::from_cents(100_000);
        let mut b = Category::new("Grip");
        b.amount = Money::from_cents(50_000);
        group.categories.push(a);
        group.categories.push(b);

        assert_eq!(group.subtotal(), Money::from_cents(150_000));
    }

    #[test]
    fn test_category_lookup() {
        let mut group = Group::new("Post");
        let cat = Category::new("Editing");
        let id = cat.id;
        group.categories.push(cat);

        assert!(group.category(id).is_some());
        assert!(group.category(CategoryId::new()).is_none());
    }

    #[test]
    fn test_has_unlocked() {
        let mut group = Group::new("Post");
        let mut cat = Category::new("Editing");
        cat.lock_mode = LockMode::LockedAmount;
        group.categories.push(cat);
        assert!(!group.has_unlocked());

        group.categories.push(Category::new("Sound"));
        assert!(group.has_unlocked());
    }
}
