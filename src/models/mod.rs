//! Core data models for topsheet
//!
//! This module contains the data structures that represent the top sheet
//! domain: money and percentage scalars, categories, groups, fee rules,
//! and the sheet itself.

pub mod category;
pub mod fee;
pub mod group;
pub mod ids;
pub mod lock;
pub mod money;
pub mod percent;
pub mod sheet;

pub use category::Category;
pub use fee::{FeeBase, FeeKind, FeeRule};
pub use group::Group;
pub use ids::{CategoryId, FeeId, GroupId};
pub use lock::{EditField, LockMode};
pub use money::Money;
pub use percent::Percent;
pub use sheet::{BaseConfig, TopSheet};
