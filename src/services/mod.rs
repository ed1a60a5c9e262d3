//! Service layer for topsheet
//!
//! The service layer provides the recalculation engine and sheet-level
//! operations on top of the models, handling validation, derived fields,
//! and change tracking.

pub mod builder;
pub mod edit;
pub mod import;
pub mod recalc;
pub mod snapshot;

pub use builder::{
    CategoryInput, FeeBaseInput, FeeInput, FeeKindInput, GroupInput, SheetInput,
};
pub use edit::{
    add_fee, lock_all, remove_fee, set_base, set_fee, set_lock_mode, unlock_all,
};
pub use import::{import_sheet_csv, import_sheet_csv_file, CsvImportResult};
pub use recalc::{recalculate, Advisory, CategoryDelta, EditValue, Recalculation};
pub use snapshot::{commit_snapshot, deltas};
