//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the engine and storage layers.

pub mod edit;
pub mod export;
pub mod fee;
pub mod history;
pub mod import;
pub mod sheet;
pub mod snapshot;

pub use edit::{handle_edit_command, EditCommands};
pub use export::{handle_export_command, ExportFormat};
pub use fee::{handle_fee_command, FeeCommands};
pub use history::handle_history_command;
pub use import::handle_import_command;
pub use sheet::{handle_sheet_command, SheetCommands};
pub use snapshot::{handle_changes_command, handle_commit_command};
