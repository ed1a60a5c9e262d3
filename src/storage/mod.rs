//! Storage layer for topsheet
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod file_io;
pub mod store;

pub use file_io::{read_json, write_json_atomic};
pub use store::SheetStore;

use crate::config::paths::TopsheetPaths;
use crate::error::TopsheetError;

/// Main storage coordinator
pub struct Storage {
    paths: TopsheetPaths,
    pub sheets: SheetStore,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TopsheetPaths) -> Result<Self, TopsheetError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            sheets: SheetStore::new(paths.sheets_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TopsheetPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TopsheetError> {
        self.sheets.load()
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TopsheetError> {
        self.sheets.save()
    }
}
