//! User settings for topsheet
//!
//! Manages user preferences for export formatting.

use serde::{Deserialize, Serialize};

use super::paths::TopsheetPaths;
use crate::error::TopsheetError;

/// User settings for topsheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Whether JSON exports are pretty-printed by default
    #[serde(default = "default_pretty_export")]
    pub pretty_export: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_pretty_export() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            pretty_export: default_pretty_export(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TopsheetPaths) -> Result<Self, TopsheetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TopsheetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TopsheetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet; let the caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TopsheetPaths) -> Result<(), TopsheetError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TopsheetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| TopsheetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
