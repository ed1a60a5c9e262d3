//! Path management for topsheet
//!
//! Provides XDG-compliant path resolution for configuration and sheet data.
//!
//! ## Path Resolution Order
//!
//! 1. `TOPSHEET_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/topsheet` or `~/.config/topsheet`
//! 3. Windows: `%APPDATA%\topsheet`

use std::path::PathBuf;

use crate::error::TopsheetError;

/// Manages all paths used by topsheet
#[derive(Debug, Clone)]
pub struct TopsheetPaths {
    /// Base directory for all topsheet data
    base_dir: PathBuf,
}

impl TopsheetPaths {
    /// Create a new TopsheetPaths instance
    ///
    /// Path resolution:
    /// 1. `TOPSHEET_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/topsheet` or `~/.config/topsheet`
    /// 3. Windows: `%APPDATA%\topsheet`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TopsheetError> {
        let base_dir = if let Ok(custom) = std::env::var("TOPSHEET_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create TopsheetPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/topsheet/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/topsheet/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to sheets.json
    pub fn sheets_file(&self) -> PathBuf {
        self.data_dir().join("sheets.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), TopsheetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TopsheetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TopsheetError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if topsheet has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TopsheetError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("topsheet"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TopsheetError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TopsheetError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("topsheet"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TopsheetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TopsheetPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TopsheetPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
        assert_eq!(
            paths.sheets_file(),
            temp_dir.path().join("data").join("sheets.json")
        );
    }

    #[test]
    fn test_not_initialized_without_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TopsheetPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert!(!paths.is_initialized());
    }
}
