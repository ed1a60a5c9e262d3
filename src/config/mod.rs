//! Configuration module for topsheet
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::TopsheetPaths;
pub use settings::Settings;
