//! Custom error types for topsheet
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for topsheet operations
#[derive(Error, Debug)]
pub enum TopsheetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// An edit or input value the engine refuses to accept
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A sheet (or sheet input) that violates structural invariants
    #[error("Malformed sheet: {0}")]
    MalformedSheet(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TopsheetError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for fee rules
    pub fn fee_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Fee",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for stored sheets
    pub fn sheet_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Sheet",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid-value error
    pub fn is_invalid_value(&self) -> bool {
        matches!(self, Self::InvalidValue(_))
    }

    /// Check if this is a malformed-sheet error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedSheet(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for TopsheetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TopsheetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for topsheet operations
pub type TopsheetResult<T> = Result<T, TopsheetError>;
