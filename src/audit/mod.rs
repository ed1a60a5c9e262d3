//! Audit logging system for topsheet
//!
//! Records sheet operations with before/after values in an append-only
//! audit log.
//!
//! # Architecture
//!
//! The audit system consists of two components:
//!
//! - `AuditEntry`: Represents a single audit log entry with timestamp,
//!   operation, entity information, and optional before/after values.
//! - `AuditLogger`: Handles writing entries to the audit log file using a
//!   line-delimited JSON format (JSONL).
//!
//! # Example
//!
//! ```rust,ignore
//! use topsheet::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(audit_log_path);
//!
//! // Log a category edit
//! let entry = AuditEntry::update(
//!     EntityType::Category,
//!     "Pilot",
//!     "Director",
//!     &before,
//!     &after,
//!     Some("amount: $2000.00 -> $3000.00".to_string()),
//! );
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
