//! JSON Export functionality
//!
//! Exports a complete sheet to JSON format with schema versioning.

use crate::error::{TopsheetError, TopsheetResult};
use crate::models::{FeeBase, FeeKind, Money, TopSheet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full sheet export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// The complete sheet
    pub sheet: TopSheet,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Total number of groups
    pub group_count: usize,

    /// Total number of categories
    pub category_count: usize,

    /// Total number of fee rules
    pub fee_count: usize,

    /// Grand total at export time
    pub grand_total: Money,
}

impl SheetExport {
    /// Create a new export from a sheet
    pub fn from_sheet(sheet: &TopSheet) -> Self {
        let metadata = ExportMetadata {
            group_count: sheet.groups.len(),
            category_count: sheet.categories().count(),
            fee_count: sheet.fees.len(),
            grand_total: sheet.grand_total(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            sheet: sheet.clone(),
            metadata,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        // Check schema version
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        // Check referential integrity
        let group_ids: std::collections::HashSet<_> =
            self.sheet.groups.iter().map(|g| g.id).collect();
        if group_ids.len() != self.sheet.groups.len() {
            return Err("duplicate group ids in export".to_string());
        }

        let mut category_ids = std::collections::HashSet::new();
        for group in &self.sheet.groups {
            for category in &group.categories {
                if !category_ids.insert(category.id) {
                    return Err(format!(
                        "duplicate category id {} in export",
                        category.id
                    ));
                }
            }
        }

        let fee_ids: std::collections::HashSet<_> =
            self.sheet.fees.iter().map(|f| f.id).collect();
        if fee_ids.len() != self.sheet.fees.len() {
            return Err("duplicate fee ids in export".to_string());
        }

        // Validate fee rules reference valid groups
        for fee in &self.sheet.fees {
            if let FeeKind::Percentage {
                base: FeeBase::Group(group_id),
                ..
            } = fee.kind
            {
                if !group_ids.contains(&group_id) {
                    return Err(format!(
                        "Fee '{}' references unknown group {}",
                        fee.name, group_id
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Export a sheet to JSON
pub fn export_sheet_json<W: Write>(
    sheet: &TopSheet,
    writer: &mut W,
    pretty: bool,
) -> TopsheetResult<()> {
    let export = SheetExport::from_sheet(sheet);

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TopsheetError::Export(e.to_string()))?;

    Ok(())
}

/// Import from a JSON export (for verification/restore)
pub fn import_from_json(json_str: &str) -> TopsheetResult<SheetExport> {
    let export: SheetExport =
        serde_json::from_str(json_str).map_err(|e| TopsheetError::Import(e.to_string()))?;

    // Validate the import
    export.validate().map_err(TopsheetError::Import)?;

    Ok(export)
}
