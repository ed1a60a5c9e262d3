//! Snapshot CLI commands
//!
//! Implements the commit and changes commands for the change-tracking
//! baseline.

use crate::audit::{AuditEntry, AuditLogger};
use crate::display::format_change_report;
use crate::error::TopsheetResult;
use crate::services::{commit_snapshot, deltas};
use crate::storage::Storage;

/// Commit the current amounts as the new change baseline
pub fn handle_commit_command(
    storage: &Storage,
    audit: &AuditLogger,
    sheet: &str,
) -> TopsheetResult<()> {
    let sheet = storage.sheets.get_required(sheet)?;

    let changed = deltas(&sheet).iter().filter(|d| !d.delta.is_zero()).count();
    let committed = commit_snapshot(&sheet);

    audit.log(&AuditEntry::commit(
        &committed.name,
        Some(format!("{} lines changed", changed)),
    ))?;
    storage.sheets.upsert(committed.clone())?;
    storage.save_all()?;

    println!("Committed '{}' ({} lines changed).", committed.name, changed);
    Ok(())
}

/// Show the change map against the last committed snapshot
pub fn handle_changes_command(storage: &Storage, sheet: &str) -> TopsheetResult<()> {
    let sheet = storage.sheets.get_required(sheet)?;
    print!("{}", format_change_report(&deltas(&sheet)));
    Ok(())
}
