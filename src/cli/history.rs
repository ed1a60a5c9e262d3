//! Audit history CLI command
//!
//! Prints recent audit log entries in a human-readable form.

use crate::audit::AuditLogger;
use crate::error::TopsheetResult;

/// Show recent audit entries, optionally filtered to one sheet
pub fn handle_history_command(
    audit: &AuditLogger,
    limit: usize,
    sheet: Option<&str>,
) -> TopsheetResult<()> {
    let entries = match sheet {
        Some(name) => {
            let mut matching: Vec<_> = audit
                .read_all()?
                .into_iter()
                .filter(|e| e.sheet.eq_ignore_ascii_case(name))
                .collect();
            let start = matching.len().saturating_sub(limit);
            matching.split_off(start)
        }
        None => audit.read_recent(limit)?,
    };

    if entries.is_empty() {
        println!("No audit history yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
