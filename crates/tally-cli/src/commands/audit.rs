//! Audit log command

use anyhow::Result;
use tally_core::{AuditEntry, Database};

use super::truncate;

pub fn cmd_audit(db: &Database, limit: i64) -> Result<Vec<AuditEntry>> {
    let entries = db.list_audit_log(limit.max(1))?;

    if entries.is_empty() {
        println!("Audit log is empty.");
        return Ok(entries);
    }

    println!();
    println!("🧾 Audit Log");
    println!("   ─────────────────────────────────────────────────────────────");
    for entry in &entries {
        let entity = match (&entry.entity_type, entry.entity_id) {
            (Some(kind), Some(id)) => format!("{} #{}", kind, id),
            (Some(kind), None) => kind.clone(),
            _ => String::new(),
        };
        println!(
            "   {} │ {:<24} │ {:<12} │ {:<16} │ {}",
            entry.timestamp,
            truncate(&entry.user_email, 24),
            entry.action,
            entity,
            truncate(entry.details.as_deref().unwrap_or(""), 40)
        );
    }

    Ok(entries)
}
