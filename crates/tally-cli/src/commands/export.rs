//! Expense export command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::{export_filename, Database, ExportFormat, Identity};

/// Write all of the user's expenses to `output` (or `expenses-<today>.<ext>`)
pub fn cmd_export(
    db: &Database,
    identity: &Identity,
    output: Option<&Path>,
    format: &str,
    today: NaiveDate,
) -> Result<PathBuf> {
    let format: ExportFormat = format.parse()?;
    let export = db.export_expenses(identity.user_id, format)?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(export_filename(today, format)));
    std::fs::write(&path, &export.body)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    db.record_audit(
        &identity.email,
        "export",
        Some("expense"),
        None,
        Some(&format!("format={}, count={}", format.extension(), export.count)),
    );

    println!("✅ Exported {} expenses to {}", export.count, path.display());

    Ok(path)
}
