//! Category command implementations

use anyhow::{bail, Result};
use tally_core::models::{Category, NewCategory};
use tally_core::{Database, Identity};

use super::truncate;

pub fn cmd_categories_list(db: &Database, identity: &Identity) -> Result<()> {
    let categories = db.list_categories(identity.user_id)?;

    if categories.is_empty() {
        println!("No categories yet. Add one with 'tally categories add <name>'.");
        return Ok(());
    }

    println!();
    println!("🗂️  Categories");
    println!("   ─────────────────────────────────────");
    for category in &categories {
        println!(
            "   {:>4} │ {:<24} │ {}",
            category.id,
            truncate(&category.name, 24),
            category.color
        );
    }

    Ok(())
}

pub fn cmd_categories_add(
    db: &Database,
    identity: &Identity,
    name: &str,
    color: Option<&str>,
) -> Result<Category> {
    let category = db.create_category(
        identity.user_id,
        &NewCategory {
            name: name.to_string(),
            color: color.map(str::to_string),
        },
    )?;
    db.record_audit(
        &identity.email,
        "create",
        Some("category"),
        Some(category.id),
        Some(&category.name),
    );

    println!(
        "✅ Created category '{}' (id: {}, color: {})",
        category.name, category.id, category.color
    );

    Ok(category)
}

pub fn cmd_categories_delete(db: &Database, identity: &Identity, id: i64) -> Result<()> {
    if !db.delete_category(identity.user_id, id)? {
        bail!("Category not found: {}", id);
    }
    db.record_audit(&identity.email, "delete", Some("category"), Some(id), None);

    println!("✅ Deleted category {} (its expenses are now uncategorized)", id);

    Ok(())
}
