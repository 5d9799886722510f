//! User and API token commands

use anyhow::{Context, Result};
use tally_core::Database;

/// Create a user and return their first API token
pub fn cmd_users_add(db: &Database, email: &str, name: &str) -> Result<String> {
    let (user, token) = db.create_user(email, name)?;
    db.record_audit(&user.email, "create", Some("user"), Some(user.id.0), None);

    println!("✅ Created user {} (id: {})", user.email, user.id);
    println!();
    println!("   API token: {}", token);
    println!("   Store it now - it cannot be shown again.");

    Ok(token)
}

/// Issue another API token for an existing user
pub fn cmd_users_token(db: &Database, email: &str) -> Result<String> {
    let user = db
        .get_user_by_email(email)?
        .with_context(|| format!("User not found: {}", email))?;

    let token = db.issue_token(user.id)?;
    db.record_audit(&user.email, "issue_token", Some("user"), Some(user.id.0), None);

    println!("🔑 New API token for {}:", user.email);
    println!("   {}", token);

    Ok(token)
}
