//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_user` - Turn `--user`/`TALLY_USER` into an identity
//! - `cmd_init` - Initialize the database
//! - date, month, amount and category argument parsing

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tally_core::models::Category;
use tally_core::{AuthMethod, Database, Identity, Money, Session};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    debug!(path = %path_str, encrypted = !no_encrypt, "Opening database");
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    db.ensure_local_user()
        .context("Failed to create local user")?;
    println!("   Created tables and the local user");

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: tally users add --email you@example.com --name You");
    println!("  2. Record spending: tally --user you@example.com expenses add --amount 12.50");
    println!("  3. Start web UI: tally serve");

    Ok(())
}

/// Sign in as the user named on the command line
///
/// The CLI has direct database access, so this is a local sign-in: the
/// user only has to exist.
pub fn resolve_user(db: &Database, email: Option<&str>) -> Result<Identity> {
    let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) else {
        bail!("No user selected. Pass --user <email> or set TALLY_USER");
    };

    let user = db
        .get_user_by_email(email)?
        .with_context(|| format!("User not found: {}", email))?;

    debug!(user_id = %user.id, "Acting as {}", user.email);
    let mut session = Session::new();
    session.authenticate(Identity {
        user_id: user.id,
        email: user.email,
        method: AuthMethod::Local,
    })?;
    Ok(session.require()?.clone())
}

/// Parse a `YYYY-MM-DD` argument, defaulting to `today`
pub fn parse_date_arg(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match arg {
        None => Ok(today),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", s)),
    }
}

/// Parse a `YYYY-MM` (or full date) argument, defaulting to `today`'s month
pub fn parse_month_arg(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let date = match arg.map(str::trim) {
        None => today,
        Some(s) if s.len() == 7 => NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}' (expected YYYY-MM)", s))?,
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{}' (expected YYYY-MM)", s))?,
    };
    Ok(tally_core::reports::month_start(date))
}

pub fn parse_amount_arg(arg: &str) -> Result<Money> {
    Ok(Money::parse(arg)?)
}

/// Look up one of the user's categories by ID or (case-insensitive) name
pub fn resolve_category(db: &Database, identity: &Identity, arg: &str) -> Result<Category> {
    if let Ok(id) = arg.trim().parse::<i64>() {
        if let Some(category) = db.get_category(identity.user_id, id)? {
            return Ok(category);
        }
    }

    db.find_category_by_name(identity.user_id, arg.trim())?
        .with_context(|| format!("Category not found: {}", arg))
}
