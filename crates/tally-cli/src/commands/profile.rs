//! Profile commands

use anyhow::{bail, Result};
use tally_core::models::{Profile, ProfileUpdate};
use tally_core::{Database, Identity};

pub fn cmd_profile_show(db: &Database, identity: &Identity) -> Result<()> {
    let profile = db.get_profile(identity.user_id)?;

    println!();
    println!("👤 Profile");
    println!("   ─────────────────────────────");
    println!("   Name:  {}", profile.name);
    println!("   Email: {}", profile.email);

    Ok(())
}

/// Update name and/or email; fields not given keep their current value
pub fn cmd_profile_set(
    db: &Database,
    identity: &Identity,
    name: Option<&str>,
    email: Option<&str>,
) -> Result<Profile> {
    if name.is_none() && email.is_none() {
        bail!("Nothing to update. Pass --name and/or --email");
    }

    let current = db.get_profile(identity.user_id)?;
    let update = ProfileUpdate {
        name: name.map(str::to_string).unwrap_or(current.name),
        email: email.map(str::to_string).unwrap_or(current.email),
    };

    let profile = db.update_profile(identity.user_id, &update)?;
    db.record_audit(
        &identity.email,
        "update",
        Some("profile"),
        None,
        Some(&format!("name={}, email={}", profile.name, profile.email)),
    );

    println!("✅ Profile updated: {} <{}>", profile.name, profile.email);

    Ok(profile)
}
