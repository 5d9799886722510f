//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use super::{open_db, resolve_user};

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    user: Option<&str>,
) -> Result<()> {
    println!("🚀 Starting Tally web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Parse allowed CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("TALLY_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let db = open_db(db_path, no_encrypt)?;

    let local_user = if no_auth {
        let identity = match user {
            Some(email) => resolve_user(&db, Some(email))?,
            None => db
                .ensure_local_user()
                .context("Failed to create local user")?,
        };
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
        println!("   👤 Acting as: {}", identity.email);
        Some(identity)
    } else {
        println!("   🔑 Authentication: bearer API tokens (tally users token <email>)");
        None
    };

    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (TALLY_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = tally_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        local_user,
    };

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("Static directory path must be valid UTF-8"))
        .transpose()?;
    tally_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
