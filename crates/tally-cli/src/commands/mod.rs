//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, resolve_user, argument parsing)
//! - `serve` - Web server command
//! - `users` - User creation and API tokens
//! - `profile` - Profile show/update
//! - `categories` - Category management
//! - `expenses` - Expense commands (list, add, delete)
//! - `budgets` - Monthly budget commands
//! - `reports` - Dashboard and spending reports
//! - `export` - Expense export to CSV/JSON
//! - `audit` - Audit log viewer

pub mod audit;
pub mod budgets;
pub mod categories;
pub mod core;
pub mod expenses;
pub mod export;
pub mod profile;
pub mod reports;
pub mod serve;
pub mod users;

// Re-export command functions for main.rs
pub use audit::*;
pub use budgets::*;
pub use categories::*;
pub use core::*;
pub use expenses::*;
pub use export::*;
pub use profile::*;
pub use reports::*;
pub use serve::*;
pub use users::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
