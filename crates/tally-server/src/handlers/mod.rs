//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area. Every handler
//! receives the caller's [`tally_core::Identity`] from the auth middleware
//! and passes its `user_id` to the database layer.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod dashboard;
pub mod expenses;
pub mod export;
pub mod profile;
pub mod reports;

// Re-export all handlers for use in router
pub use auth::*;
pub use budgets::*;
pub use categories::*;
pub use dashboard::*;
pub use expenses::*;
pub use export::*;
pub use profile::*;
pub use reports::*;
