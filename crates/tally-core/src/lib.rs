//! Tally Core Library
//!
//! Shared functionality for the Tally expense tracker:
//! - Database access, migrations and per-user row scoping
//! - Fixed-point money amounts
//! - Identity and session lifecycle
//! - Dashboard, budget, category and trend aggregation
//! - CSV and JSON expense export

pub mod db;
pub mod error;
pub mod export;
pub mod identity;
pub mod models;
pub mod money;
pub mod reports;

pub use db::{AuditEntry, Database};
pub use error::{Error, Result};
pub use export::{export_filename, ExpenseExport, ExportFormat};
pub use identity::{AuthMethod, Identity, Session, UserId};
pub use money::Money;
