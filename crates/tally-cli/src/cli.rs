//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Track expenses against monthly budgets
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Self-hosted personal expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "tally.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set TALLY_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// Email of the user to act as
    #[arg(short, long, global = true, env = "TALLY_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (every request acts as --user, or the local user)
        #[arg(long)]
        no_auth: bool,

        /// Directory of static files to serve (web UI)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage users and API tokens
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },

    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Record and list expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage monthly budgets
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Show spending summary
    Dashboard {
        /// Date to report as of (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Spending reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Export expenses to a file
    Export {
        /// Output file (defaults to expenses-<today>.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: csv, json
        #[arg(short, long, default_value = "csv")]
        format: String,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Create a user and print their first API token
    Add {
        /// Email address (used to sign in)
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,
    },

    /// Issue an additional API token for a user
    Token {
        /// Email address of the user
        email: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the profile (default)
    Show,

    /// Update name and/or email
    Set {
        /// New display name
        #[arg(short, long)]
        name: Option<String>,

        /// New email address
        #[arg(short, long)]
        email: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories (default)
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,

        /// Display color, e.g. "#10B981"
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a category (its expenses become uncategorized)
    Delete {
        /// Category ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first (default)
    List {
        /// Match against notes and category name
        #[arg(short, long)]
        search: Option<String>,

        /// Only this category (name or ID)
        #[arg(short, long)]
        category: Option<String>,

        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Record an expense
    Add {
        /// Amount, e.g. 12.50
        #[arg(short, long, allow_hyphen_values = true)]
        amount: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Category (name or ID)
        #[arg(short, long)]
        category: Option<String>,

        /// Payment method: cash, credit_card, debit_card, bank_transfer, digital_wallet, other
        #[arg(short, long, default_value = "cash")]
        method: String,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// Show budgets for a month (default: current month)
    List {
        /// Month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Set the limit for a category in a month
    Set {
        /// Category (name or ID)
        category: String,

        /// Monthly limit, e.g. 300
        limit: String,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Spending by category
    Categories,

    /// Six-month spending trend
    Monthly {
        /// Date to report as of (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        as_of: Option<String>,
    },
}
