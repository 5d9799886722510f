//! Tally CLI - Personal expense tracker
//!
//! Usage:
//!   tally init                                   Initialize database
//!   tally users add --email E --name N           Create a user (prints an API token)
//!   tally -u E expenses add --amount 12.50       Record an expense
//!   tally -u E budgets set Food 300              Set this month's budget
//!   tally serve --port 3000                      Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let today = Local::now().date_naive();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
                cli.user.as_deref(),
            )
            .await
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                UsersAction::Add { email, name } => {
                    commands::cmd_users_add(&db, &email, &name).map(|_| ())
                }
                UsersAction::Token { email } => commands::cmd_users_token(&db, &email).map(|_| ()),
            }
        }
        Commands::Audit { limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_audit(&db, limit).map(|_| ())
        }
        command => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let me = commands::resolve_user(&db, cli.user.as_deref())?;
            run_as_user(&db, &me, command, today)
        }
    }
}

/// Dispatch the commands that act on one user's data
fn run_as_user(
    db: &tally_core::Database,
    me: &tally_core::Identity,
    command: Commands,
    today: chrono::NaiveDate,
) -> Result<()> {
    match command {
        Commands::Profile { action } => match action {
            None | Some(ProfileAction::Show) => commands::cmd_profile_show(db, me),
            Some(ProfileAction::Set { name, email }) => {
                commands::cmd_profile_set(db, me, name.as_deref(), email.as_deref()).map(|_| ())
            }
        },
        Commands::Categories { action } => match action {
            None | Some(CategoriesAction::List) => commands::cmd_categories_list(db, me),
            Some(CategoriesAction::Add { name, color }) => {
                commands::cmd_categories_add(db, me, &name, color.as_deref()).map(|_| ())
            }
            Some(CategoriesAction::Delete { id }) => commands::cmd_categories_delete(db, me, id),
        },
        Commands::Expenses { action } => match action {
            None => commands::cmd_expenses_list(db, me, None, None, 20).map(|_| ()),
            Some(ExpensesAction::List {
                search,
                category,
                limit,
            }) => commands::cmd_expenses_list(db, me, search.as_deref(), category.as_deref(), limit)
                .map(|_| ()),
            Some(ExpensesAction::Add {
                amount,
                date,
                category,
                method,
                notes,
            }) => commands::cmd_expenses_add(
                db,
                me,
                &amount,
                date.as_deref(),
                category.as_deref(),
                &method,
                notes.as_deref(),
                today,
            )
            .map(|_| ()),
            Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(db, me, id),
        },
        Commands::Budgets { action } => match action {
            None => commands::cmd_budgets_list(db, me, None, today).map(|_| ()),
            Some(BudgetsAction::List { month }) => {
                commands::cmd_budgets_list(db, me, month.as_deref(), today).map(|_| ())
            }
            Some(BudgetsAction::Set {
                category,
                limit,
                month,
            }) => commands::cmd_budgets_set(db, me, &category, &limit, month.as_deref(), today)
                .map(|_| ()),
            Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(db, me, id),
        },
        Commands::Dashboard { as_of } => {
            let as_of = commands::parse_date_arg(as_of.as_deref(), today)?;
            commands::cmd_dashboard(db, me, as_of).map(|_| ())
        }
        Commands::Report { action } => match action {
            ReportAction::Categories => commands::cmd_report_categories(db, me).map(|_| ()),
            ReportAction::Monthly { as_of } => {
                let as_of = commands::parse_date_arg(as_of.as_deref(), today)?;
                commands::cmd_report_monthly(db, me, as_of).map(|_| ())
            }
        },
        Commands::Export { output, format } => {
            commands::cmd_export(db, me, output.as_deref(), &format, today).map(|_| ())
        }
        Commands::Init | Commands::Serve { .. } | Commands::Users { .. } | Commands::Audit { .. } => {
            anyhow::bail!("This command does not act as a user")
        }
    }
}
