//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use chrono::NaiveDate;
use tally_core::db::Database;
use tally_core::models::ExpenseFilter;
use tally_core::{AuthMethod, Identity, Money};

use crate::commands::{self, truncate};

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

/// Create a user and sign in as them
fn setup_user(db: &Database, email: &str) -> Identity {
    commands::cmd_users_add(db, email, "Test User").unwrap();
    commands::resolve_user(db, Some(email)).unwrap()
}

// ========== Init Command Tests ==========

#[test]
fn test_cmd_init_creates_local_user() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tally.db");

    assert!(commands::cmd_init(&path, true).is_ok());
    assert!(path.exists());

    let db = commands::open_db(&path, true).unwrap();
    let local = commands::resolve_user(&db, Some(tally_core::db::LOCAL_USER_EMAIL)).unwrap();
    assert_eq!(local.email, tally_core::db::LOCAL_USER_EMAIL);

    // Running init again is harmless
    assert!(commands::cmd_init(&path, true).is_ok());
}

// ========== User Command Tests ==========

#[test]
fn test_cmd_users_add_returns_working_token() {
    let db = setup_test_db();
    let token = commands::cmd_users_add(&db, "sam@example.com", "Sam").unwrap();

    assert!(token.starts_with("tally_"));
    let identity = db.authenticate_token(&token).unwrap().unwrap();
    assert_eq!(identity.email, "sam@example.com");
}

#[test]
fn test_cmd_users_add_duplicate_fails() {
    let db = setup_test_db();
    commands::cmd_users_add(&db, "sam@example.com", "Sam").unwrap();
    assert!(commands::cmd_users_add(&db, "sam@example.com", "Sam again").is_err());
}

#[test]
fn test_cmd_users_token_issues_additional_token() {
    let db = setup_test_db();
    let first = commands::cmd_users_add(&db, "sam@example.com", "Sam").unwrap();
    let second = commands::cmd_users_token(&db, "sam@example.com").unwrap();

    assert_ne!(first, second);
    assert!(db.authenticate_token(&first).unwrap().is_some());
    assert!(db.authenticate_token(&second).unwrap().is_some());

    assert!(commands::cmd_users_token(&db, "nobody@example.com").is_err());
}

#[test]
fn test_resolve_user() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    assert_eq!(me.method, AuthMethod::Local);

    // Email lookup ignores case
    let again = commands::resolve_user(&db, Some("SAM@example.com")).unwrap();
    assert_eq!(again.user_id, me.user_id);

    assert!(commands::resolve_user(&db, None).is_err());
    assert!(commands::resolve_user(&db, Some("  ")).is_err());
    assert!(commands::resolve_user(&db, Some("nobody@example.com")).is_err());
}

// ========== Profile Command Tests ==========

#[test]
fn test_cmd_profile_show_and_set() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");

    assert!(commands::cmd_profile_show(&db, &me).is_ok());

    let profile = commands::cmd_profile_set(&db, &me, Some("Samantha"), None).unwrap();
    assert_eq!(profile.name, "Samantha");
    assert_eq!(profile.email, "sam@example.com");

    assert!(commands::cmd_profile_set(&db, &me, None, None).is_err());
    assert!(commands::cmd_profile_set(&db, &me, None, Some("not-an-email")).is_err());
}

// ========== Category Command Tests ==========

#[test]
fn test_cmd_categories_lifecycle() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");

    assert!(commands::cmd_categories_list(&db, &me).is_ok());

    let food = commands::cmd_categories_add(&db, &me, "Food", Some("#F59E0B")).unwrap();
    assert_eq!(food.color, "#F59E0B");
    assert!(commands::cmd_categories_add(&db, &me, "Food", None).is_err());
    assert!(commands::cmd_categories_list(&db, &me).is_ok());

    assert!(commands::cmd_categories_delete(&db, &me, food.id).is_ok());
    assert!(commands::cmd_categories_delete(&db, &me, food.id).is_err());
    assert!(db.list_categories(me.user_id).unwrap().is_empty());
}

#[test]
fn test_resolve_category_by_name_or_id() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    let food = commands::cmd_categories_add(&db, &me, "Food", None).unwrap();

    assert_eq!(commands::resolve_category(&db, &me, "food").unwrap().id, food.id);
    assert_eq!(
        commands::resolve_category(&db, &me, &food.id.to_string())
            .unwrap()
            .id,
        food.id
    );
    assert!(commands::resolve_category(&db, &me, "Travel").is_err());
}

// ========== Expense Command Tests ==========

#[test]
fn test_cmd_expenses_add_and_list() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    commands::cmd_categories_add(&db, &me, "Food", None).unwrap();

    let lunch = commands::cmd_expenses_add(
        &db,
        &me,
        "12.50",
        Some("2026-10-02"),
        Some("Food"),
        "credit-card",
        Some("Lunch"),
        today(),
    )
    .unwrap();
    assert_eq!(lunch.expense.amount, Money::from_cents(1250));
    assert_eq!(lunch.category_name.as_deref(), Some("Food"));

    // Date defaults to today, category is optional
    let bus = commands::cmd_expenses_add(&db, &me, "3", None, None, "cash", None, today()).unwrap();
    assert_eq!(bus.expense.date, today());
    assert_eq!(bus.category_label(), "Uncategorized");

    let all = commands::cmd_expenses_list(&db, &me, None, None, 20).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].expense.id, bus.expense.id);

    let food = commands::cmd_expenses_list(&db, &me, None, Some("Food"), 20).unwrap();
    assert_eq!(food.len(), 1);

    let searched = commands::cmd_expenses_list(&db, &me, Some("lunch"), None, 20).unwrap();
    assert_eq!(searched.len(), 1);

    let limited = commands::cmd_expenses_list(&db, &me, None, None, 1).unwrap();
    assert_eq!(limited.len(), 1);
}

#[test]
fn test_cmd_expenses_add_rejects_bad_input() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");

    let add = |amount: &str, date: Option<&str>, category: Option<&str>, method: &str| {
        commands::cmd_expenses_add(&db, &me, amount, date, category, method, None, today())
    };

    assert!(add("-5", None, None, "cash").is_err());
    assert!(add("abc", None, None, "cash").is_err());
    assert!(add("5", Some("2026-13-01"), None, "cash").is_err());
    assert!(add("5", None, Some("Nope"), "cash").is_err());
    assert!(add("5", None, None, "barter").is_err());

    assert!(db
        .list_expenses(me.user_id, &ExpenseFilter::default())
        .unwrap()
        .is_empty());
}

#[test]
fn test_cmd_expenses_delete() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    let exp = commands::cmd_expenses_add(&db, &me, "9", None, None, "cash", None, today()).unwrap();

    assert!(commands::cmd_expenses_delete(&db, &me, exp.expense.id).is_ok());
    assert!(commands::cmd_expenses_delete(&db, &me, exp.expense.id).is_err());
}

// ========== Budget Command Tests ==========

#[test]
fn test_cmd_budgets_set_and_list() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    commands::cmd_categories_add(&db, &me, "Food", None).unwrap();
    commands::cmd_expenses_add(&db, &me, "150", Some("2026-10-03"), Some("Food"), "cash", None, today())
        .unwrap();

    let budget = commands::cmd_budgets_set(&db, &me, "Food", "100", None, today()).unwrap();
    assert_eq!(budget.month, NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());

    // Setting again replaces the limit rather than adding a row
    let again = commands::cmd_budgets_set(&db, &me, "Food", "200", Some("2026-10"), today()).unwrap();
    assert_eq!(again.id, budget.id);
    assert_eq!(again.limit_amount, Money::from_cents(20000));

    let report = commands::cmd_budgets_list(&db, &me, None, today()).unwrap();
    assert_eq!(report.budgets.len(), 1);
    assert_eq!(report.budgets[0].spent, Money::from_cents(15000));
    assert_eq!(report.budgets[0].percentage, Some(75.0));

    let other_month = commands::cmd_budgets_list(&db, &me, Some("2026-09"), today()).unwrap();
    assert!(other_month.budgets.is_empty());

    assert!(commands::cmd_budgets_list(&db, &me, Some("September"), today()).is_err());
}

#[test]
fn test_cmd_budgets_delete() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    commands::cmd_categories_add(&db, &me, "Food", None).unwrap();
    let budget = commands::cmd_budgets_set(&db, &me, "Food", "100", None, today()).unwrap();

    assert!(commands::cmd_budgets_delete(&db, &me, budget.id).is_ok());
    assert!(commands::cmd_budgets_delete(&db, &me, budget.id).is_err());
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_dashboard_and_reports() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    commands::cmd_categories_add(&db, &me, "Food", None).unwrap();
    commands::cmd_expenses_add(&db, &me, "30", Some("2026-10-01"), Some("Food"), "cash", None, today())
        .unwrap();
    commands::cmd_expenses_add(&db, &me, "10", Some("2026-08-20"), None, "cash", None, today()).unwrap();

    let stats = commands::cmd_dashboard(&db, &me, today()).unwrap();
    assert_eq!(stats.total, Money::from_cents(4000));
    assert_eq!(stats.monthly, Money::from_cents(3000));
    assert_eq!(stats.category_count, 1);

    let categories = commands::cmd_report_categories(&db, &me).unwrap();
    assert_eq!(categories.categories.len(), 2);
    assert_eq!(categories.categories[0].name, "Food");
    assert_eq!(categories.categories[0].percentage, 75.0);

    let trend = commands::cmd_report_monthly(&db, &me, today()).unwrap();
    assert_eq!(trend.months.len(), 6);
    assert_eq!(trend.months[5].label, "Oct 2026");
    assert_eq!(trend.months[3].amount, Money::from_cents(1000));
}

#[test]
fn test_cmd_reports_empty() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");

    let stats = commands::cmd_dashboard(&db, &me, today()).unwrap();
    assert!(stats.total.is_zero());
    assert!(commands::cmd_report_categories(&db, &me).unwrap().categories.is_empty());
    assert!(commands::cmd_report_monthly(&db, &me, today())
        .unwrap()
        .months
        .iter()
        .all(|m| m.amount.is_zero()));
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_export_csv() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    commands::cmd_expenses_add(
        &db,
        &me,
        "4.25",
        Some("2026-10-05"),
        None,
        "cash",
        Some("coffee, large"),
        today(),
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let path = commands::cmd_export(&db, &me, Some(&output), "csv", today()).unwrap();
    assert_eq!(path, output);

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "Date,Category,Amount,Payment Method,Notes\n2026-10-05,Uncategorized,4.25,cash,\"coffee, large\"\n"
    );
}

#[test]
fn test_cmd_export_json() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    commands::cmd_expenses_add(&db, &me, "4.25", None, None, "cash", None, today()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    commands::cmd_export(&db, &me, Some(&output), "json", today()).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["amount"], 4.25);

    assert!(commands::cmd_export(&db, &me, Some(&output), "xml", today()).is_err());
}

// ========== Audit Command Tests ==========

#[test]
fn test_cmd_audit_lists_recent_actions() {
    let db = setup_test_db();
    let me = setup_user(&db, "sam@example.com");
    commands::cmd_categories_add(&db, &me, "Food", None).unwrap();

    let entries = commands::cmd_audit(&db, 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "create");
    assert_eq!(entries[0].entity_type.as_deref(), Some("category"));
    assert_eq!(entries[1].entity_type.as_deref(), Some("user"));

    assert_eq!(commands::cmd_audit(&db, 1).unwrap().len(), 1);
}

// ========== Parsing Helpers ==========

#[test]
fn test_parse_month_arg() {
    let first = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(commands::parse_month_arg(Some("2026-03"), today()).unwrap(), first);
    assert_eq!(commands::parse_month_arg(Some("2026-03-19"), today()).unwrap(), first);
    assert_eq!(
        commands::parse_month_arg(None, today()).unwrap(),
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    );
    assert!(commands::parse_month_arg(Some("2026-3"), today()).is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is a long string", 10), "this is...");
    assert_eq!(truncate("café au lait", 6), "caf...");
}
