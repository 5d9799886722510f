//! Database tests

use super::*;
use crate::identity::UserId;
use crate::models::*;
use crate::money::Money;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    fn user(db: &Database, email: &str) -> UserId {
        db.create_user(email, "Test User").unwrap().0.id
    }

    fn category(db: &Database, user_id: UserId, name: &str) -> Category {
        db.create_category(
            user_id,
            &NewCategory {
                name: name.to_string(),
                color: Some("#10B981".to_string()),
            },
        )
        .unwrap()
    }

    fn spend(
        db: &Database,
        user_id: UserId,
        category_id: Option<i64>,
        amount: &str,
        on: NaiveDate,
        notes: Option<&str>,
    ) -> ExpenseWithCategory {
        db.insert_expense(
            user_id,
            &NewExpense {
                category_id,
                amount: money(amount),
                date: on,
                payment_method: PaymentMethod::Cash,
                notes: notes.map(str::to_string),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        assert!(db.list_categories(alice).unwrap().is_empty());
        assert!(db
            .list_expenses(alice, &ExpenseFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_schema_stores_cents() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        spend(&db, alice, None, "12.34", date(2026, 10, 1), None);

        let conn = db.conn().unwrap();
        let cents: i64 = conn
            .query_row("SELECT amount FROM expenses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(cents, 1234);
    }

    #[test]
    fn test_create_user_and_authenticate() {
        let db = Database::in_memory().unwrap();
        let (user, token) = db.create_user("alice@example.com", "Alice").unwrap();

        let identity = db.authenticate_token(&token).unwrap().unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.email, "alice@example.com");
        assert_eq!(identity.method, crate::identity::AuthMethod::Token);

        let profile = db.get_profile(user.id).unwrap();
        assert_eq!(profile.name, "Alice");

        assert!(db.authenticate_token("tally_bogus").unwrap().is_none());
        assert!(db.authenticate_token("").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let db = Database::in_memory().unwrap();
        user(&db, "alice@example.com");
        assert!(matches!(
            db.create_user("ALICE@example.com", "Again"),
            Err(Error::InvalidData(_))
        ));
        assert!(db.create_user("not-an-email", "Bob").is_err());
    }

    #[test]
    fn test_revoked_token_rejected() {
        let db = Database::in_memory().unwrap();
        let (user, token) = db.create_user("alice@example.com", "Alice").unwrap();
        let second = db.issue_token(user.id).unwrap();
        assert_ne!(token, second);

        assert!(db.revoke_token(&token).unwrap());
        assert!(!db.revoke_token(&token).unwrap());
        assert!(db.authenticate_token(&token).unwrap().is_none());

        // Other tokens keep working
        assert!(db.authenticate_token(&second).unwrap().is_some());
    }

    #[test]
    fn test_ensure_local_user_is_idempotent() {
        let db = Database::in_memory().unwrap();
        let first = db.ensure_local_user().unwrap();
        let second = db.ensure_local_user().unwrap();
        assert_eq!(first.user_id, second.user_id);
        assert_eq!(first.email, LOCAL_USER_EMAIL);
    }

    #[test]
    fn test_update_profile() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");

        let updated = db
            .update_profile(
                alice,
                &ProfileUpdate {
                    name: "  Alice Liddell ".to_string(),
                    email: "alice@wonderland.example".to_string(),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Alice Liddell");
        assert_eq!(updated.email, "alice@wonderland.example");

        let bad = db.update_profile(
            alice,
            &ProfileUpdate {
                name: "".to_string(),
                email: "alice@example.com".to_string(),
            },
        );
        assert!(matches!(bad, Err(Error::InvalidData(_))));
        assert_eq!(db.get_profile(alice).unwrap().name, "Alice Liddell");
    }

    #[test]
    fn test_category_crud() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");

        let rent = category(&db, alice, "Rent");
        let food = db
            .create_category(
                alice,
                &NewCategory {
                    name: "Food".to_string(),
                    color: None,
                },
            )
            .unwrap();
        assert_eq!(food.color, DEFAULT_COLOR);

        let names: Vec<String> = db
            .list_categories(alice)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Food", "Rent"]);
        assert_eq!(db.count_categories(alice).unwrap(), 2);

        assert!(db.create_category(alice, &NewCategory { name: "Rent".into(), color: None }).is_err());
        // Names differing only in case are the same category
        assert!(matches!(
            db.create_category(alice, &NewCategory { name: "rENT".into(), color: None }),
            Err(Error::InvalidData(_))
        ));
        assert!(db.create_category(alice, &NewCategory { name: "  ".into(), color: None }).is_err());

        assert_eq!(
            db.find_category_by_name(alice, "rent").unwrap().map(|c| c.id),
            Some(rent.id)
        );
    }

    #[test]
    fn test_delete_category_uncategorizes_expenses() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let food = category(&db, alice, "Food");

        let exp = spend(&db, alice, Some(food.id), "20", date(2026, 10, 3), None);
        db.upsert_budget(alice, food.id, date(2026, 10, 1), money("100"))
            .unwrap();

        assert!(db.delete_category(alice, food.id).unwrap());
        assert!(!db.delete_category(alice, food.id).unwrap());

        let kept = db.get_expense(alice, exp.expense.id).unwrap().unwrap();
        assert_eq!(kept.expense.category_id, None);
        assert_eq!(kept.category_label(), UNCATEGORIZED);
        assert!(db.list_budgets(alice, date(2026, 10, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_insert_expense_validates() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");

        let negative = db.insert_expense(
            alice,
            &NewExpense {
                category_id: None,
                amount: money("-1"),
                date: date(2026, 10, 1),
                payment_method: PaymentMethod::Cash,
                notes: None,
            },
        );
        assert!(matches!(negative, Err(Error::InvalidData(_))));

        let unknown_category = db.insert_expense(
            alice,
            &NewExpense {
                category_id: Some(999),
                amount: money("1"),
                date: date(2026, 10, 1),
                payment_method: PaymentMethod::Cash,
                notes: None,
            },
        );
        assert!(matches!(unknown_category, Err(Error::InvalidData(_))));

        let too_large = db.insert_expense(
            alice,
            &NewExpense {
                category_id: None,
                amount: Money::from_cents(Money::MAX_AMOUNT.cents() + 1),
                date: date(2026, 10, 1),
                payment_method: PaymentMethod::Cash,
                notes: None,
            },
        );
        assert!(matches!(too_large, Err(Error::InvalidData(_))));
        spend(&db, alice, None, &Money::MAX_AMOUNT.to_string(), date(2026, 10, 1), None);

        let blank_notes = spend(&db, alice, None, "0", date(2026, 10, 1), Some("   "));
        assert_eq!(blank_notes.expense.notes, None);
    }

    #[test]
    fn test_list_expenses_order_and_filters() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let food = category(&db, alice, "Groceries");
        let fun = category(&db, alice, "Fun");

        spend(&db, alice, Some(food.id), "10", date(2026, 9, 30), Some("Market"));
        spend(&db, alice, Some(fun.id), "25", date(2026, 10, 2), Some("Cinema"));
        spend(&db, alice, None, "5", date(2026, 10, 2), Some("parking meter"));

        let all = db.list_expenses(alice, &ExpenseFilter::default()).unwrap();
        let amounts: Vec<Money> = all.iter().map(|e| e.expense.amount).collect();
        // Date DESC, then newest insert first
        assert_eq!(amounts, vec![money("5"), money("25"), money("10")]);

        let october = db
            .list_expenses(
                alice,
                &ExpenseFilter {
                    from: Some(date(2026, 10, 1)),
                    until: Some(date(2026, 11, 1)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(october.len(), 2);

        let by_category = db
            .list_expenses(
                alice,
                &ExpenseFilter {
                    category_id: Some(food.id),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].category_name.as_deref(), Some("Groceries"));

        // Search matches notes or category name, case-insensitively
        let search = |term: &str| {
            db.list_expenses(
                alice,
                &ExpenseFilter {
                    search: Some(term.to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .len()
        };
        assert_eq!(search("CINEMA"), 1);
        assert_eq!(search("grocer"), 1);
        assert_eq!(search("PARKING"), 1);
        assert_eq!(search("nothing"), 0);

        let limited = db
            .list_expenses(
                alice,
                &ExpenseFilter {
                    limit: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_search_is_literal_substring_match() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let cafe = category(&db, alice, "CAFÉ");

        spend(&db, alice, None, "4", date(2026, 10, 1), Some("coffee"));
        spend(&db, alice, None, "6", date(2026, 10, 2), Some("tip 10%"));
        spend(&db, alice, Some(cafe.id), "3", date(2026, 10, 3), Some("snack_bar"));

        let search = |term: &str, limit: Option<i64>| {
            db.list_expenses(
                alice,
                &ExpenseFilter {
                    search: Some(term.to_string()),
                    limit,
                    ..Default::default()
                },
            )
            .unwrap()
        };

        // Wildcard characters match only themselves
        let percent = search("%", None);
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].expense.notes.as_deref(), Some("tip 10%"));
        assert_eq!(search("_", None).len(), 1);
        assert_eq!(search("c_ffee", None).len(), 0);

        // Case folding covers non-ASCII letters
        assert_eq!(search("café", None).len(), 1);
        assert_eq!(search("É", None).len(), 1);

        // Limit applies after matching
        let limited = search("f", Some(1));
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].expense.notes.as_deref(), Some("snack_bar"));
    }

    #[test]
    fn test_budget_upsert_twice_keeps_one_row() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let food = category(&db, alice, "Food");

        let first = db
            .upsert_budget(alice, food.id, date(2026, 10, 1), money("100"))
            .unwrap();
        // Any day of the month addresses the same budget
        let second = db
            .upsert_budget(alice, food.id, date(2026, 10, 20), money("150"))
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.month, date(2026, 10, 1));
        assert_eq!(second.limit_amount, money("150"));

        let budgets = db.list_budgets(alice, date(2026, 10, 1)).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].budget.limit_amount, money("150"));
        assert_eq!(budgets[0].category_name, "Food");

        assert!(db.list_budgets(alice, date(2026, 11, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_budget_validation() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let food = category(&db, alice, "Food");

        assert!(matches!(
            db.upsert_budget(alice, food.id, date(2026, 10, 1), money("-5")),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.upsert_budget(alice, 999, date(2026, 10, 1), money("5")),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            db.upsert_budget(
                alice,
                food.id,
                date(2026, 10, 1),
                Money::from_cents(Money::MAX_AMOUNT.cents() + 1)
            ),
            Err(Error::InvalidData(_))
        ));
        assert!(db
            .upsert_budget(alice, food.id, date(2026, 10, 1), Money::zero())
            .is_ok());
    }

    #[test]
    fn test_budget_report_uses_month_window() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let food = category(&db, alice, "Food");

        db.upsert_budget(alice, food.id, date(2026, 10, 1), money("100"))
            .unwrap();
        spend(&db, alice, Some(food.id), "70", date(2026, 10, 1), None);
        spend(&db, alice, Some(food.id), "50", date(2026, 10, 31), None);
        spend(&db, alice, Some(food.id), "999", date(2026, 9, 30), None);
        spend(&db, alice, Some(food.id), "999", date(2026, 11, 1), None);

        let report = db.budget_report(alice, date(2026, 10, 15)).unwrap();
        assert_eq!(report.month, date(2026, 10, 1));
        assert_eq!(report.budgets.len(), 1);

        let status = &report.budgets[0];
        assert_eq!(status.spent, money("120"));
        assert_eq!(status.percentage, Some(120.0));
        assert!(status.is_over_budget);
        assert_eq!(status.remaining, money("-20"));
    }

    #[test]
    fn test_dashboard_and_reports() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let food = category(&db, alice, "Food");
        category(&db, alice, "Unused");

        spend(&db, alice, Some(food.id), "30", date(2026, 10, 1), None);
        spend(&db, alice, None, "70", date(2026, 8, 15), None);

        let stats = db.dashboard(alice, date(2026, 10, 1)).unwrap();
        assert_eq!(stats.total, money("100"));
        assert_eq!(stats.monthly, money("30"));
        assert_eq!(stats.avg_daily, money("30"));
        assert_eq!(stats.category_count, 2);

        let categories = db.category_report(alice).unwrap();
        assert_eq!(categories.categories[0].name, UNCATEGORIZED);
        assert_eq!(categories.categories[0].percentage, 70.0);

        let trend = db.monthly_trend(alice, date(2026, 10, 16)).unwrap();
        assert_eq!(trend.months.len(), 6);
        assert_eq!(trend.months[3].label, "Aug 2026");
        assert_eq!(trend.months[3].amount, money("70"));
        assert_eq!(trend.months[5].amount, money("30"));

        let export = db.export_expenses(alice, crate::export::ExportFormat::Csv).unwrap();
        assert_eq!(export.count, 2);
        let lines: Vec<&str> = export.body.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2026-10-01,Food,30.00,cash,");
    }

    #[test]
    fn test_cross_user_isolation() {
        let db = Database::in_memory().unwrap();
        let alice = user(&db, "alice@example.com");
        let bob = user(&db, "bob@example.com");

        let food = category(&db, alice, "Food");
        let exp = spend(&db, alice, Some(food.id), "42", date(2026, 10, 1), None);
        let budget = db
            .upsert_budget(alice, food.id, date(2026, 10, 1), money("100"))
            .unwrap();

        // Bob sees nothing of Alice's
        assert!(db.list_categories(bob).unwrap().is_empty());
        assert!(db
            .list_expenses(bob, &ExpenseFilter::default())
            .unwrap()
            .is_empty());
        assert!(db.list_budgets(bob, date(2026, 10, 1)).unwrap().is_empty());
        assert!(db.get_expense(bob, exp.expense.id).unwrap().is_none());
        assert_eq!(db.dashboard(bob, date(2026, 10, 1)).unwrap().total, Money::zero());

        // ...cannot use her category...
        assert!(db
            .upsert_budget(bob, food.id, date(2026, 10, 1), money("1"))
            .is_err());
        assert!(db
            .insert_expense(
                bob,
                &NewExpense {
                    category_id: Some(food.id),
                    amount: money("1"),
                    date: date(2026, 10, 1),
                    payment_method: PaymentMethod::Cash,
                    notes: None,
                },
            )
            .is_err());

        // ...and cannot delete her rows
        assert!(!db.delete_expense(bob, exp.expense.id).unwrap());
        assert!(!db.delete_budget(bob, budget.id).unwrap());
        assert!(!db.delete_category(bob, food.id).unwrap());

        assert_eq!(
            db.list_expenses(alice, &ExpenseFilter::default())
                .unwrap()
                .len(),
            1
        );
        assert_eq!(db.list_budgets(alice, date(2026, 10, 1)).unwrap().len(), 1);
        assert!(db.get_category(alice, food.id).unwrap().is_some());

        assert!(db.delete_expense(alice, exp.expense.id).unwrap());
        assert!(db.delete_budget(alice, budget.id).unwrap());
    }

    #[test]
    fn test_audit_log() {
        let db = Database::in_memory().unwrap();

        db.log_audit("alice@example.com", "create", Some("expense"), Some(7), None)
            .unwrap();
        db.log_audit("alice@example.com", "list", Some("expenses"), None, Some("search=x"))
            .unwrap();

        let entries = db.list_audit_log(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "list");
        assert_eq!(entries[0].details.as_deref(), Some("search=x"));
        assert_eq!(entries[1].entity_id, Some(7));
    }

    #[test]
    fn test_record_audit_swallows_write_failure() {
        let db = Database::in_memory().unwrap();
        db.record_audit("alice@example.com", "create", Some("expense"), Some(1), None);
        assert_eq!(db.list_audit_log(10).unwrap().len(), 1);

        db.conn()
            .unwrap()
            .execute("DROP TABLE audit_log", [])
            .unwrap();
        db.record_audit("alice@example.com", "delete", Some("expense"), Some(1), None);
        assert!(db.log_audit("alice@example.com", "delete", None, None, None).is_err());
    }
}
