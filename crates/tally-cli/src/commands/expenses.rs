//! Expense commands (list, add, delete)

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tally_core::models::{ExpenseFilter, ExpenseWithCategory, NewExpense, PaymentMethod};
use tally_core::{Database, Identity};

use super::{parse_amount_arg, parse_date_arg, resolve_category, truncate};

pub fn cmd_expenses_list(
    db: &Database,
    identity: &Identity,
    search: Option<&str>,
    category: Option<&str>,
    limit: i64,
) -> Result<Vec<ExpenseWithCategory>> {
    let category_id = category
        .map(|c| resolve_category(db, identity, c))
        .transpose()?
        .map(|c| c.id);

    let filter = ExpenseFilter {
        search: search.map(str::to_string),
        category_id,
        limit: Some(limit.max(1)),
        ..Default::default()
    };
    let expenses = db.list_expenses(identity.user_id, &filter)?;

    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(expenses);
    }

    println!();
    println!("📝 Recent Expenses");
    println!("   ─────────────────────────────────────────────────────────────────────");
    for exp in &expenses {
        let e = &exp.expense;
        println!(
            "   {:>5} │ {} │ {:>10} │ {:<16} │ {:<14} │ {}",
            e.id,
            e.date,
            format!("${}", e.amount),
            truncate(exp.category_label(), 16),
            e.payment_method,
            truncate(e.notes.as_deref().unwrap_or(""), 30)
        );
    }

    Ok(expenses)
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_expenses_add(
    db: &Database,
    identity: &Identity,
    amount: &str,
    date: Option<&str>,
    category: Option<&str>,
    method: &str,
    notes: Option<&str>,
    today: NaiveDate,
) -> Result<ExpenseWithCategory> {
    let category_id = category
        .map(|c| resolve_category(db, identity, c))
        .transpose()?
        .map(|c| c.id);

    let payment_method: PaymentMethod = method
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let new = NewExpense {
        category_id,
        amount: parse_amount_arg(amount)?,
        date: parse_date_arg(date, today)?,
        payment_method,
        notes: notes.map(str::to_string),
    };

    let created = db
        .insert_expense(identity.user_id, &new)
        .context("Failed to record expense")?;
    db.record_audit(
        &identity.email,
        "create",
        Some("expense"),
        Some(created.expense.id),
        Some(&format!("amount={}", created.expense.amount)),
    );

    println!(
        "✅ Recorded ${} on {} in {} (id: {})",
        created.expense.amount,
        created.expense.date,
        created.category_label(),
        created.expense.id
    );

    Ok(created)
}

pub fn cmd_expenses_delete(db: &Database, identity: &Identity, id: i64) -> Result<()> {
    if !db.delete_expense(identity.user_id, id)? {
        bail!("Expense not found: {}", id);
    }
    db.record_audit(&identity.email, "delete", Some("expense"), Some(id), None);

    println!("✅ Deleted expense {}", id);

    Ok(())
}
