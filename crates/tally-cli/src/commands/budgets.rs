//! Monthly budget commands

use anyhow::{bail, Result};
use chrono::NaiveDate;
use tally_core::models::Budget;
use tally_core::reports::BudgetReport;
use tally_core::{Database, Identity};

use super::{parse_amount_arg, parse_month_arg, resolve_category, truncate};

pub fn cmd_budgets_list(
    db: &Database,
    identity: &Identity,
    month: Option<&str>,
    today: NaiveDate,
) -> Result<BudgetReport> {
    let month = parse_month_arg(month, today)?;
    let report = db.budget_report(identity.user_id, month)?;

    println!();
    println!("💰 Budgets for {}", month.format("%B %Y"));
    println!("   ─────────────────────────────────────────────────────────────");

    if report.budgets.is_empty() {
        println!("   No budgets set. Add one with 'tally budgets set <category> <limit>'.");
        return Ok(report);
    }

    for status in &report.budgets {
        let percent = status
            .percentage
            .map(|p| format!("{:>5.1}%", p))
            .unwrap_or_else(|| "    - ".to_string());
        let flag = if status.is_over_budget { " ⚠️ over" } else { "" };
        println!(
            "   {:>4} │ {:<16} │ {:>10} of {:>10} │ {}{}",
            status.budget_id,
            truncate(&status.category_name, 16),
            format!("${}", status.spent),
            format!("${}", status.limit),
            percent,
            flag
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Total: ${} of ${} ({} over budget)",
        report.total_spent,
        report.total_limit,
        report.over_budget_count()
    );

    Ok(report)
}

pub fn cmd_budgets_set(
    db: &Database,
    identity: &Identity,
    category: &str,
    limit: &str,
    month: Option<&str>,
    today: NaiveDate,
) -> Result<Budget> {
    let category = resolve_category(db, identity, category)?;
    let month = parse_month_arg(month, today)?;
    let limit = parse_amount_arg(limit)?;

    let budget = db.upsert_budget(identity.user_id, category.id, month, limit)?;
    db.record_audit(
        &identity.email,
        "upsert",
        Some("budget"),
        Some(budget.id),
        Some(&format!(
            "category_id={}, month={}, limit={}",
            category.id,
            month.format("%Y-%m"),
            limit
        )),
    );

    println!(
        "✅ Budget for '{}' in {}: ${}",
        category.name,
        month.format("%B %Y"),
        budget.limit_amount
    );

    Ok(budget)
}

pub fn cmd_budgets_delete(db: &Database, identity: &Identity, id: i64) -> Result<()> {
    if !db.delete_budget(identity.user_id, id)? {
        bail!("Budget not found: {}", id);
    }
    db.record_audit(&identity.email, "delete", Some("budget"), Some(id), None);

    println!("✅ Deleted budget {}", id);

    Ok(())
}
