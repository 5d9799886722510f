//! Dashboard and report commands

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::reports::{CategoryReport, DashboardStats, MonthlyTrend};
use tally_core::{Database, Identity};

use super::truncate;

const BAR_WIDTH: usize = 30;

/// Scale `value` against `max` to a bar of at most `BAR_WIDTH` blocks
fn bar(value: i64, max: i64) -> String {
    if max <= 0 || value <= 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

pub fn cmd_dashboard(db: &Database, identity: &Identity, today: NaiveDate) -> Result<DashboardStats> {
    let stats = db.dashboard(identity.user_id, today)?;

    println!();
    println!("📊 Tally Dashboard ({})", stats.as_of.format("%B %Y"));
    println!("   ─────────────────────────────");
    println!("   Total spent:      ${}", stats.total);
    println!("   This month:       ${}", stats.monthly);
    println!("   Average per day:  ${}", stats.avg_daily);
    println!("   Categories:       {}", stats.category_count);

    let budgets = db.budget_report(identity.user_id, today)?;
    let over = budgets.over_budget_count();
    if over > 0 {
        println!();
        println!(
            "⚠️  {} budget(s) over limit. Run 'tally budgets' to see details.",
            over
        );
    }

    Ok(stats)
}

pub fn cmd_report_categories(db: &Database, identity: &Identity) -> Result<CategoryReport> {
    let report = db.category_report(identity.user_id)?;

    println!();
    println!("🗂️  Spending by Category");
    println!("   ─────────────────────────────────────────────────────────────");

    if report.categories.is_empty() {
        println!("   No expenses recorded yet.");
        return Ok(report);
    }

    let max = report
        .categories
        .iter()
        .map(|c| c.total.cents())
        .max()
        .unwrap_or(0);
    for category in &report.categories {
        println!(
            "   {:<16} │ {:>10} │ {:>5.1}% │ {}",
            truncate(&category.name, 16),
            format!("${}", category.total),
            category.percentage,
            bar(category.total.cents(), max)
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total: ${}", report.total);

    Ok(report)
}

pub fn cmd_report_monthly(db: &Database, identity: &Identity, today: NaiveDate) -> Result<MonthlyTrend> {
    let trend = db.monthly_trend(identity.user_id, today)?;

    println!();
    println!("📈 Monthly Spending");
    println!("   ─────────────────────────────────────────────────────────────");

    let max = trend
        .months
        .iter()
        .map(|m| m.amount.cents())
        .max()
        .unwrap_or(0);
    for month in &trend.months {
        println!(
            "   {:<8} │ {:>10} │ {:>3} │ {}",
            month.label,
            format!("${}", month.amount),
            month.expense_count,
            bar(month.amount.cents(), max)
        );
    }

    Ok(trend)
}
