//! Dashboard summary

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::month_start;
use crate::models::Expense;
use crate::money::Money;

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Date the "current month" is taken from
    pub as_of: NaiveDate,
    /// All-time spending
    pub total: Money,
    /// Spending dated on or after the first of the current month
    pub monthly: Money,
    pub category_count: i64,
    /// `monthly` divided by the number of days elapsed this month (today included)
    pub avg_daily: Money,
}

/// Summarize a user's expenses as of `today`
pub fn dashboard_stats<E: AsRef<Expense>>(
    expenses: &[E],
    category_count: i64,
    today: NaiveDate,
) -> DashboardStats {
    let start = month_start(today);

    let total: Money = expenses.iter().map(|e| e.as_ref().amount).sum();
    let monthly: Money = expenses
        .iter()
        .map(AsRef::<Expense>::as_ref)
        .filter(|e| e.date >= start)
        .map(|e| e.amount)
        .sum();

    // Day of month is 1-based, so this never divides by zero
    let elapsed_days = today.day() as f64;
    let avg_daily = Money::from_cents((monthly.cents() as f64 / elapsed_days).round() as i64);

    DashboardStats {
        as_of: today,
        total,
        monthly,
        category_count,
        avg_daily,
    }
}
