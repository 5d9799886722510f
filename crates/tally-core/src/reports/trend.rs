//! Six-month spending trend

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::shift_month;
use crate::models::Expense;
use crate::money::Money;

/// Number of calendar months in the trend window (current month included)
pub const TREND_MONTHS: i32 = 6;

/// Spending in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// `"Mon YYYY"`, e.g. `"Oct 2026"`
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub amount: Money,
    pub expense_count: i64,
}

/// Month buckets, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub months: Vec<MonthBucket>,
}

/// Bucket expenses into the six months ending with `today`'s month
///
/// Every bucket exists even when empty. Expenses outside the window are
/// ignored.
pub fn monthly_trend<E: AsRef<Expense>>(expenses: &[E], today: NaiveDate) -> MonthlyTrend {
    let mut months: Vec<MonthBucket> = (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let start = shift_month(today, -back);
            MonthBucket {
                label: start.format("%b %Y").to_string(),
                year: start.year(),
                month: start.month(),
                amount: Money::zero(),
                expense_count: 0,
            }
        })
        .collect();

    for exp in expenses.iter().map(AsRef::<Expense>::as_ref) {
        if let Some(bucket) = months
            .iter_mut()
            .find(|b| b.year == exp.date.year() && b.month == exp.date.month())
        {
            bucket.amount += exp.amount;
            bucket.expense_count += 1;
        }
    }

    MonthlyTrend { months }
}
