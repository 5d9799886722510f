//! Spending aggregation for dashboards and reports
//!
//! Each aggregator is a pure function over rows that have already been scoped
//! to one user. The database layer (`db::reports`) fetches the rows and calls
//! into these.
//!
//! - `dashboard` - totals, current month, average per elapsed day
//! - `budget` - per-category spend against the month's limit
//! - `categories` - distribution of spending across categories
//! - `trend` - six-month spending trend

use chrono::{Datelike, Months, NaiveDate};

use crate::models::{Expense, ExpenseWithCategory};

mod budget;
mod categories;
mod dashboard;
mod trend;

pub use budget::{budget_status, budget_statuses, BudgetReport, BudgetStatus};
pub use categories::{category_distribution, CategoryReport, CategoryTotal};
pub use dashboard::{dashboard_stats, DashboardStats};
pub use trend::{monthly_trend, MonthBucket, MonthlyTrend, TREND_MONTHS};

impl AsRef<Expense> for Expense {
    fn as_ref(&self) -> &Expense {
        self
    }
}

impl AsRef<Expense> for ExpenseWithCategory {
    fn as_ref(&self) -> &Expense {
        &self.expense
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta` months away from `date`'s month
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let start = month_start(date);
    let shifted = if delta >= 0 {
        start.checked_add_months(Months::new(delta as u32))
    } else {
        start.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(start)
}

/// Ratio as a percentage, 0 when the denominator is 0
pub(crate) fn percent_of(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_start() {
        assert_eq!(month_start(date(2026, 10, 16)), date(2026, 10, 1));
        assert_eq!(month_start(date(2024, 2, 29)), date(2024, 2, 1));
    }

    #[test]
    fn test_shift_month_crosses_years() {
        assert_eq!(shift_month(date(2026, 3, 31), -5), date(2025, 10, 1));
        assert_eq!(shift_month(date(2025, 12, 15), 1), date(2026, 1, 1));
        assert_eq!(shift_month(date(2026, 1, 1), 0), date(2026, 1, 1));
    }

    #[test]
    fn test_percent_of_zero_whole() {
        assert_eq!(percent_of(500, 0), 0.0);
        assert_eq!(percent_of(50, 200), 25.0);
    }
}
