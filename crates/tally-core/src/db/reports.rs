//! Report queries: fetch a user's rows, then aggregate with `crate::reports`

use chrono::NaiveDate;

use super::Database;
use crate::error::Result;
use crate::export::{ExpenseExport, ExportFormat};
use crate::identity::UserId;
use crate::models::ExpenseFilter;
use crate::reports::{
    self, budget_statuses, category_distribution, dashboard_stats, month_start, shift_month,
    BudgetReport, CategoryReport, DashboardStats, MonthlyTrend, TREND_MONTHS,
};

impl Database {
    /// Totals, current-month spending and average per elapsed day
    pub fn dashboard(&self, user_id: UserId, today: NaiveDate) -> Result<DashboardStats> {
        let expenses = self.list_expenses(user_id, &ExpenseFilter::default())?;
        let category_count = self.count_categories(user_id)?;
        Ok(dashboard_stats(&expenses, category_count, today))
    }

    /// Each of the month's budgets against spending in that month
    pub fn budget_report(&self, user_id: UserId, month: NaiveDate) -> Result<BudgetReport> {
        let month = month_start(month);
        let budgets = self.list_budgets(user_id, month)?;
        let expenses = self.list_expenses(
            user_id,
            &ExpenseFilter {
                from: Some(month),
                until: Some(shift_month(month, 1)),
                ..Default::default()
            },
        )?;

        Ok(BudgetReport::new(month, budget_statuses(&budgets, &expenses)))
    }

    /// All-time spending per category
    pub fn category_report(&self, user_id: UserId) -> Result<CategoryReport> {
        let expenses = self.list_expenses(user_id, &ExpenseFilter::default())?;
        Ok(category_distribution(&expenses))
    }

    /// Spending per month for the six months ending with `today`'s month
    pub fn monthly_trend(&self, user_id: UserId, today: NaiveDate) -> Result<MonthlyTrend> {
        let expenses = self.list_expenses(
            user_id,
            &ExpenseFilter {
                from: Some(shift_month(today, -(TREND_MONTHS - 1))),
                until: Some(shift_month(today, 1)),
                ..Default::default()
            },
        )?;
        Ok(reports::monthly_trend(&expenses, today))
    }

    /// All of a user's expenses rendered as CSV or JSON, newest first
    pub fn export_expenses(
        &self,
        user_id: UserId,
        format: ExportFormat,
    ) -> Result<ExpenseExport> {
        let expenses = self.list_expenses(user_id, &ExpenseFilter::default())?;
        ExpenseExport::render(format, &expenses)
    }
}
