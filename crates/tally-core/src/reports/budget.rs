//! Budget-versus-spend status

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::percent_of;
use crate::models::{BudgetWithCategory, Expense};
use crate::money::Money;

/// Spending status for one budget row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub category_id: i64,
    pub category_name: String,
    pub category_color: String,
    pub month: NaiveDate,
    pub limit: Money,
    pub spent: Money,
    /// `100 * spent / limit`, unclamped. `None` when the limit is zero.
    pub percentage: Option<f64>,
    /// Percentage clamped to `[0, 100]` for progress bars
    pub progress: f64,
    /// `limit - spent`; negative once over budget
    pub remaining: Money,
    pub is_over_budget: bool,
}

/// All budgets for one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReport {
    pub month: NaiveDate,
    pub total_limit: Money,
    pub total_spent: Money,
    pub budgets: Vec<BudgetStatus>,
}

impl BudgetReport {
    pub fn new(month: NaiveDate, budgets: Vec<BudgetStatus>) -> Self {
        Self {
            month,
            total_limit: budgets.iter().map(|b| b.limit).sum(),
            total_spent: budgets.iter().map(|b| b.spent).sum(),
            budgets,
        }
    }

    pub fn over_budget_count(&self) -> usize {
        self.budgets.iter().filter(|b| b.is_over_budget).count()
    }
}

/// Compare a limit with what was spent against it
///
/// A zero limit has no meaningful ratio: its percentage is `None`, and any
/// spending at all counts as over budget.
pub fn budget_status(budget: &BudgetWithCategory, spent: Money) -> BudgetStatus {
    let limit = budget.budget.limit_amount;

    let (percentage, progress, is_over_budget) = if limit.is_zero() {
        let over = spent > Money::zero();
        (None, if over { 100.0 } else { 0.0 }, over)
    } else {
        let pct = percent_of(spent.cents(), limit.cents());
        (Some(pct), pct.clamp(0.0, 100.0), pct > 100.0)
    };

    BudgetStatus {
        budget_id: budget.budget.id,
        category_id: budget.budget.category_id,
        category_name: budget.category_name.clone(),
        category_color: budget.category_color.clone(),
        month: budget.budget.month,
        limit,
        spent,
        percentage,
        progress,
        remaining: limit - spent,
        is_over_budget,
    }
}

/// Status for every budget, summing the expenses in each budget's category
///
/// `expenses` should already be limited to the budgets' month.
pub fn budget_statuses<E: AsRef<Expense>>(
    budgets: &[BudgetWithCategory],
    expenses: &[E],
) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|b| {
            let spent: Money = expenses
                .iter()
                .map(AsRef::<Expense>::as_ref)
                .filter(|e| e.category_id == Some(b.budget.category_id))
                .map(|e| e.amount)
                .sum();
            budget_status(b, spent)
        })
        .collect()
}
