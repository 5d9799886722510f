//! Spending distribution across categories

use serde::{Deserialize, Serialize};

use super::percent_of;
use crate::models::ExpenseWithCategory;
use crate::money::Money;

/// One slice of the category breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    pub color: String,
    pub total: Money,
    /// Share of all spending, 0 when nothing was spent
    pub percentage: f64,
    pub expense_count: i64,
}

/// Category breakdown, largest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub total: Money,
    pub categories: Vec<CategoryTotal>,
}

/// Group expenses by category name and compute each group's share
///
/// Expenses without a category are grouped under "Uncategorized". Groups are
/// sorted by total descending, then by name.
pub fn category_distribution(expenses: &[ExpenseWithCategory]) -> CategoryReport {
    let mut groups: Vec<CategoryTotal> = Vec::new();

    for exp in expenses {
        let name = exp.category_label();
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => {
                group.total += exp.expense.amount;
                group.expense_count += 1;
            }
            None => groups.push(CategoryTotal {
                name: name.to_string(),
                color: exp.color_label().to_string(),
                total: exp.expense.amount,
                percentage: 0.0,
                expense_count: 1,
            }),
        }
    }

    let total: Money = groups.iter().map(|g| g.total).sum();
    for group in &mut groups {
        group.percentage = percent_of(group.total.cents(), total.cents());
    }

    groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    CategoryReport {
        total,
        categories: groups,
    }
}
