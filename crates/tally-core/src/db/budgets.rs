//! Budget operations

use chrono::NaiveDate;
use rusqlite::params;
use tracing::info;

use super::{date_column, Database};
use crate::error::{Error, Result};
use crate::identity::UserId;
use crate::models::{Budget, BudgetWithCategory};
use crate::money::Money;
use crate::reports::month_start;

impl Database {
    /// Set the limit for a category in a month
    ///
    /// There is at most one budget per (user, category, month); setting it again
    /// replaces the limit. `month` may be any day of the month.
    pub fn upsert_budget(
        &self,
        user_id: UserId,
        category_id: i64,
        month: NaiveDate,
        limit: Money,
    ) -> Result<Budget> {
        if limit.is_negative() {
            return Err(Error::InvalidData(format!(
                "Budget limit must not be negative: {}",
                limit
            )));
        }
        if limit > Money::MAX_AMOUNT {
            return Err(Error::InvalidData(format!(
                "Budget limit must not exceed {}: {}",
                Money::MAX_AMOUNT,
                limit
            )));
        }
        if self.get_category(user_id, category_id)?.is_none() {
            return Err(Error::InvalidData(format!(
                "Unknown category: {}",
                category_id
            )));
        }

        let month = month_start(month);
        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO budgets (user_id, category_id, month, limit_amount)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id, category_id, month) DO UPDATE SET
                limit_amount = excluded.limit_amount,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![user_id, category_id, month.to_string(), limit],
        )?;

        let budget = conn.query_row(
            r#"
            SELECT id, user_id, category_id, month, limit_amount
            FROM budgets
            WHERE user_id = ? AND category_id = ? AND month = ?
            "#,
            params![user_id, category_id, month.to_string()],
            |row| {
                Ok(Budget {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    category_id: row.get(2)?,
                    month: date_column(row, 3)?,
                    limit_amount: row.get(4)?,
                })
            },
        )?;

        info!(
            user_id = %user_id,
            category_id,
            month = %month.format("%Y-%m"),
            limit = %limit,
            "Upserted budget"
        );
        Ok(budget)
    }

    /// List a user's budgets for a month, joined with category display fields
    pub fn list_budgets(&self, user_id: UserId, month: NaiveDate) -> Result<Vec<BudgetWithCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT b.id, b.user_id, b.category_id, b.month, b.limit_amount, c.name, c.color
            FROM budgets b
            JOIN categories c ON c.id = b.category_id
            WHERE b.user_id = ? AND b.month = ?
            ORDER BY c.name
            "#,
        )?;

        let budgets = stmt
            .query_map(params![user_id, month_start(month).to_string()], |row| {
                Ok(BudgetWithCategory {
                    budget: Budget {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        category_id: row.get(2)?,
                        month: date_column(row, 3)?,
                        limit_amount: row.get(4)?,
                    },
                    category_name: row.get(5)?,
                    category_color: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(budgets)
    }

    /// Delete a budget. Returns false if it does not exist for this user.
    pub fn delete_budget(&self, user_id: UserId, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM budgets WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}
