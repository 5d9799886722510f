//! Expense operations

use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use super::{date_column, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::identity::UserId;
use crate::models::{Expense, ExpenseFilter, ExpenseWithCategory, NewExpense, PaymentMethod};

const EXPENSE_COLUMNS: &str = r#"
    e.id, e.user_id, e.category_id, e.amount, e.date, e.payment_method, e.notes, e.created_at,
    c.name, c.color
"#;

impl Database {
    fn row_to_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExpenseWithCategory> {
        let method_str: String = row.get(5)?;
        let created_at_str: String = row.get(7)?;

        Ok(ExpenseWithCategory {
            expense: Expense {
                id: row.get(0)?,
                user_id: row.get(1)?,
                category_id: row.get(2)?,
                amount: row.get(3)?,
                date: date_column(row, 4)?,
                payment_method: method_str.parse().unwrap_or(PaymentMethod::Other),
                notes: row.get(6)?,
                created_at: parse_datetime(&created_at_str),
            },
            category_name: row.get(8)?,
            category_color: row.get(9)?,
        })
    }

    /// Record an expense
    ///
    /// A category, when given, must belong to the same user.
    pub fn insert_expense(&self, user_id: UserId, new: &NewExpense) -> Result<ExpenseWithCategory> {
        new.validate()?;

        if let Some(category_id) = new.category_id {
            if self.get_category(user_id, category_id)?.is_none() {
                return Err(Error::InvalidData(format!(
                    "Unknown category: {}",
                    category_id
                )));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO expenses (user_id, category_id, amount, date, payment_method, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                new.category_id,
                new.amount,
                new.date.to_string(),
                new.payment_method.as_str(),
                new.normalized_notes(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        info!(user_id = %user_id, expense_id = id, amount = %new.amount, "Recorded expense");

        self.get_expense(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    pub fn get_expense(&self, user_id: UserId, id: i64) -> Result<Option<ExpenseWithCategory>> {
        let conn = self.conn()?;
        let sql = format!(
            r#"
            SELECT {}
            FROM expenses e
            LEFT JOIN categories c ON c.id = e.category_id
            WHERE e.id = ? AND e.user_id = ?
            "#,
            EXPENSE_COLUMNS
        );
        let expense = conn
            .query_row(&sql, params![id, user_id], Self::row_to_expense)
            .optional()?;
        Ok(expense)
    }

    /// List a user's expenses, newest first
    pub fn list_expenses(
        &self,
        user_id: UserId,
        filter: &ExpenseFilter,
    ) -> Result<Vec<ExpenseWithCategory>> {
        let conn = self.conn()?;

        let mut conditions = vec!["e.user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(from) = filter.from {
            conditions.push("e.date >= ?".to_string());
            params.push(Box::new(from.to_string()));
        }
        if let Some(until) = filter.until {
            conditions.push("e.date < ?".to_string());
            params.push(Box::new(until.to_string()));
        }
        if let Some(category_id) = filter.category_id {
            conditions.push("e.category_id = ?".to_string());
            params.push(Box::new(category_id));
        }
        // Search runs in Rust so it is a literal, Unicode case-insensitive substring match
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut sql = format!(
            r#"
            SELECT {}
            FROM expenses e
            LEFT JOIN categories c ON c.id = e.category_id
            WHERE {}
            ORDER BY e.date DESC, e.id DESC
            "#,
            EXPENSE_COLUMNS,
            conditions.join(" AND ")
        );
        if let (Some(limit), None) = (filter.limit, &search) {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit));
        }

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut expenses = stmt
            .query_map(params_refs.as_slice(), Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if let Some(term) = &search {
            expenses.retain(|e| e.matches_search(term));
            if let Some(limit) = filter.limit.and_then(|l| usize::try_from(l).ok()) {
                expenses.truncate(limit);
            }
        }

        debug!(user_id = %user_id, count = expenses.len(), "Listed expenses");
        Ok(expenses)
    }

    /// Delete an expense. Returns false if it does not exist for this user.
    pub fn delete_expense(&self, user_id: UserId, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}
