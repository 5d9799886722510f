//! Category operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::identity::UserId;
use crate::models::{Category, NewCategory};

fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    let created_at_str: String = row.get(4)?;
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        color: row.get(3)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create a category. Names are unique per user, ignoring ASCII case.
    pub fn create_category(&self, user_id: UserId, new: &NewCategory) -> Result<Category> {
        new.validate()?;
        let name = new.name.trim();

        let conn = self.conn()?;
        let exists: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE user_id = ? AND name = ? COLLATE NOCASE",
                params![user_id, name],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(Error::InvalidData(format!(
                "Category already exists: {}",
                name
            )));
        }

        conn.execute(
            "INSERT INTO categories (user_id, name, color) VALUES (?, ?, ?)",
            params![user_id, name, new.color_or_default()],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_category(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", id)))
    }

    /// List a user's categories by name
    pub fn list_categories(&self, user_id: UserId) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, color, created_at FROM categories WHERE user_id = ? ORDER BY name",
        )?;

        let categories = stmt
            .query_map(params![user_id], row_to_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    pub fn count_categories(&self, user_id: UserId) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get a category by ID, if it belongs to the user
    pub fn get_category(&self, user_id: UserId, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, user_id, name, color, created_at FROM categories WHERE id = ? AND user_id = ?",
                params![id, user_id],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    /// Look up a category by name (case-insensitive)
    pub fn find_category_by_name(&self, user_id: UserId, name: &str) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, user_id, name, color, created_at FROM categories WHERE user_id = ? AND name = ? COLLATE NOCASE",
                params![user_id, name.trim()],
                row_to_category,
            )
            .optional()?;
        Ok(category)
    }

    /// Delete a category
    ///
    /// Its expenses become uncategorized and its budgets are removed.
    /// Returns false if the category does not exist for this user.
    pub fn delete_category(&self, user_id: UserId, id: i64) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "UPDATE expenses SET category_id = NULL WHERE category_id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        tx.execute(
            "DELETE FROM budgets WHERE category_id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        let rows = tx.execute(
            "DELETE FROM categories WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;

        tx.commit()?;

        if rows > 0 {
            info!(user_id = %user_id, category_id = id, "Deleted category");
        }
        Ok(rows > 0)
    }
}
