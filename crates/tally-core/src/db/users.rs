//! Users, API tokens and profiles

use rusqlite::{params, OptionalExtension};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, info};
use uuid::Uuid;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::identity::{AuthMethod, Identity, UserId};
use crate::models::{Profile, ProfileUpdate, User};

/// Account used when the server runs without authentication
pub const LOCAL_USER_EMAIL: &str = "local@localhost";

/// Only the hash of a token is ever stored
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_token() -> String {
    format!("tally_{}", Uuid::new_v4().simple())
}

impl Database {
    /// Register a user with a profile and return a fresh API token
    pub fn create_user(&self, email: &str, name: &str) -> Result<(User, String)> {
        let email = email.trim();
        let name = name.trim();
        ProfileUpdate {
            name: name.to_string(),
            email: email.to_string(),
        }
        .validate()?;

        if self.get_user_by_email(email)?.is_some() {
            return Err(Error::InvalidData(format!("User already exists: {}", email)));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("INSERT INTO users (email) VALUES (?)", params![email])?;
        let user_id = UserId(tx.last_insert_rowid());

        tx.execute(
            "INSERT INTO profiles (user_id, name, email) VALUES (?, ?, ?)",
            params![user_id, name, email],
        )?;

        tx.commit()?;
        drop(conn);

        let token = self.issue_token(user_id)?;
        let user = self
            .get_user(user_id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", user_id)))?;

        info!(user_id = %user_id, email = %email, "Created user");
        Ok((user, token))
    }

    /// Issue a new API token for a user
    ///
    /// The plaintext token is returned once and cannot be recovered later.
    pub fn issue_token(&self, user_id: UserId) -> Result<String> {
        if self.get_user(user_id)?.is_none() {
            return Err(Error::NotFound(format!("User {}", user_id)));
        }

        let token = generate_token();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO api_tokens (user_id, token_hash) VALUES (?, ?)",
            params![user_id, hash_token(&token)],
        )?;

        debug!(user_id = %user_id, "Issued API token");
        Ok(token)
    }

    /// Resolve a bearer token to an identity
    ///
    /// Unknown and revoked tokens yield `None`.
    pub fn authenticate_token(&self, token: &str) -> Result<Option<Identity>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let hash = hash_token(token);
        let conn = self.conn()?;
        let row: Option<(String, UserId, String)> = conn
            .query_row(
                r#"
                SELECT t.token_hash, u.id, u.email
                FROM api_tokens t
                JOIN users u ON u.id = t.user_id
                WHERE t.token_hash = ? AND t.revoked_at IS NULL
                "#,
                params![hash],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        Ok(row.and_then(|(stored, user_id, email)| {
            if stored.as_bytes().ct_eq(hash.as_bytes()).into() {
                Some(Identity {
                    user_id,
                    email,
                    method: AuthMethod::Token,
                })
            } else {
                None
            }
        }))
    }

    /// Revoke a token. Returns false if it was unknown or already revoked.
    pub fn revoke_token(&self, token: &str) -> Result<bool> {
        let conn = self.conn()?;
        let rows = conn.execute(
            "UPDATE api_tokens SET revoked_at = CURRENT_TIMESTAMP WHERE token_hash = ? AND revoked_at IS NULL",
            params![hash_token(token.trim())],
        )?;
        Ok(rows > 0)
    }

    pub fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, created_at FROM users WHERE id = ?",
                params![user_id],
                |row| {
                    let created_at_str: String = row.get(2)?;
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, email, created_at FROM users WHERE email = ? COLLATE NOCASE",
                params![email.trim()],
                |row| {
                    let created_at_str: String = row.get(2)?;
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        created_at: parse_datetime(&created_at_str),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Get or create the account used by unauthenticated (local) access
    pub fn ensure_local_user(&self) -> Result<Identity> {
        let user = match self.get_user_by_email(LOCAL_USER_EMAIL)? {
            Some(user) => user,
            None => self.create_user(LOCAL_USER_EMAIL, "Local User")?.0,
        };

        Ok(Identity {
            user_id: user.id,
            email: user.email,
            method: AuthMethod::Local,
        })
    }

    pub fn get_profile(&self, user_id: UserId) -> Result<Profile> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT user_id, name, email FROM profiles WHERE user_id = ?",
            params![user_id],
            |row| {
                Ok(Profile {
                    user_id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                })
            },
        )
        .optional()?
        .ok_or_else(|| Error::NotFound(format!("Profile for user {}", user_id)))
    }

    /// Change the profile's display name and contact email
    pub fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<Profile> {
        update.validate()?;

        if self.get_user(user_id)?.is_none() {
            return Err(Error::NotFound(format!("User {}", user_id)));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO profiles (user_id, name, email) VALUES (?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                updated_at = CURRENT_TIMESTAMP
            "#,
            params![user_id, update.name.trim(), update.email.trim()],
        )?;
        drop(conn);

        self.get_profile(user_id)
    }
}
