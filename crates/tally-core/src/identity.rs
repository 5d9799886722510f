//! Caller identity and session lifecycle
//!
//! Every data access takes a [`UserId`] explicitly. A [`Session`] tracks
//! whether that identity is currently usable:
//!
//! ```text
//! Unauthenticated --authenticate--> Authenticated --sign_out--> SignedOut
//! ```

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Owner of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for UserId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for UserId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(UserId)
    }
}

/// How the caller proved who they are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Bearer token issued by `create_user`/`issue_token`
    Token,
    /// Local access: CLI `--user`, or a server started with `--no-auth`
    Local,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Local => "local",
        }
    }
}

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    pub method: AuthMethod,
}

/// Session state for one client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated(Identity),
    SignedOut,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `Authenticated`
    ///
    /// A signed-out session is terminal; callers start a new session instead.
    pub fn authenticate(&mut self, identity: Identity) -> Result<()> {
        match self {
            Self::SignedOut => Err(Error::Unauthorized(
                "Session has been signed out".to_string(),
            )),
            _ => {
                *self = Self::Authenticated(identity);
                Ok(())
            }
        }
    }

    /// Sign out, returning the identity that was active (if any)
    pub fn sign_out(&mut self) -> Option<Identity> {
        match std::mem::take(self) {
            Self::Authenticated(identity) => {
                *self = Self::SignedOut;
                Some(identity)
            }
            Self::SignedOut => {
                *self = Self::SignedOut;
                None
            }
            Self::Unauthenticated => None,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// The active identity, or `Error::Unauthorized`
    pub fn require(&self) -> Result<&Identity> {
        self.identity()
            .ok_or_else(|| Error::Unauthorized("Authentication required".to_string()))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}
