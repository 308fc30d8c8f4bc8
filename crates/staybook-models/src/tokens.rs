//! Token ledger records.
//!
//! A ledger row binds one credential string to a `(user, purpose)` slot. The
//! `tokens` table enforces at most one row per slot.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Purpose slot holding both the email verification credential and, after
/// verification, the login refresh credential.
pub const REFRESH_PURPOSE: &str = "refresh";

#[derive(FromRow, Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expired_at: Option<DateTime<Utc>>,
}

impl Token {
    /// A record without an expiry never lapses.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expired_at.is_some_and(|at| at <= now)
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now)
    }
}

/// Ledger row to be written. Identity and timestamps are managed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewToken {
    pub user_id: i64,
    pub name: String,
    pub token: String,
    pub expired_at: Option<DateTime<Utc>>,
}

impl NewToken {
    pub fn refresh(user_id: i64, token: String, expired_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            name: REFRESH_PURPOSE.to_string(),
            token,
            expired_at: Some(expired_at),
        }
    }
}
