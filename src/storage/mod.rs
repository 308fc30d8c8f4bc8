//! Persistence seams of the auth subsystem.
//!
//! Three repository traits cover everything the auth flows touch:
//!
//! - [`UserStore`]: user rows (identity store)
//! - [`TokenLedger`]: one credential record per `(user, purpose)`
//! - [`RoleResolver`]: seeded roles and their assignment to users
//!
//! Each trait has a PostgreSQL implementation backed by a shared [`PgPool`]
//! and, behind the `test-utils` feature, an in-memory double in [`memory`].
//!
//! Every Postgres call runs under the configured query timeout. "Absent" is
//! reported as `Ok(None)` by ledger lookups and as [`StoreError::NotFound`] by
//! the user and role finders; both are distinct from storage failures.
//!
//! [`PgPool`]: sqlx::PgPool

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use staybook_models::{NewToken, NewUser, Role, Token, User};

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod roles;
pub mod tokens;
pub mod users;

pub use roles::PgRoleResolver;
pub use tokens::PgTokenLedger;
pub use users::PgUserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    /// A unique constraint rejected the write.
    #[error("record already exists")]
    Duplicate,
    #[error("storage operation timed out")]
    Timeout,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Duplicate
            }
            // Referenced user or role row is missing
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                StoreError::NotFound
            }
            other => StoreError::Database(other),
        }
    }
}

/// Runs a query future under `limit`.
pub(crate) async fn with_timeout<T, F>(limit: Duration, query: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout),
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Stores the user together with its first role assignment; neither is
    /// kept without the other. An unknown `role_id` is [`StoreError::NotFound`].
    async fn insert(&self, user: NewUser, role_id: i64) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<User, StoreError>;

    /// Persists every mutable field (username, email, password hash, names,
    /// avatar) and returns the stored row.
    async fn update(&self, user: &User) -> Result<User, StoreError>;

    /// Sets only the email-verified flag.
    async fn mark_email_verified(&self, user: &User) -> Result<User, StoreError>;
}

#[async_trait]
pub trait TokenLedger: Send + Sync {
    async fn insert(&self, token: NewToken) -> Result<Token, StoreError>;

    /// Replaces credential and expiry of the record with `token.id`.
    async fn update(&self, token: &Token) -> Result<Token, StoreError>;

    /// Deleting an id that no longer exists is not an error.
    async fn remove(&self, id: i64) -> Result<(), StoreError>;

    async fn find_by_purpose_and_user(
        &self,
        purpose: &str,
        user_id: i64,
    ) -> Result<Option<Token>, StoreError>;

    async fn find_by_token(&self, value: &str) -> Result<Option<Token>, StoreError>;

    /// Inserts, or replaces the record already holding the `(user, purpose)` slot.
    async fn upsert(&self, token: NewToken) -> Result<Token, StoreError>;
}

#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Role, StoreError>;

    /// Empty when the user has no roles.
    async fn find_all_for_user(&self, user_id: i64) -> Result<Vec<Role>, StoreError>;

    /// Assigning an already assigned role is a no-op.
    async fn assign(&self, user_id: i64, role_id: i64) -> Result<(), StoreError>;

    async fn unassign(&self, user_id: i64, role_id: i64) -> Result<(), StoreError>;
}
