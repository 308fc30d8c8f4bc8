use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use staybook_models::{NewToken, Token};

use super::{StoreError, TokenLedger, with_timeout};

const TOKEN_COLUMNS: &str = "id, user_id, name, token, created_at, updated_at, expired_at";

#[derive(Clone, Debug)]
pub struct PgTokenLedger {
    db: PgPool,
    query_timeout: Duration,
}

impl PgTokenLedger {
    pub fn new(db: PgPool, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }
}

#[async_trait]
impl TokenLedger for PgTokenLedger {
    #[instrument(skip(self, token), fields(user_id = token.user_id, purpose = %token.name))]
    async fn insert(&self, token: NewToken) -> Result<Token, StoreError> {
        let sql = format!(
            "INSERT INTO tokens (user_id, name, token, expired_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {TOKEN_COLUMNS}"
        );
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Token>(&sql)
                .bind(token.user_id)
                .bind(&token.name)
                .bind(&token.token)
                .bind(token.expired_at)
                .fetch_one(&self.db),
        )
        .await
    }

    #[instrument(skip(self, token), fields(token_id = token.id))]
    async fn update(&self, token: &Token) -> Result<Token, StoreError> {
        let sql = format!(
            "UPDATE tokens SET token = $1, expired_at = $2, updated_at = NOW() \
             WHERE id = $3 \
             RETURNING {TOKEN_COLUMNS}"
        );
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Token>(&sql)
                .bind(&token.token)
                .bind(token.expired_at)
                .bind(token.id)
                .fetch_one(&self.db),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        with_timeout(
            self.query_timeout,
            sqlx::query("DELETE FROM tokens WHERE id = $1")
                .bind(id)
                .execute(&self.db),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_purpose_and_user(
        &self,
        purpose: &str,
        user_id: i64,
    ) -> Result<Option<Token>, StoreError> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE name = $1 AND user_id = $2");
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Token>(&sql)
                .bind(purpose)
                .bind(user_id)
                .fetch_optional(&self.db),
        )
        .await
    }

    #[instrument(skip(self, value))]
    async fn find_by_token(&self, value: &str) -> Result<Option<Token>, StoreError> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM tokens WHERE token = $1");
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Token>(&sql)
                .bind(value)
                .fetch_optional(&self.db),
        )
        .await
    }

    #[instrument(skip(self, token), fields(user_id = token.user_id, purpose = %token.name))]
    async fn upsert(&self, token: NewToken) -> Result<Token, StoreError> {
        let sql = format!(
            "INSERT INTO tokens (user_id, name, token, expired_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, name) DO UPDATE \
             SET token = EXCLUDED.token, expired_at = EXCLUDED.expired_at, updated_at = NOW() \
             RETURNING {TOKEN_COLUMNS}"
        );
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Token>(&sql)
                .bind(token.user_id)
                .bind(&token.name)
                .bind(&token.token)
                .bind(token.expired_at)
                .fetch_one(&self.db),
        )
        .await
    }
}
