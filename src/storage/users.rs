use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use staybook_models::{NewUser, User};

use super::{StoreError, UserStore, with_timeout};

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, surname, avatar, \
                            email_verified, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgUserStore {
    db: PgPool,
    query_timeout: Duration,
}

impl PgUserStore {
    pub fn new(db: PgPool, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<User, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, User>(&sql).bind(value).fetch_one(&self.db),
        )
        .await
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, user: NewUser, role_id: i64) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, first_name, surname) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        );
        with_timeout(self.query_timeout, async {
            let mut tx = self.db.begin().await?;

            let stored = sqlx::query_as::<_, User>(&sql)
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&user.first_name)
                .bind(&user.surname)
                .fetch_one(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(stored.id)
                .bind(role_id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>(stored)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, User>(&sql).bind(id).fetch_one(&self.db),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.find_one("email", email).await
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.find_one("username", username).await
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update(&self, user: &User) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users \
             SET username = $1, email = $2, password_hash = $3, first_name = $4, surname = $5, \
                 avatar = $6, updated_at = NOW() \
             WHERE id = $7 \
             RETURNING {USER_COLUMNS}"
        );
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, User>(&sql)
                .bind(&user.username)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&user.first_name)
                .bind(&user.surname)
                .bind(&user.avatar)
                .bind(user.id)
                .fetch_one(&self.db),
        )
        .await
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn mark_email_verified(&self, user: &User) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users SET email_verified = TRUE, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, User>(&sql).bind(user.id).fetch_one(&self.db),
        )
        .await
    }
}
