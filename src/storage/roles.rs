use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use staybook_models::Role;

use super::{RoleResolver, StoreError, with_timeout};

#[derive(Clone, Debug)]
pub struct PgRoleResolver {
    db: PgPool,
    query_timeout: Duration,
}

impl PgRoleResolver {
    pub fn new(db: PgPool, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }
}

#[async_trait]
impl RoleResolver for PgRoleResolver {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Role, StoreError> {
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Role>(
                "SELECT id, name, description, created_at, updated_at FROM roles WHERE name = $1",
            )
            .bind(name)
            .fetch_one(&self.db),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn find_all_for_user(&self, user_id: i64) -> Result<Vec<Role>, StoreError> {
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Role>(
                r#"
                SELECT r.id, r.name, r.description, r.created_at, r.updated_at
                FROM roles r
                INNER JOIN user_roles ur ON ur.role_id = r.id
                WHERE ur.user_id = $1
                ORDER BY r.id
                "#,
            )
            .bind(user_id)
            .fetch_all(&self.db),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn assign(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        with_timeout(
            self.query_timeout,
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) \
                 ON CONFLICT (user_id, role_id) DO NOTHING",
            )
            .bind(user_id)
            .bind(role_id)
            .execute(&self.db),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn unassign(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        with_timeout(
            self.query_timeout,
            sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
                .bind(user_id)
                .bind(role_id)
                .execute(&self.db),
        )
        .await?;
        Ok(())
    }
}
