use std::fmt;
use std::sync::Arc;

use sqlx::PgPool;

use staybook_config::{AppConfig, CorsConfig, JwtConfig};

use crate::storage::{
    PgRoleResolver, PgTokenLedger, PgUserStore, RoleResolver, TokenLedger, UserStore,
};
use crate::utils::email::{Mailer, mailer_from_config};

/// Shared per-process dependencies handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tokens: Arc<dyn TokenLedger>,
    pub roles: Arc<dyn RoleResolver>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    /// bcrypt work factor for new password hashes
    pub password_cost: u32,
}

impl AppState {
    /// Postgres-backed state built from the loaded configuration.
    pub fn new(db: PgPool, config: &AppConfig) -> Self {
        let query_timeout = config.database.query_timeout;

        Self {
            users: Arc::new(PgUserStore::new(db.clone(), query_timeout)),
            tokens: Arc::new(PgTokenLedger::new(db.clone(), query_timeout)),
            roles: Arc::new(PgRoleResolver::new(db, query_timeout)),
            mailer: mailer_from_config(&config.email),
            jwt_config: config.jwt.clone(),
            cors_config: config.cors.clone(),
            password_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .field("password_cost", &self.password_cost)
            .finish_non_exhaustive()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use in_memory::InMemoryBackends;

#[cfg(any(test, feature = "test-utils"))]
mod in_memory {
    use std::sync::Arc;

    use staybook_config::{CorsConfig, JwtConfig};

    use super::AppState;
    use crate::storage::memory::{MemoryRoleResolver, MemoryTokenLedger, MemoryUserStore};
    use crate::utils::email::RecordingMailer;

    /// Concrete in-memory backends, kept so tests can inspect them after
    /// driving the service through [`AppState`].
    #[derive(Clone)]
    pub struct InMemoryBackends {
        pub users: Arc<MemoryUserStore>,
        pub tokens: Arc<MemoryTokenLedger>,
        pub roles: Arc<MemoryRoleResolver>,
        pub mailer: Arc<RecordingMailer>,
    }

    impl InMemoryBackends {
        pub fn new() -> Self {
            let roles = Arc::new(MemoryRoleResolver::seeded());
            Self {
                users: Arc::new(MemoryUserStore::with_role_resolver(roles.clone())),
                tokens: Arc::new(MemoryTokenLedger::new()),
                roles,
                mailer: Arc::new(RecordingMailer::new()),
            }
        }

        pub fn state(&self, jwt_config: JwtConfig) -> AppState {
            AppState {
                users: self.users.clone(),
                tokens: self.tokens.clone(),
                roles: self.roles.clone(),
                mailer: self.mailer.clone(),
                jwt_config,
                cors_config: CorsConfig {
                    allowed_origins: vec!["http://localhost:3000".to_string()],
                },
                password_cost: staybook_core::MIN_COST,
            }
        }
    }

    impl Default for InMemoryBackends {
        fn default() -> Self {
            Self::new()
        }
    }
}
