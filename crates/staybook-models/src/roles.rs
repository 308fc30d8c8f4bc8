//! Role models.
//!
//! Roles are seeded by migration and read-only at runtime. Assignment to users
//! goes through the `user_roles` join table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Role summary embedded in user responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleInfo {
    pub id: i64,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Role> for RoleInfo {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            created_at: role.created_at,
        }
    }
}

/// Names of the roles seeded by the initial migration.
pub mod system_roles {
    /// Default role assigned at registration
    pub const USER: &str = "user";
    pub const ADMIN: &str = "admin";
    pub const MANAGER: &str = "manager";

    pub fn all() -> [&'static str; 3] {
        [USER, ADMIN, MANAGER]
    }

    pub fn is_system_role(name: &str) -> bool {
        all().contains(&name)
    }
}

/// Collects role names in the order given, as embedded in access claims.
pub fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|r| r.name.clone()).collect()
}
