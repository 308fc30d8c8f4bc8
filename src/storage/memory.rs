//! In-memory repository doubles.
//!
//! They honour the same uniqueness rules as the SQL schema (unique username
//! and email, one token per `(user, purpose)`, one assignment per
//! `(user, role)`), so orchestrator behavior observed against them matches
//! the Postgres implementations.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use staybook_models::{NewToken, NewUser, Role, Token, User, system_roles};

use super::{RoleResolver, StoreError, TokenLedger, UserStore};

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: HashMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            rows: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Users plus the role resolver that receives their first assignment.
#[derive(Debug)]
pub struct MemoryUserStore {
    users: Mutex<Table<User>>,
    roles: Arc<MemoryRoleResolver>,
}

impl MemoryUserStore {
    /// Store backed by its own seeded resolver.
    pub fn new() -> Self {
        Self::with_role_resolver(Arc::new(MemoryRoleResolver::seeded()))
    }

    pub fn with_role_resolver(roles: Arc<MemoryRoleResolver>) -> Self {
        Self {
            users: Mutex::new(Table::default()),
            roles,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table<User>> {
        self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn find_by<P>(&self, predicate: P) -> Result<User, StoreError>
    where
        P: Fn(&User) -> bool,
    {
        self.lock()
            .rows
            .values()
            .find(|u| predicate(u))
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser, role_id: i64) -> Result<User, StoreError> {
        let mut table = self.lock();
        let mut role_tables = self.roles.lock();
        if !role_tables.roles.iter().any(|r| r.id == role_id) {
            return Err(StoreError::NotFound);
        }
        if table
            .rows
            .values()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let id = table.next_id();
        let stored = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            surname: user.surname,
            avatar: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, stored.clone());
        role_tables.assignments.insert((id, role_id));
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        self.lock().rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.find_by(|u| u.email == email)
    }

    async fn find_by_username(&self, username: &str) -> Result<User, StoreError> {
        self.find_by(|u| u.username == username)
    }

    async fn update(&self, user: &User) -> Result<User, StoreError> {
        let mut table = self.lock();
        if table.rows.values().any(|u| {
            u.id != user.id && (u.email == user.email || u.username == user.username)
        }) {
            return Err(StoreError::Duplicate);
        }

        let stored = table.rows.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        stored.first_name = user.first_name.clone();
        stored.surname = user.surname.clone();
        stored.avatar = user.avatar.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn mark_email_verified(&self, user: &User) -> Result<User, StoreError> {
        let mut table = self.lock();
        let stored = table.rows.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        stored.email_verified = true;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenLedger {
    tokens: Mutex<Table<Token>>,
}

impl MemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table<Token>> {
        self.tokens.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All records held for `user_id`, any purpose.
    pub fn records_for(&self, user_id: i64) -> Vec<Token> {
        self.lock()
            .rows
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Overwrites the expiry of the `(user, purpose)` record, if any.
    pub fn set_expiry(&self, user_id: i64, purpose: &str, expired_at: Option<DateTime<Utc>>) {
        let mut table = self.lock();
        if let Some(token) = table
            .rows
            .values_mut()
            .find(|t| t.user_id == user_id && t.name == purpose)
        {
            token.expired_at = expired_at;
        }
    }
}

#[async_trait]
impl TokenLedger for MemoryTokenLedger {
    async fn insert(&self, token: NewToken) -> Result<Token, StoreError> {
        let mut table = self.lock();
        if table
            .rows
            .values()
            .any(|t| t.user_id == token.user_id && t.name == token.name)
        {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let id = table.next_id();
        let stored = Token {
            id,
            user_id: token.user_id,
            name: token.name,
            token: token.token,
            created_at: now,
            updated_at: now,
            expired_at: token.expired_at,
        };
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, token: &Token) -> Result<Token, StoreError> {
        let mut table = self.lock();
        let stored = table.rows.get_mut(&token.id).ok_or(StoreError::NotFound)?;
        stored.token = token.token.clone();
        stored.expired_at = token.expired_at;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn remove(&self, id: i64) -> Result<(), StoreError> {
        self.lock().rows.remove(&id);
        Ok(())
    }

    async fn find_by_purpose_and_user(
        &self,
        purpose: &str,
        user_id: i64,
    ) -> Result<Option<Token>, StoreError> {
        Ok(self
            .lock()
            .rows
            .values()
            .find(|t| t.user_id == user_id && t.name == purpose)
            .cloned())
    }

    async fn find_by_token(&self, value: &str) -> Result<Option<Token>, StoreError> {
        Ok(self
            .lock()
            .rows
            .values()
            .find(|t| t.token == value)
            .cloned())
    }

    async fn upsert(&self, token: NewToken) -> Result<Token, StoreError> {
        let mut table = self.lock();
        let now = Utc::now();

        if let Some(stored) = table
            .rows
            .values_mut()
            .find(|t| t.user_id == token.user_id && t.name == token.name)
        {
            stored.token = token.token;
            stored.expired_at = token.expired_at;
            stored.updated_at = now;
            return Ok(stored.clone());
        }

        let id = table.next_id();
        let stored = Token {
            id,
            user_id: token.user_id,
            name: token.name,
            token: token.token,
            created_at: now,
            updated_at: now,
            expired_at: token.expired_at,
        };
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }
}

#[derive(Debug, Default)]
struct RoleTables {
    roles: Vec<Role>,
    assignments: BTreeSet<(i64, i64)>,
}

#[derive(Debug)]
pub struct MemoryRoleResolver {
    tables: Mutex<RoleTables>,
}

impl MemoryRoleResolver {
    /// Resolver holding the roles the initial migration seeds.
    pub fn seeded() -> Self {
        Self::with_roles(&system_roles::all())
    }

    pub fn with_roles(names: &[&str]) -> Self {
        let now = Utc::now();
        let roles = names
            .iter()
            .zip(1..)
            .map(|(name, id)| Role {
                id,
                name: name.to_string(),
                description: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        Self {
            tables: Mutex::new(RoleTables {
                roles,
                assignments: BTreeSet::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RoleTables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RoleResolver for MemoryRoleResolver {
    async fn find_by_name(&self, name: &str) -> Result<Role, StoreError> {
        self.lock()
            .roles
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_all_for_user(&self, user_id: i64) -> Result<Vec<Role>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .roles
            .iter()
            .filter(|r| tables.assignments.contains(&(user_id, r.id)))
            .cloned()
            .collect())
    }

    async fn assign(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        let mut tables = self.lock();
        if !tables.roles.iter().any(|r| r.id == role_id) {
            return Err(StoreError::NotFound);
        }
        tables.assignments.insert((user_id, role_id));
        Ok(())
    }

    async fn unassign(&self, user_id: i64, role_id: i64) -> Result<(), StoreError> {
        self.lock().assignments.remove(&(user_id, role_id));
        Ok(())
    }
}
