//! User lookup backends.
//!
//! `authorize` only needs "find a user by email", so the lookup sits behind
//! the [`UserStore`] trait. [`PgUserStore`] is the production backend;
//! [`InMemoryUserStore`] serves tests and local demos.

use async_trait::async_trait;
use dashmap::DashMap;
use sqlx::PgPool;

use super::{AuthError, queries};
use crate::models::auth::User;

/// Source of user records keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch the user with exactly this email, if any.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Whether the backend is reachable.
    async fn ping(&self) -> bool {
        true
    }
}

/// PostgreSQL-backed store reading the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        queries::get_user(&self.pool, email).await
    }

    async fn ping(&self) -> bool {
        queries::ping(&self.pool).await
    }
}

/// In-memory store keyed by exact email.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the user stored under `user.email`.
    pub fn insert(&self, user: User) {
        self.users.insert(user.email.clone(), user);
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<User> for InMemoryUserStore {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let store = Self::new();
        for user in iter {
            store.insert(user);
        }
        store
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "User".into(),
            email: email.into(),
            password: String::new(),
        }
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let store: InMemoryUserStore = [user("user@nextmail.com")].into_iter().collect();

        assert!(store.find_by_email("user@nextmail.com").await.unwrap().is_some());
        assert!(store.find_by_email("USER@nextmail.com").await.unwrap().is_none());
        assert!(store.find_by_email("user@nextmail.co").await.unwrap().is_none());
        assert!(store.ping().await);
    }

    #[test]
    fn insert_replaces_same_email() {
        let store = InMemoryUserStore::new();
        assert!(store.is_empty());
        store.insert(user("a@example.com"));
        store.insert(user("a@example.com"));
        store.insert(user("b@example.com"));
        assert_eq!(store.len(), 2);
    }
}
