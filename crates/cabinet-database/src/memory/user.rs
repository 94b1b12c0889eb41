//! In-memory [`UserStore`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;
use cabinet_core::types::UserId;
use cabinet_entity::user::{CreateUser, User};

use crate::store::UserStore;

/// User table kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.users();
        if users
            .iter()
            .any(|u| u.username == data.username || u.email == data.email)
        {
            return Err(AppError::already_exists(
                "Username or email already registered",
            ));
        }
        let user = User {
            id: UserId::new(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users().iter().find(|u| u.username == username).cloned())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users().clone())
    }

    async fn delete_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let mut users = self.users();
        let position = users.iter().position(|u| u.username == username);
        Ok(position.map(|i| users.remove(i)))
    }
}

#[cfg(test)]
mod tests {
    use cabinet_core::error::ErrorKind;

    use super::*;

    fn new_user(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_username_and_email_are_unique() {
        let store = MemoryUserStore::new();
        store.create(&new_user("alice", "a@example.com")).await.expect("create");

        let err = store
            .create(&new_user("alice", "other@example.com"))
            .await
            .expect_err("username taken");
        assert_eq!(err.kind, ErrorKind::AlreadyExists);
        assert!(store.create(&new_user("bob", "a@example.com")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_row() {
        let store = MemoryUserStore::new();
        store.create(&new_user("alice", "a@example.com")).await.expect("create");

        let removed = store.delete_by_username("alice").await.expect("delete");
        assert_eq!(removed.map(|u| u.username), Some("alice".to_string()));
        assert!(store.delete_by_username("alice").await.expect("again").is_none());
        assert!(store.list().await.expect("list").is_empty());
    }
}
