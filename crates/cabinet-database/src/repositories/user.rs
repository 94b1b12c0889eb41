//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use cabinet_core::result::AppResult;
use cabinet_core::types::UserId;
use cabinet_entity::user::{CreateUser, User};

use super::{map_error, map_write_error};
use crate::store::UserStore;

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(UserId::new())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, "Failed to create user", || {
                "Username or email already registered".to_string()
            })
        })
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to find user by username"))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to list users"))
    }

    async fn delete_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("DELETE FROM users WHERE username = $1 RETURNING *")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_error(e, "Failed to delete user"))
    }
}
