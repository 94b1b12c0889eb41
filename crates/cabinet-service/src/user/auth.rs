//! Registration and login.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use cabinet_auth::jwt::IssuedToken;
use cabinet_auth::{JwtEncoder, PasswordHasher, PasswordValidator};
use cabinet_core::error::AppError;
use cabinet_core::result::AppResult;
use cabinet_database::UserStore;
use cabinet_entity::user::{CreateUser, User};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    /// The authenticated user.
    pub user: User,
    /// Access token whose subject is the username.
    pub token: IssuedToken,
}

/// Handles registration and password authentication.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// User store.
    users: Arc<dyn UserStore>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Registration policy.
    validator: Arc<PasswordValidator>,
    /// Token issuer.
    encoder: Arc<JwtEncoder>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            users,
            hasher,
            validator,
            encoder,
        }
    }

    /// Register a new user. A taken username or email is `AlreadyExists`.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        let username = username.trim();
        let email = email.trim();
        self.validator.validate_username(username)?;
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email format"));
        }
        self.validator.validate(password)?;

        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Check a username and password and issue an access token.
    ///
    /// An unknown user and a wrong password fail with the same message.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            warn!(username, "Login for unknown user");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            warn!(username = %user.username, "Login with wrong password");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let token = self.encoder.issue(&user.username)?;
        info!(username = %user.username, "User logged in");
        Ok(LoginOutcome { user, token })
    }

    /// Look up the user behind a session identity.
    pub async fn current_user(&self, username: &str) -> AppResult<User> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::authentication("User no longer exists"))
    }
}
