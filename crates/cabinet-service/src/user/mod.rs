//! Registration, login, and admin user management.

pub mod admin;
pub mod auth;

pub use admin::{AdminUserService, DeletedUser};
pub use auth::{AuthService, LoginOutcome};
