//! # cabinet-auth
//!
//! Credential handling for Cabinet.
//!
//! ## Modules
//!
//! - `jwt`: HS256 access tokens whose subject is the username
//! - `password`: Argon2id password hashing and registration policy

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
