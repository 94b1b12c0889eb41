//! HTTP request handlers, one module per area.

pub mod admin;
pub mod auth;
pub mod file;
pub mod folder;
pub mod health;
pub mod object;
