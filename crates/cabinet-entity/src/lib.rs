//! # cabinet-entity
//!
//! Catalog row models for Cabinet. Every struct in this crate represents a
//! database table row or the data needed to insert one. Row types derive
//! `sqlx::FromRow`.

pub mod file;
pub mod folder;
pub mod user;
