//! # cabinet-database
//!
//! Catalog persistence for Cabinet. Defines the [`CatalogStore`] and
//! [`UserStore`] traits, their PostgreSQL implementations on top of sqlx,
//! and in-memory implementations used by tests and the `memory` backend.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::{MemoryCatalog, MemoryUserStore};
pub use repositories::{PgCatalogStore, UserRepository};
pub use store::{CatalogStore, UserStore};
