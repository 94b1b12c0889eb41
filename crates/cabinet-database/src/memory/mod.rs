//! In-memory stores.
//!
//! Used by tests and by the `memory` catalog backend. They enforce the
//! same uniqueness rules as the PostgreSQL schema so concurrent inserts
//! behave the same way.

pub mod catalog;
pub mod user;

pub use catalog::MemoryCatalog;
pub use user::MemoryUserStore;
