//! Name-chain resolution and pre-flight existence checks.

pub mod guard;
pub mod resolver;

pub use guard::{ExistenceGuard, PathRole};
pub use resolver::PathResolver;
