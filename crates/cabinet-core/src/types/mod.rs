//! Core type definitions used across the Cabinet workspace.

pub mod id;
pub mod key;
pub mod path;

pub use id::*;
pub use key::ObjectKey;
pub use path::{FolderPath, validate_name};
