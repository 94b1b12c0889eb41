//! Core traits defined in `cabinet-core` and implemented by other crates.

pub mod blob;

pub use blob::BlobStore;
