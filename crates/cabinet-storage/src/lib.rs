//! # cabinet-storage
//!
//! Blob store implementations for Cabinet: S3-compatible object storage
//! (feature `s3`), a local filesystem directory, and process memory.

pub mod factory;
pub mod providers;
pub mod tag;

pub use factory::build_blob_store;
pub use providers::local::LocalBlobStore;
pub use providers::memory::{BlobOp, MemoryBlobStore};
#[cfg(feature = "s3")]
pub use providers::s3::S3BlobStore;
