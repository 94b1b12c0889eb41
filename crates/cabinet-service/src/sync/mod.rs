//! The sync orchestrator and its building blocks.
//!
//! Every mutating operation moves through `Validating`, `RemoteMutating`
//! (blob store) and `LocalMutating` (catalog) in that order. A failure
//! stops the sequence. When the blob store step already happened, a
//! compensating blob store action tries to undo it; if that fails too the
//! caller gets `PartialFailure` and a reconciliation record is logged.

pub mod compensation;
pub mod file;
pub mod folder;
pub mod orchestrator;
pub mod state;

pub use file::UploadRequest;
pub use orchestrator::SyncOrchestrator;
pub use state::{SyncOp, SyncStage};
