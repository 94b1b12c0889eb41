//! # cabinet-service
//!
//! Business logic for Cabinet. The [`SyncOrchestrator`] runs every
//! mutating operation as validate, then blob store, then catalog, with a
//! compensating blob store action when the catalog step fails.
//!
//! Services follow constructor injection: stores arrive as `Arc<dyn ...>`
//! handles so tests can swap in the in-memory implementations.

pub mod context;
pub mod deadline;
pub mod path;
pub mod reconcile;
pub mod sync;
pub mod user;

pub use context::RequestContext;
pub use deadline::Deadlines;
pub use path::{ExistenceGuard, PathResolver, PathRole};
pub use reconcile::{DanglingRow, ReconcileReport, ReconcileService, RowKind};
pub use sync::{SyncOrchestrator, UploadRequest};
pub use user::{AdminUserService, AuthService, DeletedUser, LoginOutcome};
