//! PostgreSQL repository implementations.

pub mod catalog;
pub mod file;
pub mod folder;
pub mod user;

pub use catalog::PgCatalogStore;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use user::UserRepository;

use cabinet_core::error::{AppError, ErrorKind};

/// Map a sqlx error from an INSERT or UPDATE, turning unique-constraint
/// violations into `AlreadyExists` with the given message.
pub(crate) fn map_write_error(
    err: sqlx::Error,
    context: &'static str,
    conflict: impl FnOnce() -> String,
) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::already_exists(conflict())
        }
        _ => AppError::with_source(ErrorKind::Database, context, err),
    }
}

/// Map a sqlx error from a read or DELETE.
pub(crate) fn map_error(err: sqlx::Error, context: &'static str) -> AppError {
    AppError::with_source(ErrorKind::Database, context, err)
}
