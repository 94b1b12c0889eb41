//! Admin handlers. Every route requires an [`AdminUser`](crate::extractors::AdminUser).

pub mod audit;
pub mod users;
