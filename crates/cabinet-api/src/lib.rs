//! # cabinet-api
//!
//! HTTP API layer for Cabinet built on Axum.
//!
//! Provides the JSON endpoints, middleware (logging, CORS, body limit,
//! timeout), the bearer-token extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
