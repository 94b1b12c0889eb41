//! Request context carrying the authenticated identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// The session identity is the username. It is the owner of everything the
/// request touches and the first segment of every blob key it builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated username.
    pub username: String,
    /// Correlation id for log lines of this request.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            request_id: Uuid::new_v4(),
            request_time: Utc::now(),
        }
    }

    /// The owner every lookup is scoped to.
    pub fn owner(&self) -> &str {
        &self.username
    }
}
