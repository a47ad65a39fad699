//! Request context carrying the authenticated session.

use chrono::{DateTime, Utc};

use attendance_auth::ApplicationSession;

/// Context for the current authenticated request.
///
/// Built by the API layer from the session cookie and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The caller's application session.
    pub session: ApplicationSession,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(session: ApplicationSession) -> Self {
        Self {
            session,
            request_time: Utc::now(),
        }
    }

    /// The caller's user name.
    pub fn user_name(&self) -> &str {
        &self.session.user_name
    }
}
