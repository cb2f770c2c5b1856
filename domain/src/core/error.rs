//! Domain error types

use crate::session::availability::AvailabilityStatus;
use thiserror::Error;

/// Errors surfaced by the chat request/session lifecycle.
///
/// Capability and session-lifecycle failures are returned as values so the
/// UI can render a status message; only request-level unexpected errors are
/// propagated to the caller after the error callback has fired. Aborts are
/// not failures — they carry whatever partial text existed.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Host environment is not supported: {0}")]
    UnsupportedHost(String),

    #[error("Model is not available ({status}): {reason}")]
    CapabilityUnavailable {
        status: AvailabilityStatus,
        reason: String,
    },

    #[error("Failed to create model session: {0}")]
    SessionCreationFailed(String),

    #[error("A request is already being processed")]
    RequestAlreadyActive,

    #[error("No model session available")]
    SessionUnavailable,

    #[error("Request aborted")]
    Aborted,

    #[error("Model session expired: {0}")]
    SessionExpired(String),

    #[error("Request failed: {0}")]
    Unknown(String),
}

impl ChatError {
    /// Check if this error represents a cancelled request.
    pub fn is_aborted(&self) -> bool {
        matches!(self, ChatError::Aborted)
    }

    /// Check if this error means the underlying session was lost
    /// (destroyed or quota-exceeded) and can be recreated.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ChatError::SessionExpired(_))
    }
}
