//! Host adapter error types.

use nanochat_application::ProviderError;
use thiserror::Error;

/// Errors from talking to the model host daemon.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Transport error: {0}")]
    Transport(String),

    /// The host answered with a structured error payload.
    #[error("Host API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

/// Error codes the host uses for a lost session.
pub(crate) const CODE_SESSION_DESTROYED: &str = "session_destroyed";
pub(crate) const CODE_QUOTA_EXCEEDED: &str = "quota_exceeded";

impl From<HostError> for ProviderError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::Api { code, message } if code == CODE_SESSION_DESTROYED => {
                ProviderError::SessionDestroyed(message)
            }
            HostError::Api { code, message } if code == CODE_QUOTA_EXCEEDED => {
                ProviderError::QuotaExceeded(message)
            }
            HostError::Transport(m) => ProviderError::Transport(m),
            other => ProviderError::RequestFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_destroyed_code_maps_to_expired_error() {
        let e: ProviderError = HostError::Api {
            code: "session_destroyed".into(),
            message: "handle is gone".into(),
        }
        .into();
        assert!(e.is_session_expired());
        assert!(matches!(e, ProviderError::SessionDestroyed(_)));
    }

    #[test]
    fn quota_code_maps_to_expired_error() {
        let e: ProviderError = HostError::Api {
            code: "quota_exceeded".into(),
            message: "budget spent".into(),
        }
        .into();
        assert!(e.is_session_expired());
    }

    #[test]
    fn other_codes_map_to_request_failed() {
        let e: ProviderError = HostError::Api {
            code: "rate_limited".into(),
            message: "slow down".into(),
        }
        .into();
        assert!(!e.is_session_expired());
        assert!(matches!(e, ProviderError::RequestFailed(_)));
    }

    #[test]
    fn transport_errors_stay_transport() {
        let e: ProviderError = HostError::Transport("connection refused".into()).into();
        assert!(matches!(e, ProviderError::Transport(_)));
    }
}
