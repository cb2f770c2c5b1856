//! Model provider port
//!
//! Defines the interface for talking to the on-device language-model host.
//! Which wire dialect the host speaks is resolved once when the concrete
//! adapter is constructed; nothing above this port ever branches on it.

use async_trait::async_trait;
use nanochat_domain::{AvailabilityReport, SessionParams};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during model host operations
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Session was destroyed: {0}")]
    SessionDestroyed(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Model not available: {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl ProviderError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProviderError::Cancelled)
    }

    /// Check if this error means the session was lost on the host side
    /// (destroyed or quota-exceeded) and should be recreated.
    pub fn is_session_expired(&self) -> bool {
        matches!(
            self,
            ProviderError::SessionDestroyed(_) | ProviderError::QuotaExceeded(_)
        )
    }
}

/// Provider of model sessions
///
/// One live adapter per process; constructed after the host API shape has
/// been detected.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Probe the host for model availability.
    ///
    /// Read-only, never retried here. Probe failures fold into the report
    /// rather than erroring, so the caller always gets a renderable status.
    async fn check_availability(&self) -> AvailabilityReport;

    /// Create a new model session with the given parameters.
    async fn create_session(
        &self,
        params: &SessionParams,
    ) -> Result<Box<dyn ModelSession>, ProviderError>;
}

/// An event in a streaming model response.
#[derive(Debug)]
pub enum SessionEvent {
    /// A text chunk from the model.
    Chunk(String),
    /// The stream finished normally.
    Done,
    /// The stream failed; cancellation arrives as `Failed(Cancelled)`.
    Failed(ProviderError),
}

/// Handle for receiving streaming events from a model session.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<SessionEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<SessionEvent>) -> Self {
        Self { receiver }
    }
}

/// An active model session
#[async_trait]
pub trait ModelSession: Send + Sync {
    /// Whether this session can deliver output incrementally.
    fn supports_streaming(&self) -> bool {
        false
    }

    /// Send a prompt and wait for the complete response.
    ///
    /// Implementations observe the token cooperatively and surface
    /// cancellation as [`ProviderError::Cancelled`].
    async fn prompt(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError>;

    /// Send a prompt and stream the response.
    ///
    /// Default implementation performs the blocking call and wraps the
    /// result in a single chunk, so blocking-only sessions work unchanged.
    async fn prompt_streaming(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<StreamHandle, ProviderError> {
        let result = self.prompt(text, cancel).await?;
        let (tx, rx) = mpsc::channel(2);
        let _ = tx.send(SessionEvent::Chunk(result)).await;
        let _ = tx.send(SessionEvent::Done).await;
        Ok(StreamHandle::new(rx))
    }

    /// Best-effort teardown. Hosts without a destroy call make this a no-op.
    async fn destroy(&self) {}
}
