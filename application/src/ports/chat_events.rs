//! Chat event sink port
//!
//! The consumer of a request's lifecycle implements this interface: one
//! start/delta stream of [`StreamChunk`]s, at most one completion, at most
//! one error, plus out-of-band status text. Implementations live in the
//! presentation layer.

use nanochat_domain::{RequestMetadata, StreamChunk};

/// The final result of a successfully completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Full response text.
    pub text: String,
    /// Action tag of the originating request.
    pub action: String,
    /// Metadata of the originating request.
    pub metadata: RequestMetadata,
    /// The original input text.
    pub input: String,
}

/// Callbacks observed by the UI during request processing
pub trait ChatEventSink: Send + Sync {
    /// Called for the start notification and each streamed chunk.
    fn on_streaming(&self, chunk: StreamChunk);

    /// Called once when a request completes successfully.
    fn on_complete(&self, completion: Completion);

    /// Called at most once when a request fails with an unexpected error.
    fn on_error(&self, message: &str, action: &str, metadata: &RequestMetadata);

    /// Called with human-readable status text (capability state, hints).
    fn on_status(&self, message: &str);
}

/// No-op event sink for when nothing observes the request
pub struct NoChatEvents;

impl ChatEventSink for NoChatEvents {
    fn on_streaming(&self, _chunk: StreamChunk) {}
    fn on_complete(&self, _completion: Completion) {}
    fn on_error(&self, _message: &str, _action: &str, _metadata: &RequestMetadata) {}
    fn on_status(&self, _message: &str) {}
}
