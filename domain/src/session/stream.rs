//! Streaming chunks delivered to the chat UI.
//!
//! [`StreamChunk`] is the consumer-facing unit of incremental model output.
//! For every request the consumer observes exactly one start chunk (empty
//! text, `start: true`), then zero or more delta chunks in arrival order.
//! Each chunk carries the request's action, metadata, and original input so
//! the UI can route it without extra bookkeeping.

use crate::session::request::{PromptRequest, RequestMetadata};

/// An incremental unit of model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    /// Text of this chunk. Empty for the start notification.
    pub text: String,
    /// True only for the start notification preceding all deltas.
    pub start: bool,
    /// Action tag of the originating request.
    pub action: String,
    /// Metadata of the originating request.
    pub metadata: RequestMetadata,
    /// The original input text of the request.
    pub input: String,
}

impl StreamChunk {
    /// The start notification for a request.
    pub fn start_of(request: &PromptRequest) -> Self {
        Self {
            text: String::new(),
            start: true,
            action: request.action.clone(),
            metadata: request.metadata.clone(),
            input: request.text.clone(),
        }
    }

    /// A delta chunk continuing a request's stream.
    pub fn delta_of(request: &PromptRequest, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: false,
            action: request.action.clone(),
            metadata: request.metadata.clone(),
            input: request.text.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PromptRequest {
        PromptRequest::new("tell me a joke", "ask")
            .with_metadata(RequestMetadata::for_conversation("conv-7"))
    }

    #[test]
    fn start_chunk_is_empty_and_flagged() {
        let chunk = StreamChunk::start_of(&request());
        assert!(chunk.start);
        assert!(chunk.is_empty());
        assert_eq!(chunk.input, "tell me a joke");
        assert_eq!(chunk.metadata.conversation_id.as_deref(), Some("conv-7"));
    }

    #[test]
    fn delta_chunk_carries_text() {
        let chunk = StreamChunk::delta_of(&request(), "Why did");
        assert!(!chunk.start);
        assert_eq!(chunk.text, "Why did");
        assert_eq!(chunk.action, "ask");
    }
}
