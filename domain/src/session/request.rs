//! Request value objects.
//!
//! A [`PromptRequest`] is one in-flight prompt: the input text, a free-form
//! action tag, and [`RequestMetadata`] carrying arbitrary key-value context.
//! The conversation id in the metadata is what lets the UI decide whether a
//! stream chunk belongs to the currently displayed conversation.

use std::collections::HashMap;

/// Arbitrary key-value context attached to a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Conversation this request belongs to, if any.
    pub conversation_id: Option<String>,
    pub extra: HashMap<String, String>,
}

impl RequestMetadata {
    pub fn for_conversation(id: impl Into<String>) -> Self {
        Self {
            conversation_id: Some(id.into()),
            extra: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// One prompt to be driven through the model session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub text: String,
    /// Free-form label for what triggered this request, e.g. `"ask"`.
    pub action: String,
    pub metadata: RequestMetadata,
}

impl PromptRequest {
    pub fn new(text: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: action.into(),
            metadata: RequestMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: RequestMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}
