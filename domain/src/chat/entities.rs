//! Conversation domain entities

use crate::util::truncate_str;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum byte length of a derived conversation title.
const TITLE_MAX_BYTES: usize = 40;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted conversation (Entity)
///
/// Created on the first user message; mutated only by appending messages.
/// Conversations are never deleted individually, only bulk-cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: String,
    title: String,
    messages: Vec<ChatMessage>,
    created_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a conversation from the first user message.
    ///
    /// The title is the first message truncated to a display-friendly length.
    pub fn from_first_message(content: impl Into<String>) -> Self {
        let content = content.into();
        let title = truncate_str(content.trim(), TITLE_MAX_BYTES).to_string();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            messages: vec![ChatMessage::user(content)],
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }
}
