//! Local storage ports
//!
//! A flat local store persists the full conversation list and a single
//! theme preference string. There is no schema versioning; corrupt data is
//! treated as empty on read, so `load` is infallible by contract.

use nanochat_domain::Conversation;
use std::sync::Mutex;
use thiserror::Error;

/// Errors that can occur when writing to local storage
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Persistence for the conversation list
pub trait ConversationStore: Send + Sync {
    /// Load all conversations. Corrupt or missing data reads as empty.
    fn load(&self) -> Vec<Conversation>;

    /// Persist the full conversation list.
    fn save(&self, conversations: &[Conversation]) -> Result<(), StoreError>;

    /// Remove all conversations (bulk clear; there is no per-item delete).
    fn clear(&self) -> Result<(), StoreError>;
}

/// Persistence for the theme preference
pub trait ThemeStore: Send + Sync {
    fn theme(&self) -> Option<String>;

    fn set_theme(&self, theme: &str) -> Result<(), StoreError>;
}

/// In-memory store, used in tests and when no storage directory exists.
#[derive(Default)]
pub struct MemoryStore {
    conversations: Mutex<Vec<Conversation>>,
    theme: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for MemoryStore {
    fn load(&self) -> Vec<Conversation> {
        self.conversations.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn save(&self, conversations: &[Conversation]) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.conversations.lock() {
            *slot = conversations.to_vec();
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.conversations.lock() {
            slot.clear();
        }
        Ok(())
    }
}

impl ThemeStore for MemoryStore {
    fn theme(&self) -> Option<String> {
        self.theme.lock().ok().and_then(|t| t.clone())
    }

    fn set_theme(&self, theme: &str) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.theme.lock() {
            *slot = Some(theme.to_string());
        }
        Ok(())
    }
}
