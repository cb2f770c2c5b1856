//! Chat controller.
//!
//! Owns the conversation list and the active-conversation pointer, renders
//! streamed output, and persists every completed turn. Implements
//! [`ChatEventSink`] so the request executor can drive it directly.
//!
//! Rendering is gated on the active conversation: chunks for a request
//! whose conversation is no longer displayed are not rendered, but the
//! completed text is still recorded into storage.

use crate::output::theme::Theme;
use nanochat_application::{ChatEventSink, Completion, ConversationStore, ThemeStore};
use nanochat_domain::{Conversation, PromptRequest, RequestMetadata, StreamChunk};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const GENERIC_FAILURE: &str = "Something went wrong while generating a response.";

pub struct ChatController {
    conversations: Mutex<Vec<Conversation>>,
    active_id: Mutex<Option<String>>,
    store: Arc<dyn ConversationStore>,
    theme_store: Arc<dyn ThemeStore>,
    theme: Mutex<Theme>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ChatController {
    pub fn new(
        store: Arc<dyn ConversationStore>,
        theme_store: Arc<dyn ThemeStore>,
        default_theme: Theme,
    ) -> Self {
        let conversations = store.load();
        let theme = theme_store
            .theme()
            .map(|name| Theme::from_name(&name))
            .unwrap_or(default_theme);
        Self {
            conversations: Mutex::new(conversations),
            active_id: Mutex::new(None),
            store,
            theme_store,
            theme: Mutex::new(theme),
            out: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// Redirect rendering, used by tests to capture output.
    pub fn with_writer(self, out: Box<dyn Write + Send>) -> Self {
        *self.out.lock().unwrap_or_else(|e| e.into_inner()) = out;
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme.lock().map(|t| *t).unwrap_or_default()
    }

    /// Flip the theme and persist the preference.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.theme().toggled();
        if let Ok(mut slot) = self.theme.lock() {
            *slot = next;
        }
        if let Err(e) = self.theme_store.set_theme(next.name()) {
            warn!("theme preference not saved: {e}");
        }
        next
    }

    pub fn active_id(&self) -> Option<String> {
        self.active_id.lock().ok().and_then(|id| id.clone())
    }

    /// Titles of all conversations, oldest first.
    pub fn list(&self) -> Vec<(String, String)> {
        self.conversations
            .lock()
            .map(|all| {
                all.iter()
                    .map(|c| (c.id().to_string(), c.title().to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Make the conversation at `index` (as shown by `list`) active.
    pub fn switch_to(&self, index: usize) -> Option<String> {
        let id = self
            .conversations
            .lock()
            .ok()?
            .get(index)
            .map(|c| c.id().to_string())?;
        if let Ok(mut slot) = self.active_id.lock() {
            *slot = Some(id.clone());
        }
        Some(id)
    }

    /// Start a fresh conversation on the next turn.
    pub fn start_new(&self) {
        if let Ok(mut slot) = self.active_id.lock() {
            *slot = None;
        }
    }

    /// Remove all conversations (bulk clear).
    pub fn clear_all(&self) {
        if let Ok(mut all) = self.conversations.lock() {
            all.clear();
        }
        if let Ok(mut slot) = self.active_id.lock() {
            *slot = None;
        }
        if let Err(e) = self.store.clear() {
            warn!("conversation clear not persisted: {e}");
        }
    }

    /// Record a user turn and build the request for it.
    ///
    /// Creates a new conversation from the first message when none is
    /// active; the conversation id travels in the request metadata so
    /// streamed output can be matched back after a switch.
    pub fn begin_turn(&self, text: &str) -> PromptRequest {
        let id = match self.active_id() {
            Some(id) => {
                if let Ok(mut all) = self.conversations.lock() {
                    if let Some(conv) = all.iter_mut().find(|c| c.id() == id) {
                        conv.add_user_message(text);
                    }
                }
                id
            }
            None => {
                let conv = Conversation::from_first_message(text);
                let id = conv.id().to_string();
                if let Ok(mut all) = self.conversations.lock() {
                    all.push(conv);
                }
                if let Ok(mut slot) = self.active_id.lock() {
                    *slot = Some(id.clone());
                }
                id
            }
        };
        self.persist();
        PromptRequest::new(text, "ask").with_metadata(RequestMetadata::for_conversation(&id))
    }

    fn persist(&self) {
        let snapshot = self
            .conversations
            .lock()
            .map(|all| all.clone())
            .unwrap_or_default();
        if let Err(e) = self.store.save(&snapshot) {
            warn!("conversations not persisted: {e}");
        }
    }

    fn is_active(&self, metadata: &RequestMetadata) -> bool {
        match (&metadata.conversation_id, self.active_id()) {
            (Some(request_id), Some(active_id)) => *request_id == active_id,
            _ => false,
        }
    }

    fn render(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }
}

impl ChatEventSink for ChatController {
    fn on_streaming(&self, chunk: StreamChunk) {
        // Output for a backgrounded conversation accumulates in the
        // executor; only the displayed conversation renders live.
        if !self.is_active(&chunk.metadata) {
            debug!("suppressing chunk for inactive conversation");
            return;
        }
        if chunk.start {
            self.render(&format!("\n{}", self.theme().assistant_prefix()));
        } else {
            self.render(&chunk.text);
        }
    }

    fn on_complete(&self, completion: Completion) {
        if let Some(id) = &completion.metadata.conversation_id {
            if let Ok(mut all) = self.conversations.lock() {
                if let Some(conv) = all.iter_mut().find(|c| c.id() == *id) {
                    conv.add_assistant_message(&completion.text);
                }
            }
            self.persist();
        }
        if self.is_active(&completion.metadata) {
            self.render("\n");
        }
    }

    fn on_error(&self, message: &str, action: &str, metadata: &RequestMetadata) {
        warn!(action, "request failed: {message}");
        if let Some(id) = &metadata.conversation_id {
            if let Ok(mut all) = self.conversations.lock() {
                if let Some(conv) = all.iter_mut().find(|c| c.id() == *id) {
                    conv.add_assistant_message(GENERIC_FAILURE);
                }
            }
            self.persist();
        }
        if self.is_active(metadata) {
            let line = format!("\n{}\n", self.theme().error(GENERIC_FAILURE));
            self.render(&line);
        }
    }

    fn on_status(&self, message: &str) {
        let line = format!("{}\n", self.theme().status(message));
        self.render(&line);
    }
}
