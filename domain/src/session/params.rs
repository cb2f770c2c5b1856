//! Model session creation parameters.

use crate::chat::entities::ChatMessage;

/// Parameters for creating a model session.
///
/// The chat client uses one fixed parameter set per session; only the
/// initial prompts vary (they seed a recreated session with prior turns).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParams {
    pub temperature: f32,
    pub top_k: u32,
    /// Prior turns to seed the session with, oldest first.
    pub initial_prompts: Vec<ChatMessage>,
    /// BCP 47 tag for the expected output language, if any.
    pub expected_language: Option<String>,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            initial_prompts: Vec::new(),
            expected_language: None,
        }
    }
}

impl SessionParams {
    pub fn new(temperature: f32, top_k: u32) -> Self {
        Self {
            temperature,
            top_k,
            ..Self::default()
        }
    }

    pub fn with_initial_prompts(mut self, prompts: Vec<ChatMessage>) -> Self {
        self.initial_prompts = prompts;
        self
    }

    pub fn with_expected_language(mut self, language: impl Into<String>) -> Self {
        self.expected_language = Some(language.into());
        self
    }
}
