//! Generation parameters applied to every model session.

use nanochat_domain::{ChatMessage, SessionParams};
use serde::{Deserialize, Serialize};

/// The fixed parameter set used for session creation.
///
/// Values come from configuration at startup and do not change for the
/// lifetime of the client; sessions created mid-run (including recreations
/// after expiry) all share them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    /// BCP 47 tag for the expected output language, if any.
    pub expected_language: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            expected_language: None,
        }
    }
}

impl GenerationParams {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Build session creation parameters, optionally seeded with prior turns.
    pub fn to_session_params(&self, initial_prompts: Vec<ChatMessage>) -> SessionParams {
        let mut params =
            SessionParams::new(self.temperature, self.top_k).with_initial_prompts(initial_prompts);
        params.expected_language = self.expected_language.clone();
        params
    }
}
