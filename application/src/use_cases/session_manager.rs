//! Session manager use case.
//!
//! Owns creation, reuse, and recreation of the single model session. At most
//! one session is live at a time; it is destroyed and recreated on fatal
//! errors (quota exceeded, destroyed on the host side) or explicit teardown.

use crate::config::GenerationParams;
use crate::ports::model_provider::{ModelProvider, ModelSession, ProviderError};
use nanochat_domain::{AvailabilityStatus, ChatError, ChatMessage};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of [`SessionManager::initialize`], returned as a value so the UI
/// can render a status message instead of handling an exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub success: bool,
    pub status: AvailabilityStatus,
    pub error: Option<String>,
}

impl InitOutcome {
    fn ready() -> Self {
        Self {
            success: true,
            status: AvailabilityStatus::Ready,
            error: None,
        }
    }

    fn failure(status: AvailabilityStatus, error: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            error: Some(error.into()),
        }
    }

    /// Convert a failed outcome into the matching [`ChatError`].
    ///
    /// For callers that propagate instead of rendering a status line.
    /// Returns `None` on success.
    pub fn into_error(self) -> Option<ChatError> {
        if self.success {
            return None;
        }
        let reason = self.error.unwrap_or_default();
        Some(match self.status {
            AvailabilityStatus::Unsupported => ChatError::UnsupportedHost(reason),
            status => ChatError::CapabilityUnavailable { status, reason },
        })
    }
}

/// Owner of the single model session.
pub struct SessionManager {
    provider: Arc<dyn ModelProvider>,
    params: GenerationParams,
    session: Option<Box<dyn ModelSession>>,
    initialized: bool,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn ModelProvider>, params: GenerationParams) -> Self {
        Self {
            provider,
            params,
            session: None,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&dyn ModelSession> {
        self.session.as_deref()
    }

    /// Probe availability and create the session.
    ///
    /// Idempotent: returns success without recreating when a session is
    /// already live. Creation failures come back as values and are not
    /// retried here.
    pub async fn initialize(&mut self) -> InitOutcome {
        if self.session.is_some() {
            debug!("session already live, skipping initialization");
            return InitOutcome::ready();
        }

        let report = self.provider.check_availability().await;
        if !report.is_available() {
            warn!(status = %report.status, "model not available: {}", report.reason);
            return InitOutcome::failure(report.status, report.reason);
        }

        match self.create_session(Vec::new()).await {
            Ok(()) => {
                self.initialized = true;
                info!("model session initialized");
                InitOutcome::ready()
            }
            Err(e) => {
                warn!("session creation failed: {e}");
                InitOutcome::failure(AvailabilityStatus::Error, e.to_string())
            }
        }
    }

    /// Replace the session, destroying any existing one first.
    ///
    /// `initial_prompts` seeds the new session with prior turns when a
    /// session is recreated mid-conversation.
    pub async fn create_session(
        &mut self,
        initial_prompts: Vec<ChatMessage>,
    ) -> Result<(), ProviderError> {
        if let Some(old) = self.session.take() {
            // Best-effort; hosts without a destroy call make this a no-op
            old.destroy().await;
        }

        let params = self.params.to_session_params(initial_prompts);
        debug!(
            temperature = params.temperature,
            top_k = params.top_k,
            seeded_turns = params.initial_prompts.len(),
            "creating model session"
        );
        let session = self.provider.create_session(&params).await?;
        self.session = Some(session);
        Ok(())
    }

    /// Best-effort teardown. Safe to call when no session exists.
    pub async fn destroy(&mut self) {
        if let Some(old) = self.session.take() {
            old.destroy().await;
            info!("model session destroyed");
        }
        self.initialized = false;
    }
}
