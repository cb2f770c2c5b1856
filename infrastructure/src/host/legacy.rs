//! Provider for hosts that only expose the older `availability` surface.
//!
//! The legacy dialect has no streaming and no session deletion; prompts are
//! blocking and teardown is a no-op. Everything above the port still works
//! unchanged through the default streaming fallback.

use crate::host::client::HostClient;
use crate::host::probe::map_status;
use crate::host::protocol::{
    AvailabilityResponse, CreateSessionBody, PromptBody, PromptResponse, SessionCreated,
};
use async_trait::async_trait;
use nanochat_application::{ModelProvider, ModelSession, ProviderError};
use nanochat_domain::{AvailabilityReport, SessionParams};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct LegacyHostProvider {
    client: Arc<HostClient>,
}

impl LegacyHostProvider {
    pub fn new(client: Arc<HostClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelProvider for LegacyHostProvider {
    async fn check_availability(&self) -> AvailabilityReport {
        match self
            .client
            .get_json::<AvailabilityResponse>("/model/availability")
            .await
        {
            Ok(response) => map_status(&response.available),
            Err(e) => AvailabilityReport::error(format!("availability probe failed: {e}")),
        }
    }

    async fn create_session(
        &self,
        params: &SessionParams,
    ) -> Result<Box<dyn ModelSession>, ProviderError> {
        let created: SessionCreated = self
            .client
            .post_json("/model/session", &CreateSessionBody::from(params))
            .await?;
        debug!(session_id = %created.session_id, "created legacy model session");
        Ok(Box::new(LegacySession {
            client: self.client.clone(),
            session_id: created.session_id,
        }))
    }
}

pub struct LegacySession {
    client: Arc<HostClient>,
    session_id: String,
}

#[async_trait]
impl ModelSession for LegacySession {
    async fn prompt(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let path = format!("/model/session/{}/prompt", self.session_id);
        let body = PromptBody {
            text: text.to_string(),
        };
        tokio::select! {
            _ = cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.client.post_json::<_, PromptResponse>(&path, &body) => {
                Ok(result?.text)
            }
        }
    }

    // No destroy call on this surface; the default no-op teardown applies.
}
