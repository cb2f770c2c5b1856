//! Provider for hosts exposing the modern `capabilities` surface.
//!
//! This dialect has the full feature set: a capability query, NDJSON
//! streaming prompts, and explicit session deletion.

use crate::host::client::HostClient;
use crate::host::error::HostError;
use crate::host::probe::map_status;
use crate::host::protocol::{
    drain_lines, CapabilitiesResponse, CreateSessionBody, PromptBody, PromptResponse,
    SessionCreated, StreamLine,
};
use async_trait::async_trait;
use nanochat_application::{ModelProvider, ModelSession, ProviderError, SessionEvent, StreamHandle};
use nanochat_domain::{AvailabilityReport, SessionParams};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const STREAM_CHANNEL_CAPACITY: usize = 32;

pub struct ModernHostProvider {
    client: Arc<HostClient>,
}

impl ModernHostProvider {
    pub fn new(client: Arc<HostClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModelProvider for ModernHostProvider {
    async fn check_availability(&self) -> AvailabilityReport {
        match self
            .client
            .get_json::<CapabilitiesResponse>("/v2/model/capabilities")
            .await
        {
            Ok(response) => map_status(&response.status),
            Err(e) => AvailabilityReport::error(format!("capability probe failed: {e}")),
        }
    }

    async fn create_session(
        &self,
        params: &SessionParams,
    ) -> Result<Box<dyn ModelSession>, ProviderError> {
        let created: SessionCreated = self
            .client
            .post_json("/v2/sessions", &CreateSessionBody::from(params))
            .await?;
        debug!(session_id = %created.session_id, "created model session");
        Ok(Box::new(ModernSession {
            client: self.client.clone(),
            session_id: created.session_id,
        }))
    }
}

pub struct ModernSession {
    client: Arc<HostClient>,
    session_id: String,
}

#[async_trait]
impl ModelSession for ModernSession {
    fn supports_streaming(&self) -> bool {
        true
    }

    async fn prompt(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ProviderError> {
        let path = format!("/v2/sessions/{}/prompt", self.session_id);
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

    async fn prompt_streaming(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<StreamHandle, ProviderError> {
        let path = format!("/v2/sessions/{}/prompt/stream", self.session_id);
        let body = PromptBody {
            text: text.to_string(),
        };
        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ProviderError::Cancelled),
            result = self.client.post_stream(&path, &body) => result?,
        };

        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        let cancel = cancel.clone();
        tokio::spawn(read_ndjson_stream(response, tx, cancel));
        Ok(StreamHandle::new(rx))
    }

    async fn destroy(&self) {
        let path = format!("/v2/sessions/{}", self.session_id);
        if let Err(e) = self.client.delete(&path).await {
            warn!(session_id = %self.session_id, "session delete failed: {e}");
        }
    }
}

/// Forward NDJSON lines from the host as session events until the stream
/// ends, fails, or the token fires.
async fn read_ndjson_stream(
    mut response: reqwest::Response,
    tx: mpsc::Sender<SessionEvent>,
    cancel: CancellationToken,
) {
    let mut buf: Vec<u8> = Vec::new();
    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => {
                let _ = tx.send(SessionEvent::Failed(ProviderError::Cancelled)).await;
                return;
            }
            chunk = response.chunk() => chunk,
        };

        match chunk {
            Ok(Some(bytes)) => {
                buf.extend_from_slice(&bytes);
                for line in drain_lines(&mut buf) {
                    if !forward_line(&line, &tx).await {
                        return;
                    }
                }
            }
            Ok(None) => {
                // Body ended without an explicit done marker
                let _ = tx.send(SessionEvent::Done).await;
                return;
            }
            Err(e) => {
                let error = HostError::Transport(e.to_string());
                let _ = tx.send(SessionEvent::Failed(error.into())).await;
                return;
            }
        }
    }
}

/// Returns false when the stream is finished and the reader should stop.
async fn forward_line(line: &str, tx: &mpsc::Sender<SessionEvent>) -> bool {
    let parsed: StreamLine = match serde_json::from_str(line) {
        Ok(parsed) => parsed,
        Err(e) => {
            let error = HostError::InvalidResponse(format!("bad stream line: {e}"));
            let _ = tx.send(SessionEvent::Failed(error.into())).await;
            return false;
        }
    };

    if let Some(wire) = parsed.error {
        let error = HostError::Api {
            code: wire.code,
            message: wire.message,
        };
        let _ = tx.send(SessionEvent::Failed(error.into())).await;
        return false;
    }

    if !parsed.delta.is_empty() {
        if tx.send(SessionEvent::Chunk(parsed.delta)).await.is_err() {
            // Receiver dropped; nobody is listening anymore
            return false;
        }
    }

    if parsed.done {
        let _ = tx.send(SessionEvent::Done).await;
        return false;
    }
    true
}
