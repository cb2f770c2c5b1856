//! Thin HTTP client for the model host daemon.

use crate::host::error::HostError;
use crate::host::protocol::ErrorBody;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::trace;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP access to one host daemon, shared by probe and sessions.
pub struct HostClient {
    http: reqwest::Client,
    base_url: String,
}

impl HostClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HostError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| HostError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, HostError> {
        trace!(path, "GET");
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, HostError> {
        trace!(path, "POST");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    /// POST that returns the raw response for incremental body reads.
    pub async fn post_stream<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, HostError> {
        trace!(path, "POST (streaming)");
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        Self::check_status(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), HostError> {
        trace!(path, "DELETE");
        let response = self
            .http
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HostError> {
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| HostError::InvalidResponse(e.to_string()))
    }

    /// On non-2xx, prefer the host's structured error payload over the bare
    /// status code.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HostError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
            return Err(HostError::Api {
                code: parsed.error.code,
                message: parsed.error.message,
            });
        }
        Err(HostError::Status(status.as_u16()))
    }
}
