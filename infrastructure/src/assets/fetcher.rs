//! Network side of the offline asset cache.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),
}

/// Fetches asset bodies over the network. Abstracted so cache routing can
/// be tested without a server.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

pub struct HttpAssetFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAssetFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(body.to_vec())
    }
}
