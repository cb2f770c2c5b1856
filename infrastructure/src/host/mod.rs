//! Model host adapters.
//!
//! [`detect_provider`] queries the host once at startup, resolves which wire
//! dialect it speaks, and hands back the matching provider. An unreachable
//! or unusable host yields an [`OfflineProvider`] that reports the reason on
//! every probe instead of failing construction.

pub mod client;
pub mod error;
pub mod legacy;
pub mod modern;
pub mod probe;
pub mod protocol;

pub use client::HostClient;
pub use error::HostError;
pub use legacy::LegacyHostProvider;
pub use modern::ModernHostProvider;
pub use probe::{map_status, resolve_shape, ApiShape, MIN_HOST_MAJOR_VERSION};

use async_trait::async_trait;
use nanochat_application::{ModelProvider, ModelSession, ProviderError};
use nanochat_domain::{AvailabilityReport, SessionParams};
use protocol::HostInfo;
use std::sync::Arc;
use tracing::{info, warn};

/// Build the provider for the host at `base_url`.
///
/// The API shape is resolved here, exactly once. Every failure mode folds
/// into a working provider so the caller never has to branch on detection
/// errors.
pub async fn detect_provider(base_url: &str) -> Box<dyn ModelProvider> {
    let client = match HostClient::new(base_url) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!("could not construct host client: {e}");
            return Box::new(OfflineProvider::new(AvailabilityReport::error(
                e.to_string(),
            )));
        }
    };

    let info: HostInfo = match client.get_json("/api/info").await {
        Ok(info) => info,
        Err(e) => {
            warn!(url = base_url, "host unreachable: {e}");
            return Box::new(OfflineProvider::new(AvailabilityReport::no_api(format!(
                "host at {base_url} is unreachable: {e}"
            ))));
        }
    };

    match resolve_shape(&info) {
        Ok(ApiShape::Capabilities) => {
            info!(host = %info.name, version = %info.version, "detected modern host API");
            Box::new(ModernHostProvider::new(client))
        }
        Ok(ApiShape::Availability) => {
            info!(host = %info.name, version = %info.version, "detected legacy host API");
            Box::new(LegacyHostProvider::new(client))
        }
        Err(report) => {
            warn!(status = %report.status, "host unusable: {}", report.reason);
            Box::new(OfflineProvider::new(report))
        }
    }
}

/// Stand-in provider for an unreachable or unusable host.
///
/// Probes return the detection-time report; session creation always fails.
pub struct OfflineProvider {
    report: AvailabilityReport,
}

impl OfflineProvider {
    pub fn new(report: AvailabilityReport) -> Self {
        Self { report }
    }
}

#[async_trait]
impl ModelProvider for OfflineProvider {
    async fn check_availability(&self) -> AvailabilityReport {
        self.report.clone()
    }

    async fn create_session(
        &self,
        _params: &SessionParams,
    ) -> Result<Box<dyn ModelSession>, ProviderError> {
        Err(ProviderError::Unavailable(self.report.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanochat_domain::AvailabilityStatus;

    #[tokio::test]
    async fn offline_provider_repeats_its_report() {
        let provider = OfflineProvider::new(AvailabilityReport::no_api("no host"));
        let report = provider.check_availability().await;
        assert_eq!(report.status, AvailabilityStatus::NoApi);
        let again = provider.check_availability().await;
        assert_eq!(report, again);
    }

    #[tokio::test]
    async fn offline_provider_refuses_sessions() {
        let provider = OfflineProvider::new(AvailabilityReport::unsupported("too old"));
        let result = provider.create_session(&SessionParams::default()).await;
        assert!(matches!(result, Err(ProviderError::Unavailable(m)) if m == "too old"));
    }

    #[tokio::test]
    async fn unreachable_host_yields_offline_provider() {
        // Nothing listens on this port; detection must not error out.
        let provider = detect_provider("http://127.0.0.1:1").await;
        let report = provider.check_availability().await;
        assert_eq!(report.status, AvailabilityStatus::NoApi);
        assert!(report.reason.contains("unreachable"));
    }
}
