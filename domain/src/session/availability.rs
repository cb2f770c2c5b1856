//! Capability probing results.
//!
//! [`AvailabilityReport`] is the outcome of asking the host whether an
//! on-device model can be used right now. The probe itself is read-only and
//! never retried — callers decide whether to probe again.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the on-device model capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityStatus {
    /// The model is ready for immediate use.
    Ready,
    /// The model is currently being downloaded by the host.
    Downloading,
    /// The model can be used after the host downloads it.
    Downloadable,
    /// The host environment does not support on-device models.
    Unsupported,
    /// The host exposes no model API surface at all.
    NoApi,
    /// The probe failed or returned something unrecognized.
    Error,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Ready => "ready",
            AvailabilityStatus::Downloading => "downloading",
            AvailabilityStatus::Downloadable => "downloadable",
            AvailabilityStatus::Unsupported => "unsupported",
            AvailabilityStatus::NoApi => "no-api",
            AvailabilityStatus::Error => "error",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged outcome of capability probing, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityReport {
    pub status: AvailabilityStatus,
    pub reason: String,
}

impl AvailabilityReport {
    pub fn new(status: AvailabilityStatus, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    pub fn ready() -> Self {
        Self::new(AvailabilityStatus::Ready, "model is ready")
    }

    pub fn downloading(reason: impl Into<String>) -> Self {
        Self::new(AvailabilityStatus::Downloading, reason)
    }

    pub fn downloadable(reason: impl Into<String>) -> Self {
        Self::new(AvailabilityStatus::Downloadable, reason)
    }

    pub fn unsupported(reason: impl Into<String>) -> Self {
        Self::new(AvailabilityStatus::Unsupported, reason)
    }

    pub fn no_api(reason: impl Into<String>) -> Self {
        Self::new(AvailabilityStatus::NoApi, reason)
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::new(AvailabilityStatus::Error, reason)
    }

    /// True only when the model can serve a prompt right now.
    pub fn is_available(&self) -> bool {
        self.status == AvailabilityStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_is_available() {
        assert!(AvailabilityReport::ready().is_available());
        assert!(!AvailabilityReport::downloading("fetching model").is_available());
        assert!(!AvailabilityReport::downloadable("needs download").is_available());
        assert!(!AvailabilityReport::unsupported("host too old").is_available());
        assert!(!AvailabilityReport::no_api("no surface").is_available());
        assert!(!AvailabilityReport::error("boom").is_available());
    }

    #[test]
    fn status_display_is_kebab_case() {
        assert_eq!(AvailabilityStatus::NoApi.to_string(), "no-api");
        assert_eq!(AvailabilityStatus::Ready.to_string(), "ready");
    }

    #[test]
    fn status_serde_round_trip() {
        let json = serde_json::to_string(&AvailabilityStatus::Downloadable).unwrap();
        assert_eq!(json, "\"downloadable\"");
        let back: AvailabilityStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AvailabilityStatus::Downloadable);
    }
}
