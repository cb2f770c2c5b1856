//! Host API shape resolution and status mapping.
//!
//! The shape is resolved exactly once, from the `/api/info` answer, before
//! any provider is constructed. Nothing downstream branches on the dialect
//! again.

use crate::host::protocol::{HostInfo, SURFACE_AVAILABILITY, SURFACE_CAPABILITIES};
use nanochat_domain::AvailabilityReport;
use tracing::debug;

/// Oldest host major version with a usable model runtime.
pub const MIN_HOST_MAJOR_VERSION: u32 = 128;

/// Which capability-query surface the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiShape {
    /// Modern surface: `capabilities` query, streaming, session deletion.
    Capabilities,
    /// Legacy surface: `availability` query, blocking prompts only.
    Availability,
}

/// Decide which adapter to build for this host.
///
/// An `Err` carries the report to hand out from a stub provider; the
/// decision is made once and never revisited.
pub fn resolve_shape(info: &HostInfo) -> Result<ApiShape, AvailabilityReport> {
    let major = match parse_major_version(&info.version) {
        Some(v) => v,
        None => {
            return Err(AvailabilityReport::error(format!(
                "unparsable host version '{}'",
                info.version
            )))
        }
    };

    if major < MIN_HOST_MAJOR_VERSION {
        return Err(AvailabilityReport::unsupported(format!(
            "host version {} is below the minimum supported version {}",
            major, MIN_HOST_MAJOR_VERSION
        )));
    }

    // Prefer the modern surface when the host advertises both.
    if info.apis.iter().any(|a| a == SURFACE_CAPABILITIES) {
        debug!(host = %info.name, version = %info.version, "using capabilities API");
        Ok(ApiShape::Capabilities)
    } else if info.apis.iter().any(|a| a == SURFACE_AVAILABILITY) {
        debug!(host = %info.name, version = %info.version, "using availability API");
        Ok(ApiShape::Availability)
    } else {
        Err(AvailabilityReport::no_api(format!(
            "host '{}' exposes no model API surface",
            info.name
        )))
    }
}

pub(crate) fn parse_major_version(version: &str) -> Option<u32> {
    version.split('.').next()?.trim().parse().ok()
}

/// Map a raw host status string onto an [`AvailabilityReport`].
///
/// Both dialects use the same vocabulary modulo synonyms; an unrecognized
/// value becomes an error report carrying the raw string.
pub fn map_status(raw: &str) -> AvailabilityReport {
    match raw {
        "readily" | "available" => AvailabilityReport::ready(),
        "after-download" | "downloadable" => {
            AvailabilityReport::downloadable("model must be downloaded before first use")
        }
        "downloading" => AvailabilityReport::downloading("host is downloading the model"),
        "no" | "unavailable" => {
            AvailabilityReport::unsupported("host reports the model as unavailable")
        }
        other => AvailabilityReport::error(format!("unrecognized availability status '{other}'")),
    }
}
