//! Offline asset cache.
//!
//! A versioned cache bucket on disk holds a fixed manifest of static asset
//! paths. `install` populates the bucket eagerly, `activate` deletes stale
//! buckets left by previous versions, and `fetch` routes each request:
//! navigations go network-first with cache fallback, other GETs go
//! cache-first with network fallback, and anything else passes through
//! untouched.

use crate::assets::fetcher::{AssetFetcher, FetchError};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A request seen by the cache layer.
#[derive(Debug, Clone)]
pub struct AssetRequest {
    pub method: String,
    pub path: String,
    pub navigation: bool,
}

impl AssetRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.into(),
            navigation: false,
        }
    }

    pub fn navigation(path: impl Into<String>) -> Self {
        Self {
            navigation: true,
            ..Self::get(path)
        }
    }

    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
            navigation: false,
        }
    }
}

/// How the cache answered a request.
#[derive(Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Served fresh from the network (and cached).
    Network(Vec<u8>),
    /// Served from the cache bucket.
    Cached(Vec<u8>),
    /// Not a GET; the cache does not interfere.
    Passthrough,
    /// Neither network nor cache could satisfy the request.
    Unavailable(String),
}

pub struct OfflineAssetCache {
    root: PathBuf,
    bucket: String,
    manifest: Vec<String>,
    fetcher: Arc<dyn AssetFetcher>,
}

impl OfflineAssetCache {
    pub fn new(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
        manifest: Vec<String>,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            manifest,
            fetcher,
        }
    }

    fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    fn cache_path(&self, path: &str) -> PathBuf {
        self.bucket_dir().join(file_name_for(path))
    }

    /// Eagerly fetch and cache every manifest asset.
    ///
    /// All-or-nothing: a failed fetch removes the partially filled bucket
    /// so a later install starts clean.
    pub async fn install(&self) -> Result<(), FetchError> {
        let dir = self.bucket_dir();
        fs::create_dir_all(&dir).map_err(io_fetch_error)?;

        for path in &self.manifest {
            let body = match self.fetcher.fetch(path).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(asset = %path, "install failed: {e}");
                    let _ = fs::remove_dir_all(&dir);
                    return Err(e);
                }
            };
            fs::write(self.cache_path(path), body).map_err(io_fetch_error)?;
        }
        info!(bucket = %self.bucket, assets = self.manifest.len(), "asset cache installed");
        Ok(())
    }

    /// Delete bucket directories left behind by previous versions.
    pub fn activate(&self) -> io::Result<()> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if entry.file_name().to_string_lossy() != self.bucket.as_str() {
                debug!(bucket = %entry.file_name().to_string_lossy(), "removing stale cache bucket");
                fs::remove_dir_all(entry.path())?;
            }
        }
        Ok(())
    }

    pub async fn fetch(&self, request: &AssetRequest) -> FetchOutcome {
        if request.method != "GET" {
            return FetchOutcome::Passthrough;
        }
        if request.navigation {
            self.network_first(&request.path).await
        } else {
            self.cache_first(&request.path).await
        }
    }

    async fn network_first(&self, path: &str) -> FetchOutcome {
        match self.fetcher.fetch(path).await {
            Ok(body) => {
                self.store(path, &body);
                FetchOutcome::Network(body)
            }
            Err(network_error) => match self.lookup(path) {
                Some(body) => FetchOutcome::Cached(body),
                None => FetchOutcome::Unavailable(network_error.to_string()),
            },
        }
    }

    async fn cache_first(&self, path: &str) -> FetchOutcome {
        if let Some(body) = self.lookup(path) {
            return FetchOutcome::Cached(body);
        }
        match self.fetcher.fetch(path).await {
            Ok(body) => {
                self.store(path, &body);
                FetchOutcome::Network(body)
            }
            Err(e) => FetchOutcome::Unavailable(e.to_string()),
        }
    }

    fn lookup(&self, path: &str) -> Option<Vec<u8>> {
        fs::read(self.cache_path(path)).ok()
    }

    fn store(&self, path: &str, body: &[u8]) {
        if let Err(e) = fs::create_dir_all(self.bucket_dir()) {
            warn!("cache dir creation failed: {e}");
            return;
        }
        if let Err(e) = fs::write(self.cache_path(path), body) {
            warn!(asset = %path, "cache write failed: {e}");
        }
    }
}

/// Flatten an asset path to a single cache file name.
fn file_name_for(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return "index".to_string();
    }
    trimmed.replace('/', "__")
}

fn io_fetch_error(e: io::Error) -> FetchError {
    FetchError::Network(e.to_string())
}
