//! Infrastructure layer for nanochat
//!
//! Adapters for the outside world: the on-device model host (two wire
//! dialects behind one provider interface), JSON file storage, the offline
//! asset cache, and configuration loading.

pub mod assets;
pub mod config;
pub mod host;
pub mod storage;

// Re-export commonly used types
pub use assets::{
    cache::{AssetRequest, FetchOutcome, OfflineAssetCache},
    fetcher::{AssetFetcher, FetchError, HttpAssetFetcher},
};
pub use config::{ConfigLoader, FileConfig};
pub use host::{detect_provider, HostClient, HostError};
pub use storage::json_store::JsonFileStore;
