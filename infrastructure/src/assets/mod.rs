//! Offline asset caching.

pub mod cache;
pub mod fetcher;

pub use cache::{AssetRequest, FetchOutcome, OfflineAssetCache};
pub use fetcher::{AssetFetcher, FetchError, HttpAssetFetcher};
