//! Configuration file loading for nanochat
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./nanochat.toml` or `./.nanochat.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/nanochat/config.toml`
//! 4. Fallback: `~/.config/nanochat/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{FileCacheConfig, FileConfig, FileHostConfig, FileUiConfig};
pub use loader::ConfigLoader;
