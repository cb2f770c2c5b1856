//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use nanochat_application::GenerationParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw host configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHostConfig {
    /// Base URL of the model host daemon
    pub url: String,
}

impl Default for FileHostConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:11535".to_string(),
        }
    }
}

/// Raw UI configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileUiConfig {
    /// Default theme when the store has no preference yet
    pub theme: String,
    /// Path to REPL history file
    pub history_file: Option<String>,
}

impl Default for FileUiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            history_file: None,
        }
    }
}

/// Raw asset cache configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    /// Enable the offline asset cache
    pub enabled: bool,
    /// Versioned bucket name; bump to invalidate old caches
    pub bucket: String,
    /// Asset paths to precache on install
    pub manifest: Vec<String>,
    /// Cache directory, defaults to the data dir when unset
    pub dir: Option<PathBuf>,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket: "assets-v1".to_string(),
            manifest: vec!["/".to_string()],
            dir: None,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub host: FileHostConfig,
    /// Generation parameters use the application-layer type directly
    pub generation: GenerationParams,
    pub ui: FileUiConfig,
    pub cache: FileCacheConfig,
}
