//! CLI entrypoint for nanochat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{bail, Result};
use clap::Parser;
use nanochat_application::{ModelProvider, RequestExecutor, SessionManager};
use nanochat_infrastructure::{
    ConfigLoader, FileConfig, HttpAssetFetcher, JsonFileStore, OfflineAssetCache,
};
use nanochat_presentation::{ChatController, ChatRepl, Cli, Theme};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Load configuration
    let mut config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };
    if let Some(url) = &cli.host_url {
        config.host.url = url.clone();
    }

    info!(host = %config.host.url, "starting nanochat");

    // === Dependency Injection ===
    // Resolve the host API shape once; unreachable hosts yield a stub
    // provider that reports why on every probe.
    let provider: Arc<dyn ModelProvider> =
        Arc::from(nanochat_infrastructure::detect_provider(&config.host.url).await);

    // Conversation + theme storage under the platform data dir
    let store_path = ConfigLoader::data_dir()
        .map(|d| d.join("store.json"))
        .unwrap_or_else(|| "nanochat-store.json".into());
    let store = Arc::new(JsonFileStore::new(store_path));

    // Optional offline asset cache
    if config.cache.enabled {
        let cache_dir = config
            .cache
            .dir
            .clone()
            .or_else(|| ConfigLoader::data_dir().map(|d| d.join("asset-cache")))
            .unwrap_or_else(|| "nanochat-asset-cache".into());
        let fetcher = Arc::new(HttpAssetFetcher::new(config.host.url.as_str()));
        let cache = OfflineAssetCache::new(
            cache_dir,
            config.cache.bucket.clone(),
            config.cache.manifest.clone(),
            fetcher,
        );
        match cache.install().await {
            Ok(()) => {
                if let Err(e) = cache.activate() {
                    warn!("stale cache cleanup failed: {e}");
                }
            }
            Err(e) => warn!("asset cache install failed: {e}"),
        }
    }

    let sessions = Arc::new(Mutex::new(SessionManager::new(
        provider,
        config.generation.clone(),
    )));
    let executor = Arc::new(RequestExecutor::new(sessions));
    let controller = Arc::new(ChatController::new(
        store.clone(),
        store,
        Theme::from_name(&config.ui.theme),
    ));

    // Chat mode
    if cli.chat {
        let history = config.ui.history_file.as_ref().map(PathBuf::from);
        let repl = ChatRepl::new(executor, controller).with_history_file(history);
        repl.run().await?;
        return Ok(());
    }

    // Single question mode - question is required
    let question = match cli.question {
        Some(q) => q,
        None => bail!("Question is required. Use --chat for interactive mode."),
    };

    let outcome = executor.sessions().lock().await.initialize().await;
    if let Some(e) = outcome.into_error() {
        return Err(e.into());
    }

    let request = controller.begin_turn(&question);
    let result = executor.process_text(request, controller.as_ref()).await;
    executor.sessions().lock().await.destroy().await;

    match result {
        Ok(outcome) => {
            if !cli.quiet {
                info!(
                    total_ms = outcome.metrics.total_ms,
                    first_chunk_ms = outcome.metrics.first_chunk_ms,
                    "request finished"
                );
            }
            Ok(())
        }
        Err(e) => bail!("request failed: {e}"),
    }
}
