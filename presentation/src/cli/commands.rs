//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for nanochat
#[derive(Parser, Debug)]
#[command(name = "nanochat")]
#[command(author, version, about = "Chat with an on-device language model")]
#[command(long_about = r#"
Nanochat talks to a local model host daemon, streams responses token by
token, and persists conversations on disk.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./nanochat.toml     Project-level config
3. ~/.config/nanochat/config.toml   Global config

Example:
  nanochat "What's the difference between String and &str?"
  nanochat --chat
  nanochat --host-url http://192.168.1.10:11535 --chat
"#)]
pub struct Cli {
    /// The question to ask (not required in chat mode)
    pub question: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Base URL of the model host daemon (overrides config)
    #[arg(long, value_name = "URL")]
    pub host_url: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress status messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_question() {
        let cli = Cli::parse_from(["nanochat", "why borrowck?"]);
        assert_eq!(cli.question.as_deref(), Some("why borrowck?"));
        assert!(!cli.chat);
    }

    #[test]
    fn parses_chat_mode_with_overrides() {
        let cli = Cli::parse_from([
            "nanochat",
            "--chat",
            "--host-url",
            "http://10.0.0.2:11535",
            "-vv",
        ]);
        assert!(cli.chat);
        assert_eq!(cli.host_url.as_deref(), Some("http://10.0.0.2:11535"));
        assert_eq!(cli.verbose, 2);
        assert!(cli.question.is_none());
    }
}
