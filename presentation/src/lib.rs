//! Presentation layer for nanochat
//!
//! This crate contains CLI definitions, the chat controller that renders
//! streamed output and persists conversations, the theme handling, and the
//! interactive REPL.

pub mod chat;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use chat::{ChatController, ChatRepl};
pub use cli::commands::Cli;
pub use output::theme::Theme;
