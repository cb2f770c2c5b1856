//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::chat::controller::ChatController;
use nanochat_application::{ChatEventSink, RequestExecutor};
use nanochat_domain::{AvailabilityStatus, ChatError};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Interactive chat REPL
pub struct ChatRepl {
    executor: Arc<RequestExecutor>,
    controller: Arc<ChatController>,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(executor: Arc<RequestExecutor>, controller: Arc<ChatController>) -> Self {
        Self {
            executor,
            controller,
            history_file: None,
        }
    }

    /// Override the default readline history location.
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = resolve_history_path(self.history_file.as_ref());

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();
        self.initialize_session().await;

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    // Add to history
                    let _ = rl.add_history_entry(line);

                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    if self.executor.stop_processing() {
                        println!("(request cancelled)");
                    } else {
                        println!("^C");
                    }
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        self.executor.sessions().lock().await.destroy().await;
        Ok(())
    }

    /// Probe the host and create the session, rendering the outcome as a
    /// status message.
    async fn initialize_session(&self) {
        let outcome = self.executor.sessions().lock().await.initialize().await;
        if outcome.success {
            self.controller.on_status("Model ready.");
            return;
        }

        let reason = outcome.error.unwrap_or_default();
        let hint = availability_hint(outcome.status);
        self.controller
            .on_status(&format!("Model unavailable ({}): {reason}", outcome.status));
        if !hint.is_empty() {
            self.controller.on_status(hint);
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            nanochat - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /new      - Start a new conversation");
        println!("  /list     - List conversations");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&self, cmd: &str) -> bool {
        let mut parts = cmd.split_whitespace();
        let command = parts.next().unwrap_or_default();
        match command {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /new             - Start a new conversation");
                println!("  /list            - List conversations");
                println!("  /switch <n>      - Switch to conversation n");
                println!("  /theme           - Toggle dark/light theme");
                println!("  /clear           - Delete all conversations");
                println!("  /stop            - Cancel the in-flight request");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/new" => {
                self.controller.start_new();
                println!("Started a new conversation.");
                false
            }
            "/list" => {
                let conversations = self.controller.list();
                if conversations.is_empty() {
                    println!("No conversations yet.");
                } else {
                    let active = self.controller.active_id();
                    println!();
                    for (index, (id, title)) in conversations.iter().enumerate() {
                        let marker = if Some(id.as_str()) == active.as_deref() {
                            "*"
                        } else {
                            " "
                        };
                        println!("  {marker} [{index}] {title}");
                    }
                    println!();
                }
                false
            }
            "/switch" => {
                match parts.next().and_then(|n| n.parse::<usize>().ok()) {
                    Some(index) => match self.controller.switch_to(index) {
                        Some(_) => println!("Switched to conversation {index}."),
                        None => println!("No conversation {index}; see /list."),
                    },
                    None => println!("Usage: /switch <n>"),
                }
                false
            }
            "/theme" => {
                let theme = self.controller.toggle_theme();
                println!("Theme: {}", theme.name());
                false
            }
            "/clear" => {
                self.controller.clear_all();
                println!("All conversations deleted.");
                false
            }
            "/stop" => {
                if !self.executor.stop_processing() {
                    println!("Nothing in flight.");
                }
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_message(&self, text: &str) {
        let request = self.controller.begin_turn(text);
        match self
            .executor
            .process_text(request, self.controller.as_ref())
            .await
        {
            Ok(outcome) if outcome.aborted => {
                self.controller.on_status("(aborted)");
            }
            Ok(outcome) => {
                debug!(
                    total_ms = outcome.metrics.total_ms,
                    first_chunk_ms = outcome.metrics.first_chunk_ms,
                    "request finished"
                );
            }
            Err(ChatError::SessionUnavailable) => {
                self.controller
                    .on_status("No model session; restart to re-probe the host.");
            }
            Err(e) => {
                // Already routed through on_error by the executor
                debug!("request failed: {e}");
            }
        }
    }
}

/// History location: the configured path, else the platform data dir.
fn resolve_history_path(configured: Option<&PathBuf>) -> Option<PathBuf> {
    configured
        .cloned()
        .or_else(|| dirs::data_dir().map(|p| p.join("nanochat").join("history.txt")))
}

/// Actionable follow-up text for a failed capability probe.
fn availability_hint(status: AvailabilityStatus) -> &'static str {
    match status {
        AvailabilityStatus::Downloadable => {
            "The model can be downloaded by the host; trigger the download and try again."
        }
        AvailabilityStatus::Downloading => {
            "The host is still downloading the model; try again shortly."
        }
        AvailabilityStatus::Unsupported => {
            "This host version does not support on-device models; upgrade the host."
        }
        AvailabilityStatus::NoApi => {
            "No model API found; check that the host daemon is running and reachable."
        }
        AvailabilityStatus::Ready | AvailabilityStatus::Error => "",
    }
}
