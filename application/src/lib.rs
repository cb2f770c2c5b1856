//! Application layer for nanochat
//!
//! This crate contains the session/request lifecycle use cases and the port
//! definitions they depend on. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GenerationParams;
pub use ports::{
    chat_events::{ChatEventSink, Completion, NoChatEvents},
    model_provider::{
        ModelProvider, ModelSession, ProviderError, SessionEvent, StreamHandle,
    },
    storage::{ConversationStore, MemoryStore, StoreError, ThemeStore},
};
pub use use_cases::request_executor::{ProcessOutcome, RequestExecutor, RequestMetrics};
pub use use_cases::session_manager::{InitOutcome, SessionManager};
