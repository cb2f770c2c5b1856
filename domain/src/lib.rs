//! Domain layer for nanochat
//!
//! This crate contains the core entities and value objects of the chat
//! client: conversations and their messages, the streaming/request value
//! objects exchanged with the model session layer, and availability results
//! from capability probing. It has no dependencies on infrastructure or
//! presentation concerns.

pub mod chat;
pub mod core;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use chat::entities::{ChatMessage, Conversation, Role};
pub use crate::core::error::ChatError;
pub use session::{
    availability::{AvailabilityReport, AvailabilityStatus},
    params::SessionParams,
    request::{PromptRequest, RequestMetadata},
    stream::StreamChunk,
};
pub use util::truncate_str;
