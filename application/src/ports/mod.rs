//! Port definitions
//!
//! Ports are the interfaces through which the application layer talks to
//! the outside world. Implementations (adapters) live in the infrastructure
//! and presentation layers.

pub mod chat_events;
pub mod model_provider;
pub mod storage;
