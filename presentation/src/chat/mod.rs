//! Interactive chat module
//!
//! The controller renders streamed output and persists conversations; the
//! REPL wraps it in a readline loop with slash commands.

mod controller;
mod repl;

pub use controller::ChatController;
pub use repl::ChatRepl;
