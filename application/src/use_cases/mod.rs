//! Use cases
//!
//! The session/request lifecycle: [`SessionManager`] owns the single model
//! session, [`RequestExecutor`] drives one prompt at a time through it.
//!
//! [`SessionManager`]: session_manager::SessionManager
//! [`RequestExecutor`]: request_executor::RequestExecutor

pub mod request_executor;
pub mod session_manager;
