//! Core domain types

pub mod error;
