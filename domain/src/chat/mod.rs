//! Conversation entities

pub mod entities;
