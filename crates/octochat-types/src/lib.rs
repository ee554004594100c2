//! Shared domain types for Octochat.
//!
//! This crate contains the domain types used across the Octochat client:
//! the chat session, build results, transcript messages, bot stages,
//! session events, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod bot;
pub mod build;
pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod session;
