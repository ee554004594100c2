//! Infrastructure layer for Octochat.
//!
//! Contains the HTTP implementations of the remote service traits defined in
//! `octochat-core` (knowledge-base builder, dialog runtime, bot tracker) and
//! the configuration loader.

pub mod config;
pub mod http;
