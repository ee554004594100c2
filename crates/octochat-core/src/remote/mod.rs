//! Remote service traits (ports) implemented by `octochat-infra`.
//!
//! Each trait uses native async fn in traits (RPITIT, Rust 2024 edition)
//! with `Send` futures so implementations can be driven from spawned tasks.

pub mod builder;
pub mod dialog;
pub mod tracker;
