//! Business logic and remote service trait definitions for Octochat.
//!
//! This crate defines the "ports" (remote service traits) that the
//! infrastructure layer implements, plus the session controller and the
//! readiness poller that drive the build -> poll -> chat protocol. It
//! depends only on `octochat-types` -- never on `octochat-infra` or any
//! HTTP crate.

pub mod event;
pub mod naming;
pub mod readiness;
pub mod remote;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
