//! Logging and trace export for Octochat.

pub mod tracing_setup;
