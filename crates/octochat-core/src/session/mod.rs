//! Session controller and transcript.

pub mod controller;
pub mod transcript;
