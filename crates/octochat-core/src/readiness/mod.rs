//! Readiness polling for freshly built bots.
//!
//! A newly built bot exists before the dialog runtime can serve it. The
//! [`poller::ReadinessPoller`] probes the runtime on a fixed interval until
//! a probe succeeds, the [`policy::PollPolicy`] limits run out, or the
//! caller cancels.

pub mod policy;
pub mod poller;
