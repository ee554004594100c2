//! Probe scheduling and give-up policy for the readiness poller.

use std::time::Duration;

use octochat_types::config::OctochatConfig;

/// Shortest period the poller will tick at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// How often to probe, what to send, and when to give up.
///
/// With no `max_attempts` and no `deadline` the poller probes until the bot
/// answers or the caller cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub deadline: Option<Duration>,
    pub probe_text: String,
    /// Upper bound for a single probe; a probe that takes longer counts as failed.
    pub probe_timeout: Duration,
}

impl PollPolicy {
    /// Probe every `interval` with no attempt or time limit.
    ///
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            max_attempts: None,
            deadline: None,
            probe_text: "Hello".to_string(),
            probe_timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &OctochatConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.polling.interval_secs),
            max_attempts: config.polling.max_attempts,
            deadline: config.polling.deadline_secs.map(Duration::from_secs),
            probe_text: config.polling.probe_text.clone(),
            probe_timeout: config.request_timeout(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// The tick period actually used, never below [`MIN_INTERVAL`].
    pub fn effective_interval(&self) -> Duration {
        self.interval.max(MIN_INTERVAL)
    }

    /// Whether `attempts` probes already used up the attempt budget.
    pub fn attempts_exhausted(&self, attempts: u32) -> bool {
        matches!(self.max_attempts, Some(max) if attempts >= max)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::unbounded(Duration::from_secs(3))
    }
}
