//! The readiness poller.
//!
//! States: `Idle -> Polling -> Ready | Abandoned`. Both end states are
//! terminal. Probes are issued one at a time, so a probe answer can never
//! arrive after the poller has finished; `run` consumes the poller, so a
//! finished poller cannot be restarted.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use octochat_types::bot::BotName;
use octochat_types::chat::DialogRequest;
use octochat_types::error::ServiceError;
use octochat_types::event::SessionEvent;

use crate::event::bus::EventBus;
use crate::remote::dialog::DialogRuntime;

use super::policy::PollPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Ready,
    Abandoned,
}

/// Observable poller progress: current state and probes issued so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerStatus {
    pub state: PollerState,
    pub attempts: u32,
}

impl PollerStatus {
    fn idle() -> Self {
        Self {
            state: PollerState::Idle,
            attempts: 0,
        }
    }
}

/// How a poller run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The bot answered probe number `attempts`.
    Ready { attempts: u32 },
    /// `max_attempts` probes failed.
    Exhausted { attempts: u32 },
    /// The overall deadline passed.
    TimedOut { attempts: u32 },
    /// The caller cancelled the run.
    Cancelled { attempts: u32 },
}

impl PollOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match *self {
            PollOutcome::Ready { attempts }
            | PollOutcome::Exhausted { attempts }
            | PollOutcome::TimedOut { attempts }
            | PollOutcome::Cancelled { attempts } => attempts,
        }
    }

    /// Short human-readable reason, used for events and log lines.
    pub fn describe(&self) -> String {
        match self {
            PollOutcome::Ready { attempts } => format!("ready after {attempts} probe(s)"),
            PollOutcome::Exhausted { attempts } => {
                format!("gave up after {attempts} failed probe(s)")
            }
            PollOutcome::TimedOut { attempts } => {
                format!("deadline passed after {attempts} probe(s)")
            }
            PollOutcome::Cancelled { attempts } => format!("cancelled after {attempts} probe(s)"),
        }
    }
}

/// Probes the dialog runtime until a freshly built bot answers.
pub struct ReadinessPoller<D> {
    runtime: Arc<D>,
    policy: PollPolicy,
    user_id: String,
    events: Option<EventBus>,
    status: watch::Sender<PollerStatus>,
}

impl<D: DialogRuntime> ReadinessPoller<D> {
    pub fn new(runtime: Arc<D>, policy: PollPolicy, user_id: impl Into<String>) -> Self {
        let (status, _) = watch::channel(PollerStatus::idle());
        Self {
            runtime,
            policy,
            user_id: user_id.into(),
            events: None,
            status,
        }
    }

    /// Publish `ProbeFailed` events on `events`.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<PollerStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> PollerStatus {
        *self.status.borrow()
    }

    /// Probe `bot_name` until it answers or the policy gives up.
    ///
    /// The first probe is sent one interval after the call; a freshly
    /// built bot never answers immediately.
    pub async fn run(self, bot_name: BotName, cancel: CancellationToken) -> PollOutcome {
        let started = Instant::now();
        let interval = self.policy.effective_interval();
        let mut ticker = tokio::time::interval_at(started + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let deadline_at = self.policy.deadline.map(|limit| started + limit);
        let deadline = async move {
            match deadline_at {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut attempts = 0u32;
        self.set_status(PollerState::Polling, attempts);
        info!(
            bot = %bot_name,
            ?interval,
            max_attempts = ?self.policy.max_attempts,
            "Waiting for bot to become ready"
        );

        loop {
            if self.policy.attempts_exhausted(attempts) {
                return self.abandon(&bot_name, PollOutcome::Exhausted { attempts });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return self.abandon(&bot_name, PollOutcome::Cancelled { attempts });
                }
                _ = &mut deadline => {
                    return self.abandon(&bot_name, PollOutcome::TimedOut { attempts });
                }
                _ = ticker.tick() => {}
            }

            attempts += 1;
            self.set_status(PollerState::Polling, attempts);

            let request = DialogRequest::new(
                bot_name.clone(),
                self.user_id.clone(),
                self.policy.probe_text.clone(),
            );
            let probe = tokio::time::timeout(self.policy.probe_timeout, self.runtime.post_text(&request));

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return self.abandon(&bot_name, PollOutcome::Cancelled { attempts });
                }
                _ = &mut deadline => {
                    return self.abandon(&bot_name, PollOutcome::TimedOut { attempts });
                }
                answer = probe => {
                    answer.unwrap_or_else(|_| Err(ServiceError::Timeout(self.policy.probe_timeout)))
                }
            };

            match result {
                Ok(_) => {
                    self.set_status(PollerState::Ready, attempts);
                    info!(bot = %bot_name, attempts, "Bot is ready");
                    return PollOutcome::Ready { attempts };
                }
                Err(err) => {
                    if err.is_not_ready() {
                        debug!(bot = %bot_name, attempt = attempts, error = %err, "Bot not ready yet");
                    } else {
                        warn!(bot = %bot_name, attempt = attempts, error = %err, "Readiness probe failed");
                    }
                    if let Some(events) = &self.events {
                        events.publish(SessionEvent::ProbeFailed {
                            bot_name: bot_name.clone(),
                            attempt: attempts,
                            error: err.to_string(),
                        });
                    }
                }
            }
        }
    }

    fn set_status(&self, state: PollerState, attempts: u32) {
        self.status.send_replace(PollerStatus { state, attempts });
    }

    fn abandon(&self, bot_name: &BotName, outcome: PollOutcome) -> PollOutcome {
        self.set_status(PollerState::Abandoned, outcome.attempts());
        warn!(bot = %bot_name, reason = %outcome.describe(), "Stopped waiting for bot");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::{ScriptedRuntime, StalledRuntime};

    fn bot() -> BotName {
        BotName::new("kb-42").unwrap()
    }

    fn policy() -> PollPolicy {
        PollPolicy::unbounded(Duration::from_secs(3))
    }

    #[tokio::test(start_paused = true)]
    async fn ready_after_n_failed_probes() {
        let runtime = Arc::new(ScriptedRuntime::not_ready_then(3, "Hi"));
        let events = EventBus::new(16);
        let mut rx = events.subscribe();

        let poller = ReadinessPoller::new(runtime.clone(), policy(), "demo-webapp-id")
            .with_events(events.clone());
        runtime.observe(poller.subscribe());
        let status = poller.subscribe();

        let outcome = poller.run(bot(), CancellationToken::new()).await;

        assert_eq!(outcome, PollOutcome::Ready { attempts: 4 });
        assert_eq!(runtime.calls(), 4);

        // Every probe, including the successful one, was issued while Polling.
        let observed = runtime.observed();
        assert_eq!(observed.len(), 4);
        for (i, seen) in observed.iter().enumerate() {
            assert_eq!(seen.state, PollerState::Polling);
            assert_eq!(seen.attempts, i as u32 + 1);
        }
        assert_eq!(status.borrow().state, PollerState::Ready);

        for attempt in 1..=3 {
            match rx.try_recv().unwrap() {
                SessionEvent::ProbeFailed { attempt: a, bot_name, .. } => {
                    assert_eq!(a, attempt);
                    assert_eq!(bot_name.as_str(), "kb-42");
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn probes_carry_sentinel_input_and_user_id() {
        let runtime = Arc::new(ScriptedRuntime::not_ready_then(0, "Hi"));
        let poller = ReadinessPoller::new(runtime.clone(), policy(), "demo-webapp-id");

        poller.run(bot(), CancellationToken::new()).await;

        let requests = runtime.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].bot_name.as_str(), "kb-42");
        assert_eq!(requests[0].user_id, "demo-webapp-id");
        assert_eq!(requests[0].input_text, "Hello");
    }

    #[tokio::test(start_paused = true)]
    async fn first_probe_waits_one_interval() {
        let runtime = Arc::new(ScriptedRuntime::not_ready_then(0, "Hi"));
        let poller = ReadinessPoller::new(runtime.clone(), policy(), "demo-webapp-id");
        let handle = tokio::spawn(poller.run(bot(), CancellationToken::new()));

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(runtime.calls(), 0);

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, PollOutcome::Ready { attempts: 1 });
        assert_eq!(runtime.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_still_probes() {
        let runtime = Arc::new(ScriptedRuntime::not_ready_then(2, "Hi"));
        let mut zero = policy();
        zero.interval = Duration::ZERO;
        let poller = ReadinessPoller::new(runtime.clone(), zero, "demo-webapp-id");

        let outcome = poller.run(bot(), CancellationToken::new()).await;
        assert_eq!(outcome, PollOutcome::Ready { attempts: 3 });
    }

    #[tokio::test(start_paused = true)]
    async fn no_probes_after_ready() {
        let runtime = Arc::new(ScriptedRuntime::not_ready_then(1, "Hi"));
        let poller = ReadinessPoller::new(runtime.clone(), policy(), "demo-webapp-id");

        let outcome = poller.run(bot(), CancellationToken::new()).await;
        assert!(outcome.is_ready());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(runtime.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let runtime = Arc::new(ScriptedRuntime::new(Vec::new()));
        let poller =
            ReadinessPoller::new(runtime.clone(), policy().with_max_attempts(5), "demo-webapp-id");
        let status = poller.subscribe();

        let outcome = poller.run(bot(), CancellationToken::new()).await;

        assert_eq!(outcome, PollOutcome::Exhausted { attempts: 5 });
        assert_eq!(runtime.calls(), 5);
        assert_eq!(status.borrow().state, PollerState::Abandoned);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_stops_polling() {
        let runtime = Arc::new(ScriptedRuntime::new(Vec::new()));
        let poller = ReadinessPoller::new(
            runtime.clone(),
            policy().with_deadline(Duration::from_secs(10)),
            "demo-webapp-id",
        );

        let outcome = poller.run(bot(), CancellationToken::new()).await;

        // Probes at 3s, 6s, 9s; the deadline fires at 10s.
        assert_eq!(outcome, PollOutcome::TimedOut { attempts: 3 });
        assert_eq!(runtime.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_before_first_probe() {
        let runtime = Arc::new(ScriptedRuntime::new(Vec::new()));
        let poller = ReadinessPoller::new(runtime.clone(), policy(), "demo-webapp-id");
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = poller.run(bot(), cancel).await;

        assert_eq!(outcome, PollOutcome::Cancelled { attempts: 0 });
        assert_eq!(runtime.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_while_polling() {
        let runtime = Arc::new(ScriptedRuntime::new(Vec::new()));
        let poller = ReadinessPoller::new(runtime.clone(), policy(), "demo-webapp-id");
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poller.run(bot(), cancel.clone()));

        tokio::time::sleep(Duration::from_millis(7_000)).await;
        cancel.cancel();
        let outcome = handle.await.unwrap();

        assert_eq!(outcome, PollOutcome::Cancelled { attempts: 2 });
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(runtime.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_probe_counts_as_failure() {
        let events = EventBus::new(16);
        let mut rx = events.subscribe();
        let poller = ReadinessPoller::new(
            Arc::new(StalledRuntime),
            policy()
                .with_max_attempts(2)
                .with_probe_timeout(Duration::from_secs(1)),
            "demo-webapp-id",
        )
        .with_events(events.clone());

        let outcome = poller.run(bot(), CancellationToken::new()).await;

        assert_eq!(outcome, PollOutcome::Exhausted { attempts: 2 });
        match rx.try_recv().unwrap() {
            SessionEvent::ProbeFailed { error, .. } => assert!(error.contains("timed out")),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn outcome_helpers() {
        assert!(PollOutcome::Ready { attempts: 1 }.is_ready());
        assert!(!PollOutcome::Cancelled { attempts: 0 }.is_ready());
        assert_eq!(PollOutcome::TimedOut { attempts: 7 }.attempts(), 7);
        assert!(PollOutcome::Exhausted { attempts: 3 }.describe().contains("3"));
    }
}
