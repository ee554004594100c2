//! Session controller: the build -> poll -> chat protocol.
//!
//! The controller owns the session and transcript, invokes the builder,
//! runs the readiness poller as a background task, and routes user messages
//! to the dialog runtime once the bot is ready. State shared with the
//! readiness task lives behind `tokio::sync::RwLock`; each mutation is made
//! under one write lock and no lock is held across a remote call.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use octochat_types::bot::BotName;
use octochat_types::build::{BuildRequest, BuildResult};
use octochat_types::chat::{ChatMessage, DialogRequest, Sender};
use octochat_types::config::{BuildFailurePolicy, OctochatConfig};
use octochat_types::error::{ServiceError, SessionError};
use octochat_types::event::SessionEvent;
use octochat_types::session::Session;

use crate::event::bus::EventBus;
use crate::readiness::policy::PollPolicy;
use crate::readiness::poller::{PollOutcome, ReadinessPoller};
use crate::remote::builder::KnowledgeBaseBuilder;
use crate::remote::dialog::DialogRuntime;

use super::transcript::Transcript;

/// Knobs for one controller instance.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Constant user id sent with every dialog turn.
    pub user_id: String,
    /// Bound for the build call and for each message call.
    pub request_timeout: Duration,
    pub poll_policy: PollPolicy,
    pub build_failure: BuildFailurePolicy,
}

impl ControllerSettings {
    pub fn from_config(config: &OctochatConfig) -> Self {
        Self {
            user_id: config.user_id.clone(),
            request_timeout: config.request_timeout(),
            poll_policy: PollPolicy::from_config(config),
            build_failure: config.build_failure,
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from_config(&OctochatConfig::default())
    }
}

/// A build the builder accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedBuild {
    pub bot_name: BotName,
    pub already_existed: bool,
}

/// Why `send_message` did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyMessage,
    ChatDisabled,
}

/// Result of one `send_message` call.
#[derive(Debug)]
pub enum SendOutcome {
    /// Nothing was sent and nothing was appended.
    Skipped(SkipReason),
    /// The bot replied; the reply is the last transcript entry.
    Delivered(ChatMessage),
    /// The user message was appended but the runtime call failed.
    Failed(ServiceError),
}

struct ReadinessTask {
    handle: JoinHandle<PollOutcome>,
    cancel: CancellationToken,
}

/// Drives one session from "no bot" to chatting.
pub struct SessionController<B, D> {
    builder: Arc<B>,
    runtime: Arc<D>,
    settings: ControllerSettings,
    session: Arc<RwLock<Session>>,
    transcript: Arc<RwLock<Transcript>>,
    events: EventBus,
    readiness: Option<ReadinessTask>,
    readiness_outcome: Option<PollOutcome>,
}

impl<B, D> SessionController<B, D>
where
    B: KnowledgeBaseBuilder,
    D: DialogRuntime + 'static,
{
    pub fn new(builder: Arc<B>, runtime: Arc<D>, settings: ControllerSettings) -> Self {
        Self {
            builder,
            runtime,
            settings,
            session: Arc::new(RwLock::new(Session::new())),
            transcript: Arc::new(RwLock::new(Transcript::new())),
            events: EventBus::default(),
            readiness: None,
            readiness_outcome: None,
        }
    }

    /// Publish on an externally owned bus instead of a private one.
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Snapshot of the session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Snapshot of the transcript, oldest first.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.read().await.messages().to_vec()
    }

    /// The last `limit` transcript entries, oldest first.
    pub async fn history(&self, limit: usize) -> Vec<ChatMessage> {
        self.transcript.read().await.tail(limit).to_vec()
    }

    /// Number of (user, bot) messages in the transcript.
    pub async fn message_counts(&self) -> (usize, usize) {
        let transcript = self.transcript.read().await;
        (
            transcript.count_from(Sender::User),
            transcript.count_from(Sender::Bot),
        )
    }

    /// Whether the readiness task is still probing.
    pub fn is_polling(&self) -> bool {
        self.readiness
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Ask the builder for a bot built from `url`.
    ///
    /// On success the bot is attached, the session moves to `Building`, and
    /// the readiness poller starts. On failure the session stays without a
    /// bot and the build form follows the configured [`BuildFailurePolicy`].
    pub async fn request_build(&mut self, url: &str) -> Result<AcceptedBuild, SessionError> {
        let url = url.trim();
        if url.is_empty() {
            debug!("Ignoring build request with empty url");
            return Err(SessionError::EmptyUrl);
        }

        {
            let mut session = self.session.write().await;
            if let Some(name) = &session.bot_name {
                return Err(SessionError::BotAlreadyAttached(name.to_string()));
            }
            if !session.build_form_enabled {
                return Err(SessionError::BuildFormDisabled);
            }
            session.build_form_enabled = false;
        }
        self.events.publish(SessionEvent::BuildFormDisabled);

        info!(url, "Requesting knowledge base build");
        let request = BuildRequest::new(url);
        let timeout = self.settings.request_timeout;
        let result = tokio::time::timeout(timeout, self.builder.build(&request))
            .await
            .unwrap_or(Err(ServiceError::Timeout(timeout)));

        let accepted = match result {
            Ok(BuildResult {
                succeeded: true,
                bot_name: Some(bot_name),
                already_existed,
                ..
            }) => AcceptedBuild {
                bot_name,
                already_existed,
            },
            Ok(BuildResult {
                succeeded: true,
                bot_name: None,
                ..
            }) => {
                let err = ServiceError::BuildFailure(
                    "builder reported success without a bot name".to_string(),
                );
                return Err(self.fail_build(err).await);
            }
            Ok(BuildResult { error_message, .. }) => {
                let message = error_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "builder rejected the source url".to_string());
                return Err(self.fail_build(ServiceError::BuildFailure(message)).await);
            }
            Err(err) => return Err(self.fail_build(err).await),
        };

        if !self.session.write().await.attach_bot(accepted.bot_name.clone()) {
            return Err(SessionError::BotAlreadyAttached(accepted.bot_name.to_string()));
        }
        info!(
            bot = %accepted.bot_name,
            already_existed = accepted.already_existed,
            "Build accepted"
        );
        self.events.publish(SessionEvent::BuildAccepted {
            bot_name: accepted.bot_name.clone(),
            already_existed: accepted.already_existed,
        });
        self.start_readiness(accepted.bot_name.clone());

        Ok(accepted)
    }

    /// Attach a bot that was built earlier and verify it is serving.
    pub async fn attach_bot(&mut self, bot_name: BotName) -> Result<(), SessionError> {
        {
            let mut session = self.session.write().await;
            if !session.attach_bot(bot_name.clone()) {
                let existing = session.bot_name.as_ref().unwrap_or(&bot_name);
                return Err(SessionError::BotAlreadyAttached(existing.to_string()));
            }
            session.build_form_enabled = false;
        }
        info!(bot = %bot_name, "Attached existing bot");
        self.events.publish(SessionEvent::BuildFormDisabled);
        self.events.publish(SessionEvent::BuildAccepted {
            bot_name: bot_name.clone(),
            already_existed: true,
        });
        self.start_readiness(bot_name);
        Ok(())
    }

    /// Send `text` to the bot.
    ///
    /// The user message is appended before the runtime is called. Runtime
    /// failures are logged and reported in the outcome, never in the
    /// transcript.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Skipped(SkipReason::EmptyMessage);
        }

        let bot_name = {
            let session = self.session.read().await;
            match (&session.bot_name, session.can_send()) {
                (Some(name), true) => name.clone(),
                _ => return SendOutcome::Skipped(SkipReason::ChatDisabled),
            }
        };

        self.append(ChatMessage::user(text)).await;

        let request = DialogRequest::new(bot_name, self.settings.user_id.clone(), text);
        let timeout = self.settings.request_timeout;
        let result = tokio::time::timeout(timeout, self.runtime.post_text(&request))
            .await
            .unwrap_or(Err(ServiceError::Timeout(timeout)));

        match result {
            Ok(reply) => {
                let message = ChatMessage::bot(reply.reply_text);
                self.append(message.clone()).await;
                SendOutcome::Delivered(message)
            }
            Err(err) => {
                warn!(bot = %request.bot_name, error = %err, "Message delivery failed");
                self.events.publish(SessionEvent::SendFailed {
                    error: err.to_string(),
                });
                SendOutcome::Failed(err)
            }
        }
    }

    /// Wait for the readiness task to finish.
    ///
    /// Returns the same outcome on every call once the task has finished.
    pub async fn wait_until_ready(&mut self) -> Result<PollOutcome, SessionError> {
        if let Some(outcome) = self.readiness_outcome {
            return Ok(outcome);
        }
        let task = self.readiness.as_mut().ok_or(SessionError::NoBot)?;
        let outcome = (&mut task.handle)
            .await
            .map_err(|e| SessionError::ReadinessTask(e.to_string()))?;
        self.readiness = None;
        self.readiness_outcome = Some(outcome);
        Ok(outcome)
    }

    /// Stop the readiness task, if one is running.
    pub fn cancel_readiness(&self) {
        if let Some(task) = &self.readiness {
            task.cancel.cancel();
        }
    }

    async fn fail_build(&self, err: ServiceError) -> SessionError {
        warn!(error = %err, "Knowledge base build failed");
        self.events.publish(SessionEvent::BuildFailed {
            message: err.to_string(),
        });

        match self.settings.build_failure {
            BuildFailurePolicy::ReenableForm => {
                self.session.write().await.build_form_enabled = true;
                self.events.publish(SessionEvent::BuildFormEnabled);
            }
            BuildFailurePolicy::KeepDisabled => {
                debug!("Build form stays disabled after failure");
            }
        }

        SessionError::Service(err)
    }

    fn start_readiness(&mut self, bot_name: BotName) {
        let poller = ReadinessPoller::new(
            Arc::clone(&self.runtime),
            self.settings.poll_policy.clone(),
            self.settings.user_id.clone(),
        )
        .with_events(self.events.clone());

        let cancel = CancellationToken::new();
        let run_cancel = cancel.clone();
        let session = Arc::clone(&self.session);
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let outcome = poller.run(bot_name.clone(), run_cancel).await;
            if outcome.is_ready() {
                let enabled = session.write().await.mark_ready();
                if enabled {
                    events.publish(SessionEvent::ChatEnabled { bot_name });
                }
            } else {
                events.publish(SessionEvent::PollingAbandoned {
                    bot_name,
                    attempts: outcome.attempts(),
                    reason: outcome.describe(),
                });
            }
            outcome
        });

        self.readiness = Some(ReadinessTask { handle, cancel });
    }

    async fn append(&self, message: ChatMessage) {
        self.transcript.write().await.push(message.clone());
        self.events.publish(SessionEvent::MessageAppended { message });
    }
}

impl<B, D> Drop for SessionController<B, D> {
    fn drop(&mut self) {
        if let Some(task) = &self.readiness {
            task.cancel.cancel();
        }
    }
}
