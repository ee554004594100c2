//! Event types for the Octochat session event bus.
//!
//! `SessionEvent` is broadcast by the session controller and readiness
//! poller so the UI can follow affordance changes, build progress, and
//! transcript growth. All variants are Clone + Send + Sync for use with
//! tokio broadcast channels.

use serde::{Deserialize, Serialize};

use crate::bot::BotName;
use crate::chat::ChatMessage;

/// Events emitted while building a bot and chatting with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The build form was disabled because a build request is in flight.
    BuildFormDisabled,

    /// The build form accepts input again.
    BuildFormEnabled,

    /// The builder accepted the source URL and named the bot.
    BuildAccepted {
        bot_name: BotName,
        already_existed: bool,
    },

    /// The build request failed. `message` is meant for the user-visible log.
    BuildFailed { message: String },

    /// A readiness probe failed; the poller keeps going.
    ProbeFailed {
        bot_name: BotName,
        attempt: u32,
        error: String,
    },

    /// The bot answered a probe; chat input is now enabled.
    ChatEnabled { bot_name: BotName },

    /// The poller gave up before the bot became ready.
    PollingAbandoned {
        bot_name: BotName,
        attempts: u32,
        reason: String,
    },

    /// A message was appended to the transcript.
    MessageAppended { message: ChatMessage },

    /// A user message could not be delivered to the runtime.
    SendFailed { error: String },
}
