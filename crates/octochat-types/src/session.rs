//! Chat session state.
//!
//! One `Session` exists per process run. It tracks which bot (if any) the
//! user is talking to, how far provisioning has progressed, and whether the
//! build and chat affordances are enabled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::bot::BotName;

/// Provisioning status of the session's bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NoBot,
    Building,
    Ready,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::NoBot => write!(f, "no bot"),
            SessionStatus::Building => write!(f, "building"),
            SessionStatus::Ready => write!(f, "ready"),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::NoBot
    }
}

/// The client's single session.
///
/// `bot_name` is set at most once and never cleared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub bot_name: Option<BotName>,
    pub status: SessionStatus,
    pub chat_enabled: bool,
    pub build_form_enabled: bool,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            bot_name: None,
            status: SessionStatus::NoBot,
            chat_enabled: false,
            build_form_enabled: true,
            started_at: Utc::now(),
        }
    }

    /// Attach a freshly built bot and move to `Building`.
    ///
    /// Returns `false` (and changes nothing) if a bot is already attached.
    pub fn attach_bot(&mut self, bot_name: BotName) -> bool {
        if self.bot_name.is_some() {
            return false;
        }
        self.bot_name = Some(bot_name);
        self.status = SessionStatus::Building;
        true
    }

    /// Move `Building` -> `Ready` and enable chat.
    ///
    /// Idempotent: returns `true` only for the call that performed the
    /// transition.
    pub fn mark_ready(&mut self) -> bool {
        if self.status != SessionStatus::Building {
            return false;
        }
        self.status = SessionStatus::Ready;
        self.chat_enabled = true;
        true
    }

    /// Whether a message may be routed to the dialog runtime right now.
    pub fn can_send(&self) -> bool {
        self.status == SessionStatus::Ready && self.chat_enabled && self.bot_name.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
