//! Transcript message and dialog runtime request/reply types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

use crate::bot::BotName;

/// Who wrote a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// One entry of the session transcript. Never mutated once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}

/// A text turn sent to the dialog runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub bot_name: BotName,
    pub user_id: String,
    pub input_text: String,
}

impl DialogRequest {
    pub fn new(bot_name: BotName, user_id: impl Into<String>, input_text: impl Into<String>) -> Self {
        Self {
            bot_name,
            user_id: user_id.into(),
            input_text: input_text.into(),
        }
    }
}

/// The runtime's answer to a [`DialogRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogReply {
    pub reply_text: String,
    /// Dialog state reported by the runtime (e.g. "Fulfilled"), if any.
    pub dialog_state: Option<String>,
}

impl DialogReply {
    pub fn text(reply_text: impl Into<String>) -> Self {
        Self {
            reply_text: reply_text.into(),
            dialog_state: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_serde() {
        let json = serde_json::to_string(&Sender::Bot).unwrap();
        assert_eq!(json, "\"bot\"");
        assert_eq!(Sender::User.to_string(), "user");
    }

    #[test]
    fn test_message_constructors() {
        let user = ChatMessage::user("hello");
        let bot = ChatMessage::bot("hi");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text, "hi");
        assert_ne!(user.id, bot.id);
    }
}
