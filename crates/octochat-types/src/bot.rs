//! Bot identity and provisioning stage types.
//!
//! A bot is identified by the name the builder assigns to it. The tracker
//! reports where a bot is in the provisioning pipeline as a [`BotStage`].

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::BotError;

/// Name of a provisioned bot, as accepted by the dialog runtime.
///
/// Never empty; surrounding whitespace is stripped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BotName(String);

impl BotName {
    pub fn new(name: impl Into<String>) -> Result<Self, BotError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BotError::InvalidName("bot name is empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BotName {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Provisioning stage recorded by the bot tracker.
///
/// Wire form is the tracker's upper-case stage string; a bot the tracker
/// has never seen is `DNE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BotStage {
    #[serde(rename = "DNE")]
    DoesNotExist,
    #[serde(rename = "EXTRACTING")]
    Extracting,
    #[serde(rename = "STORING")]
    Storing,
    #[serde(rename = "BUILDING")]
    Building,
    #[serde(rename = "PUBLISHING")]
    Publishing,
    #[serde(rename = "READY")]
    Ready,
}

impl BotStage {
    /// Whether the pipeline is still working on this bot.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            BotStage::Extracting | BotStage::Storing | BotStage::Building | BotStage::Publishing
        )
    }
}

impl fmt::Display for BotStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotStage::DoesNotExist => write!(f, "DNE"),
            BotStage::Extracting => write!(f, "EXTRACTING"),
            BotStage::Storing => write!(f, "STORING"),
            BotStage::Building => write!(f, "BUILDING"),
            BotStage::Publishing => write!(f, "PUBLISHING"),
            BotStage::Ready => write!(f, "READY"),
        }
    }
}

impl FromStr for BotStage {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DNE" => Ok(BotStage::DoesNotExist),
            "EXTRACTING" => Ok(BotStage::Extracting),
            "STORING" => Ok(BotStage::Storing),
            "BUILDING" => Ok(BotStage::Building),
            "PUBLISHING" => Ok(BotStage::Publishing),
            "READY" => Ok(BotStage::Ready),
            other => Err(BotError::InvalidStage(other.to_string())),
        }
    }
}

/// Tracker answer for a source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStatusReport {
    pub bot_name: BotName,
    pub stage: BotStage,
}
