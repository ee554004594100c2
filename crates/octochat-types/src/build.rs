//! Knowledge-base build request and result types.

use serde::{Deserialize, Serialize};

use crate::bot::BotName;

/// Request sent to the remote knowledge-base builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    /// Source URL the knowledge base is extracted from.
    #[serde(rename = "url")]
    pub source_url: String,
}

impl BuildRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }
}

/// Outcome reported by the builder for one build request.
///
/// `succeeded` with a `bot_name` is the only shape that attaches a bot to
/// the session; every other combination is a build failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub succeeded: bool,
    pub bot_name: Option<BotName>,
    pub error_message: Option<String>,
    /// The builder already had a bot for this source and did not rebuild it.
    #[serde(default)]
    pub already_existed: bool,
}

impl BuildResult {
    pub fn success(bot_name: BotName) -> Self {
        Self {
            succeeded: true,
            bot_name: Some(bot_name),
            error_message: None,
            already_existed: false,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            bot_name: None,
            error_message: Some(message.into()),
            already_existed: false,
        }
    }

    pub fn with_already_existed(mut self, already_existed: bool) -> Self {
        self.already_existed = already_existed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_serializes_as_url() {
        let req = BuildRequest::new("http://example.com/faq");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "url": "http://example.com/faq" }));
    }

    #[test]
    fn test_success_and_failure_constructors() {
        let ok = BuildResult::success(BotName::new("kb-42").unwrap());
        assert!(ok.succeeded);
        assert_eq!(ok.bot_name.unwrap().as_str(), "kb-42");

        let failed = BuildResult::failure("page unreachable");
        assert!(!failed.succeeded);
        assert!(failed.bot_name.is_none());
        assert_eq!(failed.error_message.as_deref(), Some("page unreachable"));
    }
}
