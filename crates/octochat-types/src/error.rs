use std::time::Duration;

use thiserror::Error;

/// Errors reported by the remote builder, dialog runtime, or bot tracker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("build failed: {0}")]
    BuildFailure(String),

    #[error("bot not ready: {0}")]
    NotReady(String),

    #[error("invalid bot: {0}")]
    InvalidBot(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl ServiceError {
    /// Whether this is the expected "still building" answer from the runtime.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, ServiceError::NotReady(_))
    }
}

/// Errors from session controller operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("source url is empty")]
    EmptyUrl,

    #[error("bot '{0}' is already attached to this session")]
    BotAlreadyAttached(String),

    #[error("build form is disabled")]
    BuildFormDisabled,

    #[error("no bot attached to this session")]
    NoBot,

    #[error("readiness task failed: {0}")]
    ReadinessTask(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Errors related to bot naming and tracker data.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("invalid source url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid bot name: {0}")]
    InvalidName(String),

    #[error("invalid bot stage: '{0}'")]
    InvalidStage(String),
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = ServiceError::NotReady("NotFoundException".to_string());
        assert_eq!(err.to_string(), "bot not ready: NotFoundException");
        assert!(err.is_not_ready());
        assert!(!ServiceError::AuthenticationFailed.is_not_ready());
    }

    #[test]
    fn test_session_error_wraps_service_error() {
        let err: SessionError = ServiceError::BuildFailure("unreachable url".to_string()).into();
        assert_eq!(err.to_string(), "build failed: unreachable url");
    }

    #[test]
    fn test_bot_error_display() {
        let err = BotError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("nope"));
        assert!(err.to_string().contains("relative URL"));
    }

    #[test]
    fn test_timeout_display() {
        let err = ServiceError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "request timed out after 30s");
    }
}
