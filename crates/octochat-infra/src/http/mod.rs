//! HTTP clients for the remote services.
//!
//! All clients share one `reqwest::Client` and one [`HttpAuth`]. The access
//! token is wrapped in [`SecretString`] and only exposed while building the
//! request headers.

pub mod lambda;
pub mod lex;
pub mod tracker;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use octochat_types::error::ServiceError;

/// Header carrying the configured identity pool.
pub const IDENTITY_POOL_HEADER: &str = "x-identity-pool-id";

/// Credentials attached to every outgoing request.
#[derive(Clone, Default)]
pub struct HttpAuth {
    token: Option<Arc<SecretString>>,
    identity_pool_id: Option<String>,
}

impl HttpAuth {
    pub fn new(token: Option<SecretString>, identity_pool_id: Option<String>) -> Self {
        Self {
            token: token.map(Arc::new),
            identity_pool_id,
        }
    }

    /// No token and no identity pool.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };
        match &self.identity_pool_id {
            Some(pool) => request.header(IDENTITY_POOL_HEADER, pool),
            None => request,
        }
    }
}

impl fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAuth")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("identity_pool_id", &self.identity_pool_id)
            .finish()
    }
}

/// Build the shared HTTP client with a per-request timeout.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("octochat/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ServiceError::Transport(format!("failed to create HTTP client: {e}")))
}

pub(crate) fn transport_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(format!("HTTP request failed: {err}"))
}

/// Read the body of a failed response for error reporting.
pub(crate) async fn error_body(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    (status, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let auth = HttpAuth::new(
            Some(SecretString::from("super-secret-token")),
            Some("us-east-1:pool".to_string()),
        );
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("us-east-1:pool"));
        assert!(auth.has_token());
    }

    #[test]
    fn test_anonymous_has_no_token() {
        assert!(!HttpAuth::anonymous().has_token());
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
