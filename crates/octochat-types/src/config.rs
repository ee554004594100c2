//! Configuration types for Octochat.
//!
//! `OctochatConfig` represents the top-level `config.toml`: service region,
//! remote endpoints, credential references, readiness polling policy, and
//! UI policies. All fields have defaults, so an empty file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the Octochat client.
///
/// Loaded from `~/.octochat/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctochatConfig {
    /// Cloud region hosting the builder function and dialog runtime.
    #[serde(default = "default_region")]
    pub region: String,

    /// Alias of the published bot version to talk to.
    #[serde(default = "default_bot_alias")]
    pub bot_alias: String,

    /// Constant user id sent with every dialog turn.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Timeout for build and message requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// What happens to the build form after a failed build.
    #[serde(default)]
    pub build_failure: BuildFailurePolicy,

    /// How bot replies are rendered.
    #[serde(default)]
    pub render: RenderMode,

    #[serde(default)]
    pub endpoints: EndpointConfig,

    #[serde(default)]
    pub credentials: CredentialConfig,

    #[serde(default)]
    pub polling: PollingConfig,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_bot_alias() -> String {
    "DEV".to_string()
}

fn default_user_id() -> String {
    "demo-webapp-id".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for OctochatConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            bot_alias: default_bot_alias(),
            user_id: default_user_id(),
            request_timeout_secs: default_request_timeout_secs(),
            build_failure: BuildFailurePolicy::default(),
            render: RenderMode::default(),
            endpoints: EndpointConfig::default(),
            credentials: CredentialConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

impl OctochatConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builder invocation URL: the configured one, or the region's
    /// function-invocation endpoint for `CreateAzureKnowledgeBase`.
    pub fn builder_url(&self) -> String {
        self.endpoints.builder_url.clone().unwrap_or_else(|| {
            format!(
                "https://lambda.{}.amazonaws.com/2015-03-31/functions/CreateAzureKnowledgeBase/invocations",
                self.region
            )
        })
    }

    /// Dialog runtime base URL: the configured one, or the region's runtime host.
    pub fn runtime_url(&self) -> String {
        self.endpoints
            .runtime_url
            .clone()
            .unwrap_or_else(|| format!("https://runtime.lex.{}.amazonaws.com", self.region))
    }

    /// Reject settings that would make the client spin or never time out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid("region must not be empty".to_string()));
        }
        if self.bot_alias.trim().is_empty() {
            return Err(ConfigError::Invalid("bot_alias must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.polling.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "polling.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.polling.max_attempts == Some(0) {
            return Err(ConfigError::Invalid(
                "polling.max_attempts must be greater than zero when set".to_string(),
            ));
        }
        if self.polling.probe_text.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "polling.probe_text must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Remote endpoints. Unset builder/runtime URLs are derived from the region;
/// the tracker endpoints have no default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub builder_url: Option<String>,
    pub runtime_url: Option<String>,
    pub status_url: Option<String>,
    pub delete_url: Option<String>,
}

/// Credential references. The token itself never lives in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Identity pool the credentials are issued from.
    pub identity_pool_id: Option<String>,

    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_token_env() -> String {
    "OCTOCHAT_ACCESS_TOKEN".to_string()
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            identity_pool_id: None,
            token_env: default_token_env(),
        }
    }
}

/// Readiness polling policy. Unset limits mean "poll until ready".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    pub max_attempts: Option<u32>,

    /// Overall deadline for the readiness wait, in seconds.
    pub deadline_secs: Option<u64>,

    /// Sentinel input sent to the runtime as a probe.
    #[serde(default = "default_probe_text")]
    pub probe_text: String,
}

fn default_interval_secs() -> u64 {
    3
}

fn default_probe_text() -> String {
    "Hello".to_string()
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            max_attempts: None,
            deadline_secs: None,
            probe_text: default_probe_text(),
        }
    }
}

/// Build form behaviour after a failed build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildFailurePolicy {
    /// Re-enable the form so the user can submit another URL.
    #[default]
    ReenableForm,
    /// Leave the form disabled for the rest of the session.
    KeepDisabled,
}

/// Reply rendering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    #[default]
    Markdown,
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = OctochatConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.bot_alias, "DEV");
        assert_eq!(config.user_id, "demo-webapp-id");
        assert_eq!(config.polling.interval_secs, 3);
        assert_eq!(config.polling.max_attempts, None);
        assert_eq!(config.build_failure, BuildFailurePolicy::ReenableForm);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: OctochatConfig = toml::from_str("").unwrap();
        assert_eq!(config, OctochatConfig::default());
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
region = "eu-west-1"
build_failure = "keep_disabled"
render = "plain"

[endpoints]
status_url = "https://api.example.com/status"

[credentials]
identity_pool_id = "eu-west-1:pool"

[polling]
interval_secs = 5
max_attempts = 40
"#;
        let config: OctochatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.build_failure, BuildFailurePolicy::KeepDisabled);
        assert_eq!(config.render, RenderMode::Plain);
        assert_eq!(
            config.endpoints.status_url.as_deref(),
            Some("https://api.example.com/status")
        );
        assert_eq!(config.credentials.token_env, "OCTOCHAT_ACCESS_TOKEN");
        assert_eq!(config.polling.interval_secs, 5);
        assert_eq!(config.polling.max_attempts, Some(40));
        assert_eq!(config.polling.probe_text, "Hello");
    }

    #[test]
    fn test_derived_urls_follow_region() {
        let config = OctochatConfig {
            region: "ap-south-1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.runtime_url(), "https://runtime.lex.ap-south-1.amazonaws.com");
        assert!(config.builder_url().starts_with("https://lambda.ap-south-1.amazonaws.com/"));
        assert!(config.builder_url().ends_with("/CreateAzureKnowledgeBase/invocations"));
    }

    #[test]
    fn test_explicit_urls_win() {
        let mut config = OctochatConfig::default();
        config.endpoints.runtime_url = Some("http://localhost:9000".to_string());
        assert_eq!(config.runtime_url(), "http://localhost:9000");
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = OctochatConfig::default();
        config.polling.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts_and_timeout() {
        let mut config = OctochatConfig::default();
        config.polling.max_attempts = Some(0);
        assert!(config.validate().is_err());

        let mut config = OctochatConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
