//! Configuration loader for Octochat.
//!
//! Reads `config.toml` from the config directory (`~/.octochat/` unless
//! `OCTOCHAT_HOME` says otherwise) and deserializes it into
//! [`OctochatConfig`]. Falls back to defaults when the file is missing or
//! malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use octochat_types::config::OctochatConfig;
use octochat_types::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the config directory.
///
/// Priority: `OCTOCHAT_HOME`, then `~/.octochat`, then `./.octochat`.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("OCTOCHAT_HOME") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".octochat");
    }

    PathBuf::from(".octochat")
}

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`OctochatConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
pub async fn load_config(path: &Path) -> OctochatConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return OctochatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return OctochatConfig::default();
        }
    };

    match toml::from_str::<OctochatConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            OctochatConfig::default()
        }
    }
}

/// Override fields from `OCTOCHAT_*` variables returned by `lookup`.
pub fn apply_env_overrides<F>(config: &mut OctochatConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(region) = var("OCTOCHAT_REGION") {
        config.region = region;
    }
    if let Some(url) = var("OCTOCHAT_BUILDER_URL") {
        config.endpoints.builder_url = Some(url);
    }
    if let Some(url) = var("OCTOCHAT_RUNTIME_URL") {
        config.endpoints.runtime_url = Some(url);
    }
    if let Some(alias) = var("OCTOCHAT_BOT_ALIAS") {
        config.bot_alias = alias;
    }
}

/// Load, override from the process environment, and validate.
///
/// `explicit` is a `--config` path; without one the file is looked up in
/// [`resolve_config_dir`].
pub async fn load_effective_config(explicit: Option<&Path>) -> Result<OctochatConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => resolve_config_dir().join(CONFIG_FILE),
    };

    let mut config = load_config(&path).await;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config.validate()?;

    tracing::debug!(path = %path.display(), region = %config.region, "Configuration loaded");
    Ok(config)
}

/// Read the access token from the variable named by `credentials.token_env`.
pub fn resolve_access_token<F>(config: &OctochatConfig, lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&config.credentials.token_env)
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .map(SecretString::from)
}
