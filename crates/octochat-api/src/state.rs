//! Application state wiring the HTTP clients together.
//!
//! AppState holds the loaded configuration and the concrete remote clients.
//! The session controller is generic over the builder and runtime traits;
//! AppState pins it to the HTTP implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use octochat_core::session::controller::{ControllerSettings, SessionController};
use octochat_infra::config::{CONFIG_FILE, load_effective_config, resolve_access_token, resolve_config_dir};
use octochat_infra::http::lambda::LambdaBuilderClient;
use octochat_infra::http::lex::LexRuntimeClient;
use octochat_infra::http::tracker::TrackerClient;
use octochat_infra::http::{HttpAuth, build_client};
use octochat_types::config::OctochatConfig;

/// Controller pinned to the HTTP clients.
pub type ConcreteController = SessionController<LambdaBuilderClient, LexRuntimeClient>;

/// Shared application state for all commands.
pub struct AppState {
    pub config: OctochatConfig,
    pub config_path: PathBuf,
    pub auth: HttpAuth,
    pub builder: Arc<LambdaBuilderClient>,
    pub runtime: Arc<LexRuntimeClient>,
    pub tracker: TrackerClient,
}

impl AppState {
    /// Load configuration and build the remote clients.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => resolve_config_dir().join(CONFIG_FILE),
        };
        let config = load_effective_config(Some(&config_path)).await?;

        let token = resolve_access_token(&config, |name| std::env::var(name).ok());
        if token.is_none() {
            tracing::debug!(
                var = %config.credentials.token_env,
                "No access token set, sending unauthenticated requests"
            );
        }
        let auth = HttpAuth::new(token, config.credentials.identity_pool_id.clone());

        let client = build_client(config.request_timeout())?;
        let builder = LambdaBuilderClient::new(client.clone(), config.builder_url(), auth.clone());
        let runtime = LexRuntimeClient::new(
            client.clone(),
            config.runtime_url(),
            config.bot_alias.clone(),
            auth.clone(),
        );
        let tracker = TrackerClient::new(
            client,
            config.endpoints.status_url.clone(),
            config.endpoints.delete_url.clone(),
            auth.clone(),
        );

        Ok(Self {
            config,
            config_path,
            auth,
            builder: Arc::new(builder),
            runtime: Arc::new(runtime),
            tracker,
        })
    }

    /// A fresh session controller for one build/chat session.
    pub fn controller(&self) -> ConcreteController {
        SessionController::new(
            Arc::clone(&self.builder),
            Arc::clone(&self.runtime),
            ControllerSettings::from_config(&self.config),
        )
    }
}
