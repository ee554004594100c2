//! Bot tracker client: build stage lookup and deletion by source URL.

use serde::Deserialize;

use octochat_core::naming::bot_name_from_url;
use octochat_core::remote::tracker::BotTracker;
use octochat_types::bot::{BotName, BotStage, BotStatusReport};
use octochat_types::error::ServiceError;

use super::{HttpAuth, error_body, transport_error};

/// HTTP client for the tracker's status and delete endpoints.
///
/// Either endpoint may be unconfigured; calling it then fails with a
/// transport error naming the missing endpoint.
pub struct TrackerClient {
    client: reqwest::Client,
    status_url: Option<String>,
    delete_url: Option<String>,
    auth: HttpAuth,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    bot_name: String,
    status: String,
}

impl TrackerClient {
    pub fn new(
        client: reqwest::Client,
        status_url: Option<String>,
        delete_url: Option<String>,
        auth: HttpAuth,
    ) -> Self {
        Self {
            client,
            status_url,
            delete_url,
            auth,
        }
    }

    fn endpoint<'a>(url: &'a Option<String>, what: &str) -> Result<&'a str, ServiceError> {
        url.as_deref()
            .ok_or_else(|| ServiceError::Transport(format!("no tracker {what} endpoint configured")))
    }
}

impl BotTracker for TrackerClient {
    async fn describe(&self, source_url: &str) -> Result<BotStatusReport, ServiceError> {
        let endpoint = Self::endpoint(&self.status_url, "status")?;
        let response = self
            .auth
            .apply(self.client.get(endpoint))
            .query(&[("url", source_url)])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.as_u16() == 400 {
            // Not tracked: report the name the builder would assign.
            let bot_name = bot_name_from_url(source_url)
                .map_err(|e| ServiceError::InvalidBot(e.to_string()))?;
            return Ok(BotStatusReport {
                bot_name,
                stage: BotStage::DoesNotExist,
            });
        }
        if !status.is_success() {
            let (status, body) = error_body(response).await;
            return Err(match status.as_u16() {
                401 | 403 => ServiceError::AuthenticationFailed,
                _ => ServiceError::Transport(format!("HTTP {status}: {body}")),
            });
        }

        let body: StatusResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Deserialization(format!("tracker status: {e}")))?;
        let bot_name =
            BotName::new(body.bot_name).map_err(|e| ServiceError::Deserialization(e.to_string()))?;
        let stage = body
            .status
            .parse::<BotStage>()
            .map_err(|e| ServiceError::Deserialization(e.to_string()))?;

        Ok(BotStatusReport { bot_name, stage })
    }

    async fn delete(&self, source_url: &str) -> Result<(), ServiceError> {
        let endpoint = Self::endpoint(&self.delete_url, "delete")?;
        let response = self
            .auth
            .apply(self.client.get(endpoint))
            .query(&[("url", source_url)])
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            tracing::info!(url = source_url, "Bot deletion scheduled");
            return Ok(());
        }
        let (status, body) = error_body(response).await;
        Err(match status.as_u16() {
            401 | 403 => ServiceError::AuthenticationFailed,
            _ => ServiceError::Transport(format!("deletion failed (HTTP {status}): {body}")),
        })
    }
}
