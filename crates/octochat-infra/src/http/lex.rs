//! Dialog runtime client: one text turn per call.

use serde::{Deserialize, Serialize};
use url::Url;

use octochat_core::remote::dialog::DialogRuntime;
use octochat_types::chat::{DialogReply, DialogRequest};
use octochat_types::error::ServiceError;

use super::{HttpAuth, error_body, transport_error};

/// HTTP client for the dialog runtime's post-text operation.
pub struct LexRuntimeClient {
    client: reqwest::Client,
    base_url: String,
    alias: String,
    auth: HttpAuth,
}

#[derive(Debug, Serialize)]
struct PostTextBody<'a> {
    #[serde(rename = "inputText")]
    input_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostTextResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "dialogState")]
    dialog_state: Option<String>,
}

impl LexRuntimeClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        alias: impl Into<String>,
        auth: HttpAuth,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            alias: alias.into(),
            auth,
        }
    }

    /// `{base}/bot/{bot}/alias/{alias}/user/{user}/text`, each segment
    /// percent-encoded.
    pub fn text_url(&self, request: &DialogRequest) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ServiceError::Transport(format!("invalid runtime url '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ServiceError::Transport(format!("runtime url '{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend([
                "bot",
                request.bot_name.as_str(),
                "alias",
                self.alias.as_str(),
                "user",
                request.user_id.as_str(),
                "text",
            ]);
        Ok(url)
    }
}

impl DialogRuntime for LexRuntimeClient {
    async fn post_text(&self, request: &DialogRequest) -> Result<DialogReply, ServiceError> {
        let url = self.text_url(request)?;
        let body = PostTextBody {
            input_text: &request.input_text,
        };

        let response = self
            .auth
            .apply(self.client.post(url))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            return Err(match status.as_u16() {
                404 => ServiceError::NotReady(format!("bot '{}' not found: {body}", request.bot_name)),
                400 => ServiceError::InvalidBot(body),
                401 | 403 => ServiceError::AuthenticationFailed,
                _ => ServiceError::Transport(format!("HTTP {status}: {body}")),
            });
        }

        let reply: PostTextResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Deserialization(format!("runtime reply: {e}")))?;

        Ok(DialogReply {
            reply_text: reply.message.unwrap_or_default(),
            dialog_state: reply.dialog_state,
        })
    }
}
