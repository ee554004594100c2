//! Knowledge-base builder backed by a function-invocation endpoint.
//!
//! The builder function answers either with a gateway envelope
//! (`{"statusCode": 200, "body": "<json>"}`), with the result object itself,
//! or with a bare JSON string naming the bot. [`parse_builder_payload`]
//! accepts all three.

use serde::Deserialize;
use serde_json::Value;

use octochat_core::remote::builder::KnowledgeBaseBuilder;
use octochat_types::bot::BotName;
use octochat_types::build::{BuildRequest, BuildResult};
use octochat_types::error::ServiceError;

use super::{HttpAuth, error_body, transport_error};

/// HTTP client for the knowledge-base builder function.
pub struct LambdaBuilderClient {
    client: reqwest::Client,
    endpoint: String,
    auth: HttpAuth,
}

impl LambdaBuilderClient {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, auth: HttpAuth) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            auth,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl KnowledgeBaseBuilder for LambdaBuilderClient {
    async fn build(&self, request: &BuildRequest) -> Result<BuildResult, ServiceError> {
        tracing::debug!(endpoint = %self.endpoint, url = %request.source_url, "Invoking builder");

        let response = self
            .auth
            .apply(self.client.post(&self.endpoint))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let (status, body) = error_body(response).await;
            tracing::warn!(status = %status, body = %body, "Builder invocation failed");
            return Err(match status.as_u16() {
                401 | 403 => ServiceError::AuthenticationFailed,
                _ => ServiceError::Transport(format!("HTTP {status}: {body}")),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Deserialization(format!("builder payload: {e}")))?;
        parse_builder_payload(payload)
    }
}

#[derive(Debug, Default, Deserialize)]
struct BuilderBody {
    #[serde(default)]
    bot_name: Option<String>,
    #[serde(default)]
    already_made: Option<bool>,
    #[serde(default)]
    creating: Option<bool>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    succeeded: Option<bool>,
}

/// Interpret whatever the builder function returned.
pub fn parse_builder_payload(payload: Value) -> Result<BuildResult, ServiceError> {
    match payload {
        Value::String(name) => named_result(&name, false),
        Value::Object(mut map) if map.contains_key("statusCode") => {
            let status = map.get("statusCode").and_then(status_code);
            let body = match map.remove("body") {
                Some(Value::String(raw)) if raw.trim().is_empty() => Value::Null,
                Some(Value::String(raw)) => serde_json::from_str(&raw).map_err(|e| {
                    ServiceError::Deserialization(format!("builder envelope body: {e}"))
                })?,
                Some(inline) => inline,
                None => Value::Null,
            };

            if status != Some(200) {
                let message = body
                    .get("error_message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| match status {
                        Some(code) => format!("builder returned status {code}"),
                        None => "builder returned an unreadable status".to_string(),
                    });
                return Ok(BuildResult::failure(message));
            }
            if body.is_null() {
                return Ok(BuildResult::failure("builder returned an empty body"));
            }
            parse_builder_payload(body)
        }
        Value::Object(map) => {
            let body: BuilderBody = serde_json::from_value(Value::Object(map))
                .map_err(|e| ServiceError::Deserialization(format!("builder body: {e}")))?;
            body_result(body)
        }
        other => Err(ServiceError::Deserialization(format!(
            "unexpected builder payload: {other}"
        ))),
    }
}

fn status_code(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn body_result(body: BuilderBody) -> Result<BuildResult, ServiceError> {
    if let Some(message) = body.error_message.filter(|m| !m.trim().is_empty()) {
        return Ok(BuildResult::failure(message));
    }
    if body.succeeded == Some(false) {
        return Ok(BuildResult::failure("builder reported failure"));
    }
    if body.creating == Some(true) {
        tracing::debug!("Builder started a new knowledge base");
    }
    match body.bot_name {
        Some(name) => named_result(&name, body.already_made.unwrap_or(false)),
        None => Ok(BuildResult::failure("builder response carried no bot name")),
    }
}

fn named_result(name: &str, already_existed: bool) -> Result<BuildResult, ServiceError> {
    match BotName::new(name) {
        Ok(bot_name) => Ok(BuildResult::success(bot_name).with_already_existed(already_existed)),
        Err(_) => Ok(BuildResult::failure("builder returned an empty bot name")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bot(result: &BuildResult) -> Option<&str> {
        result.bot_name.as_ref().map(|n| n.as_str())
    }

    #[test]
    fn test_bare_string_is_bot_name() {
        let result = parse_builder_payload(json!("kb-42")).unwrap();
        assert!(result.succeeded);
        assert_eq!(bot(&result), Some("kb-42"));
        assert!(!result.already_existed);
    }

    #[test]
    fn test_envelope_with_string_body() {
        let payload = json!({
            "statusCode": 200,
            "body": "{\"already_made\": true, \"creating\": false, \"bot_name\": \"Examplecomdo\", \"error_message\": \"\"}"
        });
        let result = parse_builder_payload(payload).unwrap();
        assert!(result.succeeded);
        assert_eq!(bot(&result), Some("Examplecomdo"));
        assert!(result.already_existed);
    }

    #[test]
    fn test_envelope_status_as_string() {
        let payload = json!({"statusCode": "200", "body": {"bot_name": "kb-1"}});
        let result = parse_builder_payload(payload).unwrap();
        assert_eq!(bot(&result), Some("kb-1"));
    }

    #[test]
    fn test_envelope_error_status() {
        let payload = json!({
            "statusCode": 500,
            "body": "{\"error_message\": \"could not crawl site\"}"
        });
        let result = parse_builder_payload(payload).unwrap();
        assert!(!result.succeeded);
        assert_eq!(result.error_message.as_deref(), Some("could not crawl site"));

        let bare = parse_builder_payload(json!({"statusCode": 502})).unwrap();
        assert_eq!(
            bare.error_message.as_deref(),
            Some("builder returned status 502")
        );
    }

    #[test]
    fn test_body_error_message_wins() {
        let payload = json!({"bot_name": "kb-42", "error_message": "quota exceeded"});
        let result = parse_builder_payload(payload).unwrap();
        assert!(!result.succeeded);
        assert_eq!(result.error_message.as_deref(), Some("quota exceeded"));
    }

    #[test]
    fn test_missing_or_blank_name_is_failure() {
        assert!(!parse_builder_payload(json!({"creating": true})).unwrap().succeeded);
        assert!(!parse_builder_payload(json!("   ")).unwrap().succeeded);
    }

    #[test]
    fn test_unexpected_payload() {
        assert!(matches!(
            parse_builder_payload(json!([1, 2, 3])),
            Err(ServiceError::Deserialization(_))
        ));
        assert!(matches!(
            parse_builder_payload(json!({"statusCode": 200, "body": "not json"})),
            Err(ServiceError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn test_build_posts_source_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invocations"))
            .and(body_json(json!({"url": "http://example.com/docs"})))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusCode": 200,
                "body": "{\"bot_name\": \"kb-42\", \"already_made\": false}"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LambdaBuilderClient::new(
            reqwest::Client::new(),
            format!("{}/invocations", server.uri()),
            HttpAuth::new(Some("test-token".into()), None),
        );
        let result = client
            .build(&BuildRequest::new("http://example.com/docs"))
            .await
            .unwrap();
        assert_eq!(bot(&result), Some("kb-42"));
    }

    #[tokio::test]
    async fn test_build_maps_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/denied"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let request = BuildRequest::new("http://example.com");
        let denied = LambdaBuilderClient::new(
            reqwest::Client::new(),
            format!("{}/denied", server.uri()),
            HttpAuth::anonymous(),
        );
        assert!(matches!(
            denied.build(&request).await,
            Err(ServiceError::AuthenticationFailed)
        ));

        let broken = LambdaBuilderClient::new(
            reqwest::Client::new(),
            format!("{}/broken", server.uri()),
            HttpAuth::anonymous(),
        );
        match broken.build(&request).await {
            Err(ServiceError::Transport(message)) => assert!(message.contains("boom")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
