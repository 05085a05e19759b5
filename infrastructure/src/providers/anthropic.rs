//! Anthropic provider adapter
//!
//! Talks to the Messages API (`POST /v1/messages`) and classifies every
//! failure into an [`ErrorKind`] the router can act on.

use super::response::{feedback_from_text, kind_for_status, topic_from_text, transport_error};
use super::ProviderAdapter;
use async_trait::async_trait;
use coach_application::{ErrorKind, FeedbackGateway, OperationError};
use coach_domain::{
    AnthropicProviderConfig, FeedbackRequest, FeedbackResult, GenerationParams, PromptTemplate,
    ProviderKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const PROVIDER: ProviderKind = ProviderKind::Anthropic;

#[derive(Error, Debug)]
pub enum AnthropicInitError {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
}

// ==================== Adapter ====================

pub struct AnthropicProviderAdapter {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    api_version: String,
}

impl AnthropicProviderAdapter {
    /// Create an adapter from config. The key must be present and non-blank.
    pub fn new(config: &AnthropicProviderConfig) -> Result<Self, AnthropicInitError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AnthropicInitError::MissingApiKey)?
            .to_string();

        Ok(Self {
            client: reqwest::Client::builder().build()?,
            api_key,
            endpoint: format!("{}/v1/messages", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_version: config.api_version.clone(),
        })
    }

    /// Like [`new`](Self::new), but logs and returns `None` when the adapter
    /// cannot be built. Used during startup registration.
    pub fn try_new(config: &AnthropicProviderConfig) -> Option<Self> {
        match Self::new(config) {
            Ok(adapter) => {
                info!(model = %adapter.model, "Anthropic provider initialized");
                Some(adapter)
            }
            Err(e) => {
                warn!("Anthropic provider not available: {}", e);
                None
            }
        }
    }

    async fn complete(&self, prompt: &str, params: GenerationParams) -> Result<String, OperationError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system: PromptTemplate::system(PROVIDER),
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, max_tokens = params.max_tokens, "Sending Anthropic request");
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;

        if !status.is_success() {
            return Err(classify_error(status, &text));
        }

        let parsed: MessagesResponse = serde_json::from_str(&text).map_err(|e| {
            OperationError::provider(
                PROVIDER,
                ErrorKind::ParseError,
                format!("Unexpected Anthropic response body: {}", e),
            )
        })?;

        if parsed.stop_reason.as_deref() == Some("refusal") {
            return Err(OperationError::provider(
                PROVIDER,
                ErrorKind::SafetyFilter,
                "Response blocked by Anthropic safety filters",
            ));
        }

        match parsed.content.into_iter().next() {
            Some(ContentBlock::Text { text }) => Ok(text),
            Some(ContentBlock::Other) => Err(OperationError::provider(
                PROVIDER,
                ErrorKind::ParseError,
                "Unexpected response format from Anthropic",
            )),
            None => Err(OperationError::provider(
                PROVIDER,
                ErrorKind::ParseError,
                "Anthropic returned no content",
            )),
        }
    }
}

/// Map a non-2xx response onto an error kind, preferring the typed error body.
fn classify_error(status: reqwest::StatusCode, body: &str) -> OperationError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let kind = match envelope.as_ref().map(|e| e.error.kind.as_str()) {
        Some("rate_limit_error") => ErrorKind::RateLimit,
        Some("overloaded_error") | Some("api_error") => ErrorKind::ApiError,
        Some("invalid_request_error")
        | Some("authentication_error")
        | Some("permission_error")
        | Some("not_found_error")
        | Some("request_too_large") => ErrorKind::InvalidRequest,
        _ => kind_for_status(status),
    };
    let detail = match envelope {
        Some(e) if !e.error.message.is_empty() => e.error.message,
        _ => status.to_string(),
    };
    OperationError::provider(PROVIDER, kind, format!("Anthropic API error: {}", detail))
}

#[async_trait]
impl FeedbackGateway for AnthropicProviderAdapter {
    async fn generate_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<FeedbackResult, OperationError> {
        let prompt = PromptTemplate::feedback(request);
        let text = self.complete(&prompt, GenerationParams::FEEDBACK).await?;
        feedback_from_text(PROVIDER, &text)
    }

    async fn generate_topic(&self, role: &str) -> Result<String, OperationError> {
        let prompt = PromptTemplate::topic(role);
        let text = self.complete(&prompt, GenerationParams::TOPIC).await?;
        topic_from_text(PROVIDER, &text)
    }
}

impl ProviderAdapter for AnthropicProviderAdapter {
    fn kind(&self) -> ProviderKind {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> AnthropicProviderAdapter {
        AnthropicProviderAdapter::new(&AnthropicProviderConfig {
            api_key: Some("test-key".into()),
            base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    fn request() -> FeedbackRequest {
        FeedbackRequest::new(
            "Budget review",
            "Secure funding",
            vec!["Costs".into(), "Savings".into()],
            "We can save ten percent by consolidating vendors.",
        )
    }

    fn text_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{ "type": "text", "text": text }],
            "stop_reason": "end_turn"
        }))
    }

    const VALID_FEEDBACK: &str = r#"```json
{"score": 7, "strengths": ["Concise"], "improvements": ["Add numbers"],
 "improvedVersions": {"topic": "Budget", "mainPoints": ["Costs"], "pitch": "Better"}}
```"#;

    #[test]
    fn missing_key_is_rejected() {
        assert!(matches!(
            AnthropicProviderAdapter::new(&AnthropicProviderConfig::default()),
            Err(AnthropicInitError::MissingApiKey)
        ));
        assert!(AnthropicProviderAdapter::try_new(&AnthropicProviderConfig::default()).is_none());
    }

    #[tokio::test]
    async fn sends_headers_and_decodes_fenced_feedback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "test-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(body_partial_json(json!({
                "model": "claude-3-haiku-20240307",
                "max_tokens": 4000
            })))
            .respond_with(text_reply(VALID_FEEDBACK))
            .expect(1)
            .mount(&server)
            .await;

        let result = adapter(&server).generate_feedback(&request()).await.unwrap();
        assert_eq!(result.score, 7.0);
        assert_eq!(result.improved_version.main_points, vec!["Costs"]);
    }

    #[tokio::test]
    async fn topic_request_uses_topic_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(json!({ "max_tokens": 200 })))
            .respond_with(text_reply("  Pitching a new onboarding flow to product leads  "))
            .mount(&server)
            .await;

        let topic = adapter(&server).generate_topic("Designer").await.unwrap();
        assert_eq!(topic, "Pitching a new onboarding flow to product leads");
    }

    #[tokio::test]
    async fn rate_limit_body_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "type": "error",
                "error": { "type": "rate_limit_error", "message": "Slow down" }
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).generate_feedback(&request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert!(err.retryable);
        assert!(err.message.contains("Slow down"));
    }

    #[tokio::test]
    async fn auth_failure_is_not_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "type": "error",
                "error": { "type": "authentication_error", "message": "invalid x-api-key" }
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).generate_topic("Nurse").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
        assert!(!err.retryable);
    }

    #[tokio::test]
    async fn overloaded_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_json(json!({
                "type": "error",
                "error": { "type": "overloaded_error", "message": "Overloaded" }
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).generate_feedback(&request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
        assert!(err.retryable);
    }

    #[tokio::test]
    async fn non_text_block_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "tool_use", "id": "t1", "name": "x", "input": {} }],
                "stop_reason": "tool_use"
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).generate_feedback(&request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
    }

    #[tokio::test]
    async fn refusal_is_safety_filter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{ "type": "text", "text": "" }],
                "stop_reason": "refusal"
            })))
            .mount(&server)
            .await;

        let err = adapter(&server).generate_feedback(&request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::SafetyFilter);
        assert!(!err.retryable);
    }

    #[tokio::test]
    async fn invalid_feedback_is_validation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(text_reply(r#"{"score": 15, "strengths": ["a"], "improvements": ["b"], "improvedVersions": {"topic": "t", "mainPoints": ["m"], "pitch": "p"}}"#))
            .mount(&server)
            .await;

        let err = adapter(&server).generate_feedback(&request()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationError);
        assert_eq!(err.origin, coach_application::ErrorOrigin::Provider(ProviderKind::Anthropic));
    }
}
