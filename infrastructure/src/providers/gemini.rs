//! Google Gemini provider adapter
//!
//! Calls `models/{model}:generateContent` on the Generative Language API.

use super::response::{feedback_from_text, kind_for_status, topic_from_text, transport_error};
use super::ProviderAdapter;
use async_trait::async_trait;
use coach_application::{ErrorKind, FeedbackGateway, OperationError};
use coach_domain::{
    FeedbackRequest, FeedbackResult, GeminiProviderConfig, GenerationParams, PromptTemplate,
    ProviderKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const PROVIDER: ProviderKind = ProviderKind::Gemini;

/// Finish reasons that mean the output was withheld.
const BLOCKED_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

#[derive(Error, Debug)]
pub enum GeminiInitError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

// ==================== Adapter ====================

pub struct GeminiProviderAdapter {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl GeminiProviderAdapter {
    pub fn new(config: &GeminiProviderConfig) -> Result<Self, GeminiInitError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(GeminiInitError::MissingApiKey)?
            .to_string();

        Ok(Self {
            client: reqwest::Client::builder().build()?,
            api_key,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            model: config.model.clone(),
        })
    }

    pub fn try_new(config: &GeminiProviderConfig) -> Option<Self> {
        match Self::new(config) {
            Ok(adapter) => {
                info!(model = %adapter.model, "Gemini provider initialized");
                Some(adapter)
            }
            Err(e) => {
                warn!("Gemini provider not available: {}", e);
                None
            }
        }
    }

    async fn complete(&self, prompt: &str, params: GenerationParams) -> Result<String, OperationError> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: PromptTemplate::system(PROVIDER),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
                candidate_count: 1,
            },
        };

        debug!(model = %self.model, max_tokens = params.max_tokens, "Sending Gemini request");
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
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

        let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|e| {
            OperationError::provider(
                PROVIDER,
                ErrorKind::ParseError,
                format!("Unexpected Gemini response body: {}", e),
            )
        })?;

        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, OperationError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(safety_error(&reason));
    }

    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        OperationError::provider(PROVIDER, ErrorKind::ParseError, "Gemini returned no candidates")
    })?;

    if let Some(reason) = candidate.finish_reason.as_deref()
        && BLOCKED_FINISH_REASONS.contains(&reason)
    {
        return Err(safety_error(reason));
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(OperationError::provider(
            PROVIDER,
            ErrorKind::ParseError,
            "Gemini returned an empty response",
        ));
    }
    Ok(text)
}

fn safety_error(reason: &str) -> OperationError {
    OperationError::provider(
        PROVIDER,
        ErrorKind::SafetyFilter,
        format!("Response blocked by Gemini safety filters ({})", reason),
    )
}

fn classify_error(status: reqwest::StatusCode, body: &str) -> OperationError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let kind = match envelope.as_ref() {
        Some(e) if e.error.status == "RESOURCE_EXHAUSTED" => ErrorKind::RateLimit,
        Some(e)
            if matches!(
                e.error.status.as_str(),
                "INVALID_ARGUMENT" | "FAILED_PRECONDITION" | "PERMISSION_DENIED" | "UNAUTHENTICATED"
            ) || e.error.message.contains("API key") =>
        {
            ErrorKind::InvalidRequest
        }
        Some(e)
            if matches!(
                e.error.status.as_str(),
                "UNAVAILABLE" | "INTERNAL" | "DEADLINE_EXCEEDED"
            ) =>
        {
            ErrorKind::ApiError
        }
        _ => kind_for_status(status),
    };
    let detail = match envelope {
        Some(e) if !e.error.message.is_empty() => e.error.message,
        _ => status.to_string(),
    };
    OperationError::provider(PROVIDER, kind, format!("Gemini API error: {}", detail))
}

#[async_trait]
impl FeedbackGateway for GeminiProviderAdapter {
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

impl ProviderAdapter for GeminiProviderAdapter {
    fn kind(&self) -> ProviderKind {
        PROVIDER
    }
}
