//! Error classification and output decoding shared by every adapter.

use coach_application::{ErrorKind, OperationError};
use coach_domain::util::preview;
use coach_domain::{DecodeError, FeedbackResult, ProviderKind, decode_feedback, validate_topic};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Characters of raw output kept in log lines.
const LOG_PREVIEW_CHARS: usize = 200;

/// Default error kind for an HTTP status, before any body-specific refinement.
pub(crate) fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status.as_u16() {
        429 => ErrorKind::RateLimit,
        408 => ErrorKind::Timeout,
        400 | 401 | 403 | 404 | 413 | 422 => ErrorKind::InvalidRequest,
        500..=599 => ErrorKind::ApiError,
        _ => ErrorKind::UnknownError,
    }
}

/// Classify a failure raised by the HTTP client itself (connect, DNS, body read).
pub(crate) fn transport_error(provider: ProviderKind, err: &reqwest::Error) -> OperationError {
    let kind = if err.is_timeout() {
        ErrorKind::Timeout
    } else if err.is_decode() {
        ErrorKind::ParseError
    } else {
        ErrorKind::ApiError
    };
    OperationError::provider(provider, kind, format!("{} API error: {}", provider, err))
}

/// Strip fences, parse and validate feedback text returned by `provider`.
pub(crate) fn feedback_from_text(
    provider: ProviderKind,
    raw: &str,
) -> Result<FeedbackResult, OperationError> {
    debug!(%provider, chars = raw.len(), "Decoding feedback response");
    decode_feedback(raw).map_err(|e| {
        warn!(%provider, raw = %preview(raw, LOG_PREVIEW_CHARS), "Rejected feedback response: {}", e);
        let kind = match e {
            DecodeError::Parse(_) => ErrorKind::ParseError,
            DecodeError::Invalid(_) => ErrorKind::ValidationError,
        };
        OperationError::provider(provider, kind, e.to_string())
    })
}

/// Validate topic text returned by `provider`.
pub(crate) fn topic_from_text(provider: ProviderKind, raw: &str) -> Result<String, OperationError> {
    validate_topic(raw).map_err(|e| {
        warn!(%provider, raw = %preview(raw, LOG_PREVIEW_CHARS), "Rejected topic response: {}", e);
        OperationError::provider(provider, ErrorKind::ValidationError, e.to_string())
    })
}
