//! Feedback gateway port
//!
//! The capability contract shared by every provider adapter and by the
//! router. Callers depend only on this trait, never on a concrete backend.

use async_trait::async_trait;
use coach_domain::{FeedbackRequest, FeedbackResult, ProviderKind};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Classification of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ProviderUnavailable,
    Timeout,
    RateLimit,
    InvalidRequest,
    ParseError,
    ValidationError,
    SafetyFilter,
    ApiError,
    UnknownError,
    MaxRetriesExceeded,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::RateLimit => "RATE_LIMIT",
            ErrorKind::InvalidRequest => "INVALID_REQUEST",
            ErrorKind::ParseError => "PARSE_ERROR",
            ErrorKind::ValidationError => "VALIDATION_ERROR",
            ErrorKind::SafetyFilter => "SAFETY_FILTER",
            ErrorKind::ApiError => "API_ERROR",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
            ErrorKind::MaxRetriesExceeded => "MAX_RETRIES_EXCEEDED",
            ErrorKind::Cancelled => "CANCELLED",
        }
    }

    /// Whether another attempt (same or different backend) can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimit
                | ErrorKind::Timeout
                | ErrorKind::ParseError
                | ErrorKind::ValidationError
                | ErrorKind::ApiError
        )
    }

    /// Failures caused by what the model produced rather than by transport.
    pub fn is_output_fault(&self) -> bool {
        matches!(self, ErrorKind::ParseError | ErrorKind::ValidationError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an error was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorOrigin {
    Provider(ProviderKind),
    Router,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorOrigin::Provider(kind) => write!(f, "{}", kind),
            ErrorOrigin::Router => f.write_str("router"),
        }
    }
}

/// A classified failure, propagated unchanged until a later recovery step
/// replaces it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{origin}] {kind}: {message}")]
pub struct OperationError {
    pub origin: ErrorOrigin,
    pub kind: ErrorKind,
    pub retryable: bool,
    pub message: String,
}

impl OperationError {
    /// Build an error whose `retryable` flag follows the kind.
    pub fn new(origin: ErrorOrigin, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            origin,
            kind,
            retryable: kind.is_retryable(),
            message: message.into(),
        }
    }

    pub fn provider(provider: ProviderKind, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::Provider(provider), kind, message)
    }

    pub fn router(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::Router, kind, message)
    }

    pub fn cancelled() -> Self {
        Self::router(ErrorKind::Cancelled, "Operation cancelled")
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind == ErrorKind::Cancelled
    }
}

/// Capability contract for text-generation backends
///
/// Implemented by each provider adapter and by the router, so callers
/// cannot tell whether they talk to one backend or to the router.
#[async_trait]
pub trait FeedbackGateway: Send + Sync {
    /// Produce validated feedback for a practice submission
    async fn generate_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<FeedbackResult, OperationError>;

    /// Produce a practice topic for a role (trimmed, at least 10 chars)
    async fn generate_topic(&self, role: &str) -> Result<String, OperationError>;

    /// [`generate_feedback`](Self::generate_feedback) that stops as soon as
    /// `cancel` fires.
    ///
    /// The in-flight future is dropped, which aborts any pending timer,
    /// backoff sleep or HTTP request underneath it.
    async fn generate_feedback_cancellable(
        &self,
        request: &FeedbackRequest,
        cancel: &CancellationToken,
    ) -> Result<FeedbackResult, OperationError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(OperationError::cancelled()),
            result = self.generate_feedback(request) => result,
        }
    }

    /// [`generate_topic`](Self::generate_topic) that stops as soon as
    /// `cancel` fires.
    async fn generate_topic_cancellable(
        &self,
        role: &str,
        cancel: &CancellationToken,
    ) -> Result<String, OperationError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(OperationError::cancelled()),
            result = self.generate_topic(role) => result,
        }
    }
}
