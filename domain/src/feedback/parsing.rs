//! Decoding raw provider text into validated feedback.
//!
//! Models frequently wrap JSON in a Markdown code fence even when told not
//! to, so the fence is stripped before parsing.

use super::entities::FeedbackResult;
use super::validation::{ValidationError, validate_feedback};
use thiserror::Error;

/// Why raw provider text could not be turned into a [`FeedbackResult`]
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to parse response as JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Strip one enclosing triple-backtick fence, with or without a language tag.
///
/// Text that does not start with a fence is returned trimmed and otherwise
/// untouched.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    let tag_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let body = rest[tag_len..].trim_end();
    let body = body.strip_suffix("```").unwrap_or(body);

    body.trim()
}

/// Strip fences, parse as JSON and run the output validator.
pub fn decode_feedback(raw: &str) -> Result<FeedbackResult, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(raw))?;
    Ok(validate_feedback(&value)?)
}
