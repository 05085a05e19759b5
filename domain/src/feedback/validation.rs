//! Output contract checks for provider responses.
//!
//! Provider output is untyped, model-generated JSON. Nothing reaches the
//! rest of the system until it has passed through [`validate_feedback`] or
//! [`validate_topic`]. Checks run in a fixed order and stop at the first
//! violation.

use super::entities::{FeedbackResult, ImprovedVersion, MAX_SCORE, MIN_SCORE};
use serde_json::Value;
use thiserror::Error;

/// Minimum length (in characters, after trimming) of a generated topic.
pub const MIN_TOPIC_CHARS: usize = 10;

/// A violation of the provider output contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Response is not an object")]
    NotAnObject,

    #[error("Score must be a number between 1-10, got {0}")]
    InvalidScore(String),

    #[error("{0} must be a non-empty array of strings")]
    EmptyList(&'static str),

    #[error("improvedVersions must be an object")]
    MissingImprovedVersions,

    #[error("{0} must be a non-empty string")]
    BlankText(&'static str),

    #[error("Generated topic is too short ({actual} chars, minimum {min})")]
    TopicTooShort { actual: usize, min: usize },
}

/// Validate a parsed provider response and build a [`FeedbackResult`] from it.
pub fn validate_feedback(value: &Value) -> Result<FeedbackResult, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let score = match object.get("score") {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(s) if (MIN_SCORE..=MAX_SCORE).contains(&s) => s,
            _ => return Err(ValidationError::InvalidScore(n.to_string())),
        },
        Some(other) => return Err(ValidationError::InvalidScore(other.to_string())),
        None => return Err(ValidationError::InvalidScore("missing".to_string())),
    };

    let strengths = string_list(object.get("strengths"), "strengths")?;
    let improvements = string_list(object.get("improvements"), "improvements")?;

    let improved = object
        .get("improvedVersions")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingImprovedVersions)?;

    let topic = non_blank(improved.get("topic"), "improvedVersions.topic")?;
    let main_points = string_list(improved.get("mainPoints"), "improvedVersions.mainPoints")?;
    let pitch = non_blank(improved.get("pitch"), "improvedVersions.pitch")?;

    Ok(FeedbackResult {
        score,
        strengths,
        improvements,
        improved_version: ImprovedVersion {
            topic,
            main_points,
            pitch,
        },
    })
}

/// Validate a generated topic, returning it trimmed.
pub fn validate_topic(raw: &str) -> Result<String, ValidationError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(ValidationError::BlankText("topic"));
    }
    let actual = topic.chars().count();
    if actual < MIN_TOPIC_CHARS {
        return Err(ValidationError::TopicTooShort {
            actual,
            min: MIN_TOPIC_CHARS,
        });
    }
    Ok(topic.to_string())
}

fn string_list(value: Option<&Value>, field: &'static str) -> Result<Vec<String>, ValidationError> {
    let items = value
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or(ValidationError::EmptyList(field))?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(ValidationError::EmptyList(field))
        })
        .collect()
}

fn non_blank(value: Option<&Value>, field: &'static str) -> Result<String, ValidationError> {
    match value.and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(ValidationError::BlankText(field)),
    }
}
