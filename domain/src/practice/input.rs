//! Field validation for practice submissions and topic requests.
//!
//! This runs before anything is sent to a provider; adapters never
//! re-check these limits.

use crate::feedback::entities::FeedbackRequest;
use thiserror::Error;

pub const MAX_TOPIC_CHARS: usize = 500;
pub const MAX_GOAL_CHARS: usize = 500;
pub const MAX_MAIN_POINTS: usize = 10;
pub const MIN_PITCH_CHARS: usize = 10;
pub const MAX_PITCH_CHARS: usize = 5000;
pub const MAX_ROLE_CHARS: usize = 100;

/// A practice form field that failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} too long ({actual} chars, maximum {max})")]
    TooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("Pitch must be at least {min} characters")]
    PitchTooShort { min: usize },

    #[error("Too many main points ({actual}, maximum {max})")]
    TooManyMainPoints { actual: usize, max: usize },
}

/// Check every field of a practice submission.
pub fn validate_request(request: &FeedbackRequest) -> Result<(), InputError> {
    check_text("topic", &request.topic, MAX_TOPIC_CHARS)?;
    check_text("goal", &request.goal, MAX_GOAL_CHARS)?;

    if request.main_points.is_empty() {
        return Err(InputError::Required("At least one main point"));
    }
    if request.main_points.len() > MAX_MAIN_POINTS {
        return Err(InputError::TooManyMainPoints {
            actual: request.main_points.len(),
            max: MAX_MAIN_POINTS,
        });
    }

    let pitch_len = request.pitch.chars().count();
    if pitch_len < MIN_PITCH_CHARS {
        return Err(InputError::PitchTooShort {
            min: MIN_PITCH_CHARS,
        });
    }
    if pitch_len > MAX_PITCH_CHARS {
        return Err(InputError::TooLong {
            field: "pitch",
            actual: pitch_len,
            max: MAX_PITCH_CHARS,
        });
    }

    Ok(())
}

/// Check a role name for topic generation, returning it trimmed.
pub fn validate_role(role: &str) -> Result<&str, InputError> {
    let role = role.trim();
    check_text("role", role, MAX_ROLE_CHARS)?;
    Ok(role)
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), InputError> {
    if value.trim().is_empty() {
        return Err(InputError::Required(field));
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(InputError::TooLong { field, actual, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> FeedbackRequest {
        FeedbackRequest::new(
            "Team update",
            "Get buy-in",
            vec!["Point one".to_string()],
            "We should ship the beta next week.",
        )
    }

    #[test]
    fn accepts_a_well_formed_request() {
        assert_eq!(validate_request(&request()), Ok(()));
    }

    #[test]
    fn requires_topic_and_goal() {
        let mut r = request();
        r.topic = "  ".into();
        assert_eq!(validate_request(&r), Err(InputError::Required("topic")));

        let mut r = request();
        r.goal = String::new();
        assert_eq!(validate_request(&r), Err(InputError::Required("goal")));
    }

    #[test]
    fn limits_main_points() {
        let mut r = request();
        r.main_points.clear();
        assert!(matches!(validate_request(&r), Err(InputError::Required(_))));

        r.main_points = vec!["p".to_string(); 11];
        assert_eq!(
            validate_request(&r),
            Err(InputError::TooManyMainPoints { actual: 11, max: 10 })
        );
    }

    #[test]
    fn pitch_length_bounds() {
        let mut r = request();
        r.pitch = "too short".into();
        assert_eq!(validate_request(&r), Err(InputError::PitchTooShort { min: 10 }));

        r.pitch = "x".repeat(5001);
        assert!(matches!(
            validate_request(&r),
            Err(InputError::TooLong { field: "pitch", .. })
        ));
    }

    #[test]
    fn role_is_trimmed_and_bounded() {
        assert_eq!(validate_role("  Product Manager "), Ok("Product Manager"));
        assert_eq!(validate_role(""), Err(InputError::Required("role")));
        assert!(validate_role(&"r".repeat(101)).is_err());
    }
}
