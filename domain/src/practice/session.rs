//! Practice session entity

use crate::feedback::entities::{FeedbackRequest, FeedbackResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scored practice submission as it is kept in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub id: String,
    pub user_id: String,
    pub request: FeedbackRequest,
    pub feedback: FeedbackResult,
    /// Whole-point score derived from `feedback.score`.
    pub score: u8,
    pub created_at: DateTime<Utc>,
}

impl PracticeSession {
    pub fn new(
        user_id: impl Into<String>,
        request: FeedbackRequest,
        feedback: FeedbackResult,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            score: feedback.rounded_score(),
            request,
            feedback,
            created_at,
        }
    }
}
