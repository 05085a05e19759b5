//! Feedback request and result entities

use serde::{Deserialize, Serialize};

/// Lowest score a feedback result may carry.
pub const MIN_SCORE: f64 = 1.0;

/// Highest score a feedback result may carry.
pub const MAX_SCORE: f64 = 10.0;

/// A practice submission to be scored by a provider (Value Object)
///
/// Built by the caller once per call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub topic: String,
    pub goal: String,
    pub main_points: Vec<String>,
    pub pitch: String,
}

impl FeedbackRequest {
    pub fn new(
        topic: impl Into<String>,
        goal: impl Into<String>,
        main_points: Vec<String>,
        pitch: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            goal: goal.into(),
            main_points,
            pitch: pitch.into(),
        }
    }
}

/// The rewritten version of a submission suggested by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovedVersion {
    pub topic: String,
    pub main_points: Vec<String>,
    pub pitch: String,
}

/// Structured, scored feedback for one submission
///
/// Only ever constructed by [`validate_feedback`](super::validation::validate_feedback),
/// so every instance satisfies the output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    pub score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(rename = "improvedVersions")]
    pub improved_version: ImprovedVersion,
}

impl FeedbackResult {
    /// Force the score into `[1, 10]`.
    ///
    /// Last line of defense on the caller side; returns `true` when the
    /// score had to be changed.
    pub fn clamp_score(&mut self) -> bool {
        let clamped = if self.score.is_nan() {
            MIN_SCORE
        } else {
            self.score.clamp(MIN_SCORE, MAX_SCORE)
        };
        let changed = clamped != self.score;
        self.score = clamped;
        changed
    }

    /// Score rounded to the nearest whole point, as stored in history.
    pub fn rounded_score(&self) -> u8 {
        self.score.clamp(MIN_SCORE, MAX_SCORE).round() as u8
    }
}
