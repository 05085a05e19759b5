//! Statistics derived from a user's practice history

use serde::Serialize;
use std::fmt;

/// Sessions per week the user is encouraged to reach
pub const WEEKLY_SESSION_TARGET: u32 = 3;
/// Consecutive practice days the user is encouraged to reach
pub const STREAK_TARGET: u32 = 7;
/// Average score the user is encouraged to reach
pub const SCORE_TARGET: f64 = 8.0;

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Direction of recent scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementTrend {
    Improving,
    Stable,
    Declining,
}

impl ImprovementTrend {
    /// Compare the three newest scores with the three oldest.
    ///
    /// `scores` must be newest first. Fewer than three scores is `Stable`,
    /// and so is a difference of half a point or less.
    pub fn from_recent(scores: &[u8]) -> Self {
        if scores.len() < 3 {
            return ImprovementTrend::Stable;
        }
        let mean = |s: &[u8]| s.iter().map(|&v| f64::from(v)).sum::<f64>() / s.len() as f64;
        let newest = mean(&scores[..3]);
        let oldest = mean(&scores[scores.len() - 3..]);

        if newest > oldest + 0.5 {
            ImprovementTrend::Improving
        } else if newest < oldest - 0.5 {
            ImprovementTrend::Declining
        } else {
            ImprovementTrend::Stable
        }
    }
}

impl fmt::Display for ImprovementTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImprovementTrend::Improving => "improving",
            ImprovementTrend::Stable => "stable",
            ImprovementTrend::Declining => "declining",
        })
    }
}

/// Coarse skill level from volume and quality of practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn classify(total_sessions: u32, average_score: f64) -> Self {
        if total_sessions >= 10 && average_score >= 7.0 {
            SkillLevel::Advanced
        } else if total_sessions >= 5 && average_score >= 5.0 {
            SkillLevel::Intermediate
        } else {
            SkillLevel::Beginner
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
        })
    }
}

/// A milestone badge
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

/// Every badge with its earned state.
pub fn achievements(total_sessions: u32, average_score: f64, streak: u32) -> Vec<Achievement> {
    let badge = |id, name, description, earned| Achievement {
        id,
        name,
        description,
        earned,
    };
    vec![
        badge(
            "first_pitch",
            "First Steps",
            "Complete your first practice session",
            total_sessions >= 1,
        ),
        badge(
            "five_sessions",
            "Getting Started",
            "Complete 5 practice sessions",
            total_sessions >= 5,
        ),
        badge(
            "ten_sessions",
            "Committed Learner",
            "Complete 10 practice sessions",
            total_sessions >= 10,
        ),
        badge(
            "high_scorer",
            "Excellence Achiever",
            "Maintain an average score of 8 or higher",
            average_score >= SCORE_TARGET,
        ),
        badge(
            "week_streak",
            "Consistent Practitioner",
            "Practice for 7 consecutive days",
            streak >= STREAK_TARGET,
        ),
        badge(
            "month_streak",
            "Dedicated Speaker",
            "Practice for 30 consecutive days",
            streak >= 30,
        ),
    ]
}

/// Aggregate over a set of session scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total_sessions: u32,
    /// Mean score rounded to one decimal; 0 when there are no sessions
    pub average_score: f64,
    pub highest_score: u8,
    pub lowest_score: u8,
}

impl ScoreSummary {
    pub fn of(scores: impl IntoIterator<Item = u8>) -> Self {
        let mut total = 0u32;
        let mut sum = 0u32;
        let mut highest = 0u8;
        let mut lowest = u8::MAX;
        for score in scores {
            total += 1;
            sum += u32::from(score);
            highest = highest.max(score);
            lowest = lowest.min(score);
        }

        if total == 0 {
            return Self {
                total_sessions: 0,
                average_score: 0.0,
                highest_score: 0,
                lowest_score: 0,
            };
        }
        Self {
            total_sessions: total,
            average_score: round_tenth(f64::from(sum) / f64::from(total)),
            highest_score: highest,
            lowest_score: lowest,
        }
    }
}
