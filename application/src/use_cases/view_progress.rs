//! View Progress use case
//!
//! Combines the stored progress record with recent history into a report
//! of totals, trend, level, goals and badges.

use crate::ports::session_store::{SessionStore, SessionStoreError};
use chrono::{DateTime, Duration, Utc};
use coach_domain::{
    Achievement, ImprovementTrend, SCORE_TARGET, STREAK_TARGET, SkillLevel, WEEKLY_SESSION_TARGET,
    achievements, round_tenth,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Sessions considered for the fallback average and the trend
const RECENT_WINDOW: usize = 10;
/// Sessions shown as the score trend
const TREND_WINDOW: usize = 5;
/// Weeks in the 30-day frequency window
const WEEKS_PER_MONTH: f64 = 4.3;

#[derive(Error, Debug)]
pub enum ViewProgressError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

/// One point of the score trend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
    pub score: u8,
    pub date: DateTime<Utc>,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub weekly_target: u32,
    pub streak_target: u32,
    pub score_target: f64,
}

/// Fraction (0..=1) of each goal reached
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsProgress {
    pub weekly_progress: f64,
    pub streak_progress: f64,
    pub score_progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub total_sessions: u32,
    pub average_score: f64,
    pub streak: u32,
    pub last_practice_date: Option<DateTime<Utc>>,
    /// Sessions per week over the last 30 days
    pub practice_frequency: f64,
    pub improvement_trend: ImprovementTrend,
    pub user_level: SkillLevel,
    pub days_since_last_practice: Option<i64>,
    pub recent_sessions: Vec<ScorePoint>,
    pub goals: Goals,
    pub goals_progress: GoalsProgress,
    pub achievements: Vec<Achievement>,
    pub updated_at: DateTime<Utc>,
}

/// Use case for summarizing a user's practice progress
pub struct ViewProgressUseCase<S: SessionStore + ?Sized> {
    store: Arc<S>,
}

impl<S: SessionStore + ?Sized> ViewProgressUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, user_id: &str) -> Result<ProgressReport, ViewProgressError> {
        self.execute_at(user_id, Utc::now()).await
    }

    /// Build the report as seen at `now`.
    pub async fn execute_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ProgressReport, ViewProgressError> {
        let progress = self.store.load_progress(user_id).await?;
        let history = self.store.list_sessions(user_id).await?;
        let recent = &history[..history.len().min(RECENT_WINDOW)];

        let (total_sessions, average_score, streak, last_practice_date) = match &progress {
            Some(p) => (p.total_sessions, p.average_score, p.streak, p.last_practice_date),
            None if !recent.is_empty() => {
                let sum: u32 = recent.iter().map(|s| u32::from(s.score)).sum();
                (
                    history.len() as u32,
                    f64::from(sum) / recent.len() as f64,
                    0,
                    None,
                )
            }
            None => (0, 0.0, 0, None),
        };

        let month_ago = now - Duration::days(30);
        let last_month = history.iter().filter(|s| s.created_at >= month_ago).count() as f64;

        let trend: Vec<ScorePoint> = recent
            .iter()
            .take(TREND_WINDOW)
            .map(|s| ScorePoint {
                score: s.score,
                date: s.created_at,
                topic: s.request.topic.clone(),
            })
            .collect();
        let trend_scores: Vec<u8> = trend.iter().map(|p| p.score).collect();

        Ok(ProgressReport {
            total_sessions,
            average_score: round_tenth(average_score),
            streak,
            last_practice_date,
            practice_frequency: round_tenth(last_month / WEEKS_PER_MONTH),
            improvement_trend: ImprovementTrend::from_recent(&trend_scores),
            user_level: SkillLevel::classify(total_sessions, average_score),
            days_since_last_practice: last_practice_date.map(|d| (now - d).num_days()),
            recent_sessions: trend,
            goals: Goals {
                weekly_target: WEEKLY_SESSION_TARGET,
                streak_target: STREAK_TARGET,
                score_target: SCORE_TARGET,
            },
            goals_progress: GoalsProgress {
                weekly_progress: (last_month / f64::from(WEEKLY_SESSION_TARGET)).min(1.0),
                streak_progress: (f64::from(streak) / f64::from(STREAK_TARGET)).min(1.0),
                score_progress: (average_score / SCORE_TARGET).min(1.0),
            },
            achievements: achievements(total_sessions, average_score, streak),
            updated_at: now,
        })
    }
}
