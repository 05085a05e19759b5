//! Shared fixtures for use case tests

use crate::ports::session_store::{SessionStore, SessionStoreError};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use coach_domain::{FeedbackRequest, FeedbackResult, ImprovedVersion, PracticeSession, UserProgress};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn march(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap()
}

pub fn session_at(user: &str, score: u8, day: u32) -> PracticeSession {
    let feedback = FeedbackResult {
        score: f64::from(score),
        strengths: vec!["Clear structure".into()],
        improvements: vec!["Slow down".into()],
        improved_version: ImprovedVersion {
            topic: format!("Topic {day}"),
            main_points: vec!["Point".into()],
            pitch: "A sharper pitch.".into(),
        },
    };
    let request = FeedbackRequest::new(
        format!("Topic {day}"),
        "Goal",
        vec!["Point".into()],
        "The original pitch text.",
    );
    PracticeSession::new(user, request, feedback, march(day))
}

/// Store preloaded by the test, read-only to the use case
#[derive(Default)]
pub struct SeededStore {
    sessions: Mutex<Vec<PracticeSession>>,
    progress: Mutex<HashMap<String, UserProgress>>,
}

impl SeededStore {
    pub fn push(&self, session: PracticeSession) {
        self.sessions.lock().unwrap().push(session);
    }

    pub fn set_progress(&self, progress: UserProgress) {
        self.progress
            .lock()
            .unwrap()
            .insert(progress.user_id.clone(), progress);
    }
}

#[async_trait]
impl SessionStore for SeededStore {
    async fn store_session(&self, session: &PracticeSession) -> Result<(), SessionStoreError> {
        self.push(session.clone());
        Ok(())
    }

    async fn load_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<PracticeSession, SessionStoreError> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id && s.id == session_id)
            .cloned()
            .ok_or_else(|| SessionStoreError::NotFound(session_id.to_string()))
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<PracticeSession>, SessionStoreError> {
        let mut sessions: Vec<_> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn load_progress(&self, user_id: &str) -> Result<Option<UserProgress>, SessionStoreError> {
        Ok(self.progress.lock().unwrap().get(user_id).cloned())
    }

    async fn store_progress(&self, progress: &UserProgress) -> Result<(), SessionStoreError> {
        self.set_progress(progress.clone());
        Ok(())
    }
}
