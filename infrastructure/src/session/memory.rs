//! Process-local session store
//!
//! Keeps every user's history in memory. Sessions are keyed by user so
//! that one user can never load another user's session by id.

use async_trait::async_trait;
use coach_application::{SessionStore, SessionStoreError};
use coach_domain::{PracticeSession, UserProgress};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
pub struct InMemorySessionStore {
    /// user_id -> sessions in insertion order
    sessions: RwLock<HashMap<String, Vec<PracticeSession>>>,
    progress: RwLock<HashMap<String, UserProgress>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn store_session(&self, session: &PracticeSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let history = sessions.entry(session.user_id.clone()).or_default();
        if let Some(existing) = history.iter_mut().find(|s| s.id == session.id) {
            *existing = session.clone();
        } else {
            history.push(session.clone());
        }
        debug!(user_id = %session.user_id, session_id = %session.id, "Stored session");
        Ok(())
    }

    async fn load_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<PracticeSession, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(user_id)
            .and_then(|history| history.iter().find(|s| s.id == session_id))
            .cloned()
            .ok_or_else(|| SessionStoreError::NotFound(session_id.to_string()))
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<PracticeSession>, SessionStoreError> {
        let mut history = self
            .sessions
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(history)
    }

    async fn load_progress(&self, user_id: &str) -> Result<Option<UserProgress>, SessionStoreError> {
        Ok(self.progress.read().await.get(user_id).cloned())
    }

    async fn store_progress(&self, progress: &UserProgress) -> Result<(), SessionStoreError> {
        self.progress
            .write()
            .await
            .insert(progress.user_id.clone(), progress.clone());
        Ok(())
    }
}
