//! Session store port
//!
//! Key-value persistence for practice sessions and per-user progress.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use coach_domain::{PracticeSession, UserProgress};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Persistence for practice history
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a scored session
    async fn store_session(&self, session: &PracticeSession) -> Result<(), SessionStoreError>;

    /// Load one session owned by `user_id`
    async fn load_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<PracticeSession, SessionStoreError>;

    /// All sessions of a user, newest first
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<PracticeSession>, SessionStoreError>;

    /// Current progress of a user, if they ever practiced
    async fn load_progress(&self, user_id: &str) -> Result<Option<UserProgress>, SessionStoreError>;

    /// Replace the progress record of `progress.user_id`
    async fn store_progress(&self, progress: &UserProgress) -> Result<(), SessionStoreError>;
}
