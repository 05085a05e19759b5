//! Submit Practice use case
//!
//! Validates a practice submission, obtains scored feedback through the
//! gateway, stores the session and updates the user's progress.

use crate::ports::feedback_gateway::{FeedbackGateway, OperationError};
use crate::ports::session_store::{SessionStore, SessionStoreError};
use chrono::Utc;
use coach_domain::{
    FeedbackRequest, FeedbackResult, InputError, PracticeSession, UserProgress, validate_request,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that can occur while submitting a practice session
#[derive(Error, Debug)]
pub enum SubmitPracticeError {
    #[error("Invalid input data: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Unable to generate feedback at this time: {0}")]
    Feedback(#[from] OperationError),

    #[error("Failed to save practice session: {0}")]
    Store(#[from] SessionStoreError),
}

/// Input for the SubmitPractice use case
#[derive(Debug, Clone)]
pub struct SubmitPracticeInput {
    /// Caller identity, already resolved by the outer layer
    pub user_id: String,
    pub request: FeedbackRequest,
}

impl SubmitPracticeInput {
    pub fn new(user_id: impl Into<String>, request: FeedbackRequest) -> Self {
        Self {
            user_id: user_id.into(),
            request,
        }
    }
}

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct SubmitPracticeOutput {
    pub session_id: String,
    pub feedback: FeedbackResult,
    pub original: FeedbackRequest,
}

/// Use case for scoring and recording a practice submission
pub struct SubmitPracticeUseCase<G: FeedbackGateway + ?Sized, S: SessionStore + ?Sized> {
    gateway: Arc<G>,
    store: Arc<S>,
}

impl<G: FeedbackGateway + ?Sized, S: SessionStore + ?Sized> SubmitPracticeUseCase<G, S> {
    pub fn new(gateway: Arc<G>, store: Arc<S>) -> Self {
        Self { gateway, store }
    }

    /// Execute without external cancellation
    pub async fn execute(
        &self,
        input: SubmitPracticeInput,
    ) -> Result<SubmitPracticeOutput, SubmitPracticeError> {
        self.execute_with_cancellation(input, &CancellationToken::new())
            .await
    }

    /// Execute; cancelling `cancel` abandons the provider call
    pub async fn execute_with_cancellation(
        &self,
        input: SubmitPracticeInput,
        cancel: &CancellationToken,
    ) -> Result<SubmitPracticeOutput, SubmitPracticeError> {
        validate_request(&input.request)?;

        let mut feedback = self
            .gateway
            .generate_feedback_cancellable(&input.request, cancel)
            .await?;

        let raw_score = feedback.score;
        if feedback.clamp_score() {
            warn!(raw_score, clamped = feedback.score, "Out-of-range score clamped");
        }

        let session = PracticeSession::new(
            input.user_id.clone(),
            input.request.clone(),
            feedback.clone(),
            Utc::now(),
        );
        self.store.store_session(&session).await?;
        info!(session_id = %session.id, score = session.score, "Practice session stored");

        // Progress is best effort: the feedback is already saved.
        if let Err(e) = self.update_progress(&input.user_id, session.score).await {
            warn!(user_id = %input.user_id, "Failed to update user progress: {}", e);
        }

        Ok(SubmitPracticeOutput {
            session_id: session.id,
            feedback,
            original: input.request,
        })
    }

    async fn update_progress(&self, user_id: &str, score: u8) -> Result<(), SessionStoreError> {
        let mut progress = self
            .store
            .load_progress(user_id)
            .await?
            .unwrap_or_else(|| UserProgress::new(user_id));
        progress.record_session(score, Utc::now());
        self.store.store_progress(&progress).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::feedback_gateway::ErrorKind;
    use async_trait::async_trait;
    use coach_domain::{ImprovedVersion, ProviderKind};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // -- Mocks -----------------------------------------------------------------

    struct FixedGateway {
        result: Result<FeedbackResult, OperationError>,
    }

    #[async_trait]
    impl FeedbackGateway for FixedGateway {
        async fn generate_feedback(
            &self,
            _request: &FeedbackRequest,
        ) -> Result<FeedbackResult, OperationError> {
            self.result.clone()
        }

        async fn generate_topic(&self, _role: &str) -> Result<String, OperationError> {
            unreachable!("not used by this use case")
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        sessions: Mutex<Vec<PracticeSession>>,
        progress: Mutex<HashMap<String, UserProgress>>,
        fail_progress: bool,
    }

    #[async_trait]
    impl SessionStore for MemoryStore {
        async fn store_session(&self, session: &PracticeSession) -> Result<(), SessionStoreError> {
            self.sessions.lock().unwrap().push(session.clone());
            Ok(())
        }

        async fn load_session(
            &self,
            _user_id: &str,
            session_id: &str,
        ) -> Result<PracticeSession, SessionStoreError> {
            self.sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == session_id)
                .cloned()
                .ok_or_else(|| SessionStoreError::NotFound(session_id.to_string()))
        }

        async fn list_sessions(
            &self,
            _user_id: &str,
        ) -> Result<Vec<PracticeSession>, SessionStoreError> {
            Ok(self.sessions.lock().unwrap().clone())
        }

        async fn load_progress(
            &self,
            user_id: &str,
        ) -> Result<Option<UserProgress>, SessionStoreError> {
            if self.fail_progress {
                return Err(SessionStoreError::Backend("progress table offline".into()));
            }
            Ok(self.progress.lock().unwrap().get(user_id).cloned())
        }

        async fn store_progress(&self, progress: &UserProgress) -> Result<(), SessionStoreError> {
            self.progress
                .lock()
                .unwrap()
                .insert(progress.user_id.clone(), progress.clone());
            Ok(())
        }
    }

    // -- Helpers ---------------------------------------------------------------

    fn feedback(score: f64) -> FeedbackResult {
        FeedbackResult {
            score,
            strengths: vec!["Clear".into()],
            improvements: vec!["Shorter".into()],
            improved_version: ImprovedVersion {
                topic: "Topic".into(),
                main_points: vec!["Point".into()],
                pitch: "Better pitch".into(),
            },
        }
    }

    fn input() -> SubmitPracticeInput {
        SubmitPracticeInput::new(
            "user-1",
            FeedbackRequest::new(
                "Quarterly update",
                "Inform leadership",
                vec!["Revenue".into()],
                "Revenue grew twelve percent.",
            ),
        )
    }

    fn use_case(
        result: Result<FeedbackResult, OperationError>,
        store: Arc<MemoryStore>,
    ) -> SubmitPracticeUseCase<FixedGateway, MemoryStore> {
        SubmitPracticeUseCase::new(Arc::new(FixedGateway { result }), store)
    }

    // -- Tests -----------------------------------------------------------------

    #[tokio::test]
    async fn stores_session_and_updates_progress() {
        let store = Arc::new(MemoryStore::default());
        let output = use_case(Ok(feedback(8.0)), store.clone())
            .execute(input())
            .await
            .unwrap();

        assert_eq!(output.feedback.score, 8.0);
        assert_eq!(output.original.topic, "Quarterly update");

        let saved = store.load_session("user-1", &output.session_id).await.unwrap();
        assert_eq!(saved.score, 8);

        let progress = store.load_progress("user-1").await.unwrap().unwrap();
        assert_eq!(progress.total_sessions, 1);
        assert_eq!(progress.streak, 1);
    }

    #[tokio::test]
    async fn clamps_out_of_range_score() {
        let store = Arc::new(MemoryStore::default());
        let output = use_case(Ok(feedback(11.0)), store)
            .execute(input())
            .await
            .unwrap();
        assert_eq!(output.feedback.score, 10.0);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_gateway() {
        let store = Arc::new(MemoryStore::default());
        let mut bad = input();
        bad.request.pitch = "short".into();

        let err = use_case(Ok(feedback(5.0)), store.clone())
            .execute(bad)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmitPracticeError::InvalidInput(_)));
        assert!(store.sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn gateway_error_is_surfaced_and_nothing_stored() {
        let store = Arc::new(MemoryStore::default());
        let failure = OperationError::provider(
            ProviderKind::Anthropic,
            ErrorKind::SafetyFilter,
            "blocked",
        );
        let err = use_case(Err(failure.clone()), store.clone())
            .execute(input())
            .await
            .unwrap_err();

        match err {
            SubmitPracticeError::Feedback(e) => assert_eq!(e, failure),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn progress_failure_does_not_fail_submission() {
        let store = Arc::new(MemoryStore {
            fail_progress: true,
            ..Default::default()
        });
        let output = use_case(Ok(feedback(6.0)), store.clone())
            .execute(input())
            .await;
        assert!(output.is_ok());
        assert_eq!(store.sessions.lock().unwrap().len(), 1);
    }
}
