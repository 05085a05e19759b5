//! Generate Topic use case

use crate::ports::feedback_gateway::{FeedbackGateway, OperationError};
use chrono::{DateTime, Utc};
use coach_domain::{InputError, validate_role};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateTopicError {
    #[error("Invalid input data: {0}")]
    InvalidInput(#[from] InputError),

    #[error("Unable to generate topic at this time: {0}")]
    Topic(#[from] OperationError),

    #[error("Unable to generate a valid topic. Please try again.")]
    EmptyTopic,
}

/// A generated practice scenario
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTopic {
    pub topic: String,
    pub role: String,
    pub generated_at: DateTime<Utc>,
}

/// Use case for generating a practice topic for a role
pub struct GenerateTopicUseCase<G: FeedbackGateway + ?Sized> {
    gateway: Arc<G>,
}

impl<G: FeedbackGateway + ?Sized> GenerateTopicUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, role: &str) -> Result<GeneratedTopic, GenerateTopicError> {
        self.execute_with_cancellation(role, &CancellationToken::new())
            .await
    }

    pub async fn execute_with_cancellation(
        &self,
        role: &str,
        cancel: &CancellationToken,
    ) -> Result<GeneratedTopic, GenerateTopicError> {
        let role = validate_role(role)?;
        let topic = self.gateway.generate_topic_cancellable(role, cancel).await?;

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerateTopicError::EmptyTopic);
        }

        info!(role, "Generated practice topic");
        Ok(GeneratedTopic {
            topic: topic.to_string(),
            role: role.to_string(),
            generated_at: Utc::now(),
        })
    }
}
