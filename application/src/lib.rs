//! Application layer for pitch-coach
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    feedback_gateway::{ErrorKind, ErrorOrigin, FeedbackGateway, OperationError},
    progress::{AttemptStage, NoProgress, RoutingProgress},
    session_store::{SessionStore, SessionStoreError},
};
pub use use_cases::generate_topic::{GenerateTopicError, GenerateTopicUseCase, GeneratedTopic};
pub use use_cases::submit_practice::{
    SubmitPracticeError, SubmitPracticeInput, SubmitPracticeOutput, SubmitPracticeUseCase,
};
pub use use_cases::view_history::{
    DEFAULT_PAGE_SIZE, HistoryPage, HistoryQuery, MAX_PAGE_SIZE, Pagination, ViewHistoryError,
    ViewHistoryUseCase,
};
pub use use_cases::view_progress::{
    Goals, GoalsProgress, ProgressReport, ScorePoint, ViewProgressError, ViewProgressUseCase,
};
