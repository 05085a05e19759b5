//! Domain layer for pitch-coach
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Feedback
//!
//! A [`FeedbackRequest`] is sent to a text-generation provider, which answers
//! with untyped JSON. [`decode_feedback`] strips code fences, parses, and runs
//! the output contract ([`validate_feedback`]) so that a [`FeedbackResult`] is
//! always complete.
//!
//! ## Routing policy
//!
//! [`RouterConfig`] names a primary and optional fallback [`ProviderKind`],
//! the retry budget and the per-call timeout. [`backoff_delay`] gives the
//! wait between retries.

pub mod feedback;
pub mod practice;
pub mod prompt;
pub mod providers;
pub mod util;

// Re-export commonly used types
pub use feedback::{
    entities::{FeedbackRequest, FeedbackResult, ImprovedVersion, MAX_SCORE, MIN_SCORE},
    parsing::{DecodeError, decode_feedback, strip_code_fence},
    validation::{MIN_TOPIC_CHARS, ValidationError, validate_feedback, validate_topic},
};
pub use practice::{
    input::{InputError, validate_request, validate_role},
    insights::{
        Achievement, ImprovementTrend, SCORE_TARGET, STREAK_TARGET, ScoreSummary, SkillLevel,
        WEEKLY_SESSION_TARGET, achievements, round_tenth,
    },
    progress::UserProgress,
    session::PracticeSession,
};
pub use prompt::{GenerationParams, PromptTemplate};
pub use providers::{
    AnthropicProviderConfig, GeminiProviderConfig, ProviderConfig, ProviderKind, UnknownProvider,
    backoff::backoff_delay,
    router_config::{RouterConfig, RouterConfigError, ValidationFailurePolicy},
};
