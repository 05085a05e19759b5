//! Routing progress port
//!
//! Lets the presentation layer show what the router is doing while a call
//! is in flight (which provider is being tried, retries, backoff waits).

use super::feedback_gateway::OperationError;
use coach_domain::ProviderKind;
use std::time::Duration;

/// Which step of the recovery protocol an attempt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    Primary,
    Fallback,
    Retry { attempt: u32, max: u32 },
}

/// Callback for routing events
///
/// All methods default to no-ops. Implementations must not block.
pub trait RoutingProgress: Send + Sync {
    /// Called right before a provider is invoked
    fn on_attempt(&self, _provider: ProviderKind, _stage: AttemptStage) {}

    /// Called when an attempt fails
    fn on_attempt_failed(&self, _provider: ProviderKind, _stage: AttemptStage, _error: &OperationError) {}

    /// Called before sleeping between retries
    fn on_backoff(&self, _delay: Duration) {}
}

/// No-op progress for when nothing is displayed
pub struct NoProgress;

impl RoutingProgress for NoProgress {}
