//! Router configuration (Value Object)

use super::ProviderKind;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// How the router treats failures caused by the provider's *output*
/// (unparseable JSON or a contract violation) rather than its transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationFailurePolicy {
    /// Output faults are ordinary retryable errors: fallback first, then the
    /// full backoff budget on the primary.
    #[default]
    Retry,
    /// Output faults earn a single fallback attempt and never enter the
    /// backoff loop.
    FallbackOnly,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterConfigError {
    #[error("Fallback provider must differ from the primary ({0})")]
    FallbackEqualsPrimary(ProviderKind),

    #[error("max_retries must be at least 1")]
    ZeroRetries,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Immutable routing settings shared by every call through a router
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    primary: ProviderKind,
    fallback: Option<ProviderKind>,
    max_retries: u32,
    timeout: Duration,
    backoff_base: Duration,
    validation_policy: ValidationFailurePolicy,
}

impl RouterConfig {
    /// Build a config, enforcing `primary != fallback` and `max_retries >= 1`.
    pub fn new(
        primary: ProviderKind,
        fallback: Option<ProviderKind>,
        max_retries: u32,
        timeout: Duration,
    ) -> Result<Self, RouterConfigError> {
        if fallback == Some(primary) {
            return Err(RouterConfigError::FallbackEqualsPrimary(primary));
        }
        if max_retries == 0 {
            return Err(RouterConfigError::ZeroRetries);
        }
        if timeout.is_zero() {
            return Err(RouterConfigError::ZeroTimeout);
        }
        Ok(Self {
            primary,
            fallback,
            max_retries,
            timeout,
            backoff_base: DEFAULT_BACKOFF_BASE,
            validation_policy: ValidationFailurePolicy::default(),
        })
    }

    /// Defaults for a given primary: the other provider as fallback,
    /// 3 retries, 30s per call.
    pub fn for_primary(primary: ProviderKind) -> Self {
        Self {
            primary,
            fallback: Some(primary.other()),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            backoff_base: DEFAULT_BACKOFF_BASE,
            validation_policy: ValidationFailurePolicy::default(),
        }
    }

    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    pub fn with_validation_policy(mut self, policy: ValidationFailurePolicy) -> Self {
        self.validation_policy = policy;
        self
    }

    pub fn primary(&self) -> ProviderKind {
        self.primary
    }

    pub fn fallback(&self) -> Option<ProviderKind> {
        self.fallback
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    pub fn validation_policy(&self) -> ValidationFailurePolicy {
        self.validation_policy
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::for_primary(ProviderKind::Anthropic)
    }
}
