use super::ProviderAdapter;
use async_trait::async_trait;
use coach_application::{
    AttemptStage, ErrorKind, FeedbackGateway, NoProgress, OperationError, RoutingProgress,
};
use coach_domain::{
    FeedbackRequest, FeedbackResult, ProviderKind, RouterConfig, ValidationFailurePolicy,
    backoff_delay,
};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Gateway that spreads one logical request over a primary and a fallback
/// provider, with per-attempt timeouts and exponential-backoff retries.
pub struct ProviderRouter {
    providers: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
    config: RouterConfig,
    progress: Arc<dyn RoutingProgress>,
}

impl ProviderRouter {
    /// Register `adapters` under `config`.
    ///
    /// A missing primary is not an error here: every call then fails with
    /// `PROVIDER_UNAVAILABLE`, which lets the composition root decide.
    pub fn new(config: RouterConfig, adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        let providers: HashMap<_, _> = adapters.into_iter().map(|a| (a.kind(), a)).collect();

        if !providers.contains_key(&config.primary()) {
            warn!(primary = %config.primary(), "Primary provider is not registered");
        }
        if let Some(fallback) = config.fallback()
            && !providers.contains_key(&fallback)
        {
            warn!(%fallback, "Fallback provider is not registered; fallback step will be skipped");
        }
        info!(
            providers = providers.len(),
            primary = %config.primary(),
            fallback = ?config.fallback(),
            "Provider router initialized"
        );

        Self {
            providers,
            config,
            progress: Arc::new(NoProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn RoutingProgress>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Registered providers, in a stable order.
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|k| self.providers.contains_key(k))
            .collect()
    }

    pub fn is_provider_available(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// One bounded attempt against `provider`.
    async fn attempt<'a, T, F>(
        &self,
        provider: &Arc<dyn ProviderAdapter>,
        stage: AttemptStage,
        op: &F,
    ) -> Result<T, OperationError>
    where
        F: Fn(Arc<dyn ProviderAdapter>) -> BoxFuture<'a, Result<T, OperationError>>,
    {
        let kind = provider.kind();
        let limit = self.config.timeout();
        self.progress.on_attempt(kind, stage);
        debug!(provider = %kind, ?stage, "Calling provider");

        // Losing the race drops the provider future, aborting the HTTP call.
        let result = match tokio::time::timeout(limit, op(Arc::clone(provider))).await {
            Ok(result) => result,
            Err(_) => Err(OperationError::provider(
                kind,
                ErrorKind::Timeout,
                format!("Operation timed out after {}ms", limit.as_millis()),
            )),
        };

        if let Err(ref e) = result {
            warn!(provider = %kind, ?stage, "Provider attempt failed: {}", e);
            self.progress.on_attempt_failed(kind, stage, e);
        }
        result
    }

    /// Whether the backoff loop may run another attempt after `error`.
    fn should_retry(&self, error: &OperationError) -> bool {
        error.retryable
            && !(self.config.validation_policy() == ValidationFailurePolicy::FallbackOnly
                && error.kind.is_output_fault())
    }

    async fn route<'a, T, F>(&self, operation: &'static str, op: F) -> Result<T, OperationError>
    where
        T: Send,
        F: Fn(Arc<dyn ProviderAdapter>) -> BoxFuture<'a, Result<T, OperationError>> + Send + Sync,
    {
        let primary_kind = self.config.primary();
        let Some(primary) = self.providers.get(&primary_kind).cloned() else {
            return Err(OperationError::router(
                ErrorKind::ProviderUnavailable,
                format!("Primary provider {} not available", primary_kind),
            ));
        };

        let primary_error = match self.attempt(&primary, AttemptStage::Primary, &op).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.retryable => return Err(e),
            Err(e) => e,
        };

        let mut last_error = primary_error.clone();
        let fallback = self
            .config
            .fallback()
            .and_then(|kind| self.providers.get(&kind).cloned());
        if let Some(fallback) = fallback {
            info!(operation, fallback = %fallback.kind(), "Attempting fallback provider");
            match self.attempt(&fallback, AttemptStage::Fallback, &op).await {
                Ok(value) => return Ok(value),
                Err(e) => last_error = e,
            }
        }

        if !self.should_retry(&primary_error) {
            debug!(operation, "Output fault with fallback-only policy; not retrying");
            return Err(last_error);
        }

        let max = self.config.max_retries();
        for attempt in 1..=max {
            let stage = AttemptStage::Retry { attempt, max };
            match self.attempt(&primary, stage, &op).await {
                Ok(value) => {
                    info!(operation, attempt, "Retry succeeded");
                    return Ok(value);
                }
                Err(e) if !self.should_retry(&e) => return Err(e),
                Err(e) => last_error = e,
            }

            if attempt < max {
                let delay = backoff_delay(self.config.backoff_base(), attempt);
                info!(
                    operation,
                    "Retry attempt {}/{} failed. Waiting {}ms before retry...",
                    attempt,
                    max,
                    delay.as_millis()
                );
                self.progress.on_backoff(delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(OperationError::router(
            ErrorKind::MaxRetriesExceeded,
            format!(
                "All {} retry attempts failed. Last error: {}",
                max, last_error.message
            ),
        ))
    }
}

#[async_trait]
impl FeedbackGateway for ProviderRouter {
    async fn generate_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<FeedbackResult, OperationError> {
        self.route("feedback", move |p| {
            async move { p.generate_feedback(request).await }.boxed()
        })
        .await
    }

    async fn generate_topic(&self, role: &str) -> Result<String, OperationError> {
        self.route("topic", move |p| {
            async move { p.generate_topic(role).await }.boxed()
        })
        .await
    }
}
