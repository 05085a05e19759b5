pub mod anthropic;
pub mod gemini;
pub mod routing;

mod response;

use coach_application::FeedbackGateway;
use coach_domain::{ProviderConfig, ProviderKind};
use std::sync::Arc;

pub use anthropic::AnthropicProviderAdapter;
pub use gemini::GeminiProviderAdapter;
pub use routing::ProviderRouter;

/// A single text-generation backend that the router can register
pub trait ProviderAdapter: FeedbackGateway {
    fn kind(&self) -> ProviderKind;
}

/// Build an adapter for every provider that has credentials.
///
/// Providers without an API key are skipped with a warning, so the router
/// simply sees them as unregistered.
pub fn configured_adapters(config: &ProviderConfig) -> Vec<Arc<dyn ProviderAdapter>> {
    let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();
    if let Some(adapter) = AnthropicProviderAdapter::try_new(&config.anthropic) {
        adapters.push(Arc::new(adapter));
    }
    if let Some(adapter) = GeminiProviderAdapter::try_new(&config.gemini) {
        adapters.push(Arc::new(adapter));
    }
    adapters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapters_without_keys_are_skipped() {
        let mut config = ProviderConfig::default();
        config.anthropic.api_key = None;
        config.gemini.api_key = Some("g-key".into());

        let adapters = configured_adapters(&config);
        let kinds: Vec<_> = adapters.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds, vec![ProviderKind::Gemini]);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut config = ProviderConfig::default();
        config.anthropic.api_key = Some("   ".into());
        config.gemini.api_key = None;
        assert!(configured_adapters(&config).is_empty());
    }
}
