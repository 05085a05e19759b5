//! Provider configuration from TOML (`[providers]` section)

use coach_domain::{AnthropicProviderConfig, GeminiProviderConfig};
use serde::{Deserialize, Serialize};

/// Non-blank value of the first variable in `names` that is set.
fn first_set(lookup: &impl Fn(&str) -> Option<String>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter(|n| !n.is_empty())
        .filter_map(|n| lookup(n))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Anthropic API provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    pub model: String,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        let defaults = AnthropicProviderConfig::default();
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: defaults.base_url,
            model: defaults.model,
            api_version: defaults.api_version,
        }
    }
}

impl FileAnthropicConfig {
    pub(super) fn resolve(&self, lookup: &impl Fn(&str) -> Option<String>) -> AnthropicProviderConfig {
        AnthropicProviderConfig {
            api_key: self
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| first_set(lookup, &[self.api_key_env.as_str()])),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_version: self.api_version.clone(),
        }
    }
}

/// Google Gemini provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Checked when `api_key_env` is unset (default: "GOOGLE_AI_API_KEY").
    pub fallback_api_key_env: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        let defaults = GeminiProviderConfig::default();
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            fallback_api_key_env: "GOOGLE_AI_API_KEY".to_string(),
            api_key: None,
            base_url: defaults.base_url,
            model: defaults.model,
        }
    }
}

impl FileGeminiConfig {
    pub(super) fn resolve(&self, lookup: &impl Fn(&str) -> Option<String>) -> GeminiProviderConfig {
        GeminiProviderConfig {
            api_key: self
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| first_set(
                    lookup,
                    &[self.api_key_env.as_str(), self.fallback_api_key_env.as_str()],
                )),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
        }
    }
}

/// `[providers]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub anthropic: FileAnthropicConfig,
    pub gemini: FileGeminiConfig,
}
