//! Raw TOML configuration data types
//!
//! These structs mirror the config file layout. Conversion into domain
//! types (`RouterConfig`, `ProviderConfig`) happens here so that the rest
//! of the program never sees strings where a provider identity belongs.

mod providers;

use crate::session::FileSessionStore;
use coach_domain::{
    ProviderConfig, ProviderKind, RouterConfig, RouterConfigError, UnknownProvider,
    ValidationFailurePolicy,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use providers::{FileAnthropicConfig, FileGeminiConfig, FileProvidersConfig};

/// Value of `router.fallback` that disables the fallback step.
const NO_FALLBACK: &str = "none";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid provider in [router]: {0}")]
    Provider(#[from] UnknownProvider),

    #[error("Invalid [router] settings: {0}")]
    Router(#[from] RouterConfigError),

    #[error("backoff_base_ms cannot be 0")]
    ZeroBackoff,
}

/// What the router does with unparseable or invalid model output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileValidationPolicy {
    #[default]
    Retry,
    FallbackOnly,
}

impl From<FileValidationPolicy> for ValidationFailurePolicy {
    fn from(policy: FileValidationPolicy) -> Self {
        match policy {
            FileValidationPolicy::Retry => ValidationFailurePolicy::Retry,
            FileValidationPolicy::FallbackOnly => ValidationFailurePolicy::FallbackOnly,
        }
    }
}

/// `[router]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRouterConfig {
    /// Primary provider name ("anthropic" or "gemini")
    pub primary: String,
    /// Fallback provider name; unset means "the other provider", "none" disables it
    pub fallback: Option<String>,
    pub max_retries: u32,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// First backoff delay in milliseconds; doubles on each retry
    pub backoff_base_ms: u64,
    pub validation_failures: FileValidationPolicy,
}

impl Default for FileRouterConfig {
    fn default() -> Self {
        Self {
            primary: ProviderKind::Anthropic.as_str().to_string(),
            fallback: None,
            max_retries: 3,
            timeout_secs: 30,
            backoff_base_ms: 1000,
            validation_failures: FileValidationPolicy::default(),
        }
    }
}

impl FileRouterConfig {
    fn fallback_for(&self, primary: ProviderKind) -> Result<Option<ProviderKind>, UnknownProvider> {
        match self.fallback.as_deref().map(str::trim) {
            None => Ok(Some(primary.other())),
            Some(name) if name.is_empty() || name.eq_ignore_ascii_case(NO_FALLBACK) => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }
}

/// Output format for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOutputFormat {
    Text,
    Json,
}

/// `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<FileOutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Keep history on disk; `false` keeps it for the current run only
    pub persist: bool,
    /// Overrides the platform data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            persist: true,
            data_dir: None,
        }
    }
}

impl FileStorageConfig {
    /// Directory for session files, or `None` when history is not persisted
    /// or no data directory can be determined.
    pub fn root(&self) -> Option<PathBuf> {
        if !self.persist {
            return None;
        }
        self.data_dir.clone().or_else(FileSessionStore::default_root)
    }
}

/// Root configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub router: FileRouterConfig,
    pub providers: FileProvidersConfig,
    pub output: FileOutputConfig,
    pub storage: FileStorageConfig,
}

impl FileConfig {
    /// Build the validated router configuration.
    pub fn router_config(&self) -> Result<RouterConfig, ConfigError> {
        let router = &self.router;
        let primary: ProviderKind = router.primary.parse()?;
        let fallback = router.fallback_for(primary)?;

        if router.backoff_base_ms == 0 {
            return Err(ConfigError::ZeroBackoff);
        }

        let config = RouterConfig::new(
            primary,
            fallback,
            router.max_retries,
            Duration::from_secs(router.timeout_secs),
        )?
        .with_backoff_base(Duration::from_millis(router.backoff_base_ms))
        .with_validation_policy(router.validation_failures.into());
        Ok(config)
    }

    /// Build provider settings, resolving credentials from the process environment.
    pub fn provider_config(&self) -> ProviderConfig {
        self.provider_config_with(|name| std::env::var(name).ok())
    }

    /// Build provider settings with a custom variable lookup.
    pub fn provider_config_with(&self, lookup: impl Fn(&str) -> Option<String>) -> ProviderConfig {
        ProviderConfig {
            anthropic: self.providers.anthropic.resolve(&lookup),
            gemini: self.providers.gemini.resolve(&lookup),
        }
    }

    /// Render the effective configuration as TOML (credentials are never stored here).
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let mut redacted = self.clone();
        for key in [
            &mut redacted.providers.anthropic.api_key,
            &mut redacted.providers.gemini.api_key,
        ] {
            if key.is_some() {
                *key = Some("<redacted>".to_string());
            }
        }
        toml::to_string_pretty(&redacted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_router_defaults() {
        let config = FileConfig::default().router_config().unwrap();
        assert_eq!(config.primary(), ProviderKind::Anthropic);
        assert_eq!(config.fallback(), Some(ProviderKind::Gemini));
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.backoff_base(), Duration::from_secs(1));
        assert_eq!(config.validation_policy(), ValidationFailurePolicy::Retry);
    }

    #[test]
    fn parses_router_section() {
        let toml_str = r#"
[router]
primary = "gemini"
max_retries = 5
timeout_secs = 10
backoff_base_ms = 250
validation_failures = "fallback-only"
"#;
        let file: FileConfig = toml::from_str(toml_str).unwrap();
        let config = file.router_config().unwrap();
        assert_eq!(config.primary(), ProviderKind::Gemini);
        assert_eq!(config.fallback(), Some(ProviderKind::Anthropic));
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.backoff_base(), Duration::from_millis(250));
        assert_eq!(config.validation_policy(), ValidationFailurePolicy::FallbackOnly);
    }

    #[test]
    fn fallback_none_disables_fallback() {
        let file: FileConfig = toml::from_str("[router]\nfallback = \"none\"\n").unwrap();
        assert_eq!(file.router_config().unwrap().fallback(), None);
    }

    #[test]
    fn fallback_equal_to_primary_is_rejected() {
        let file: FileConfig =
            toml::from_str("[router]\nprimary = \"gemini\"\nfallback = \"gemini\"\n").unwrap();
        assert!(matches!(
            file.router_config(),
            Err(ConfigError::Router(RouterConfigError::FallbackEqualsPrimary(_)))
        ));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let file: FileConfig = toml::from_str("[router]\nprimary = \"openai\"\n").unwrap();
        assert!(matches!(file.router_config(), Err(ConfigError::Provider(_))));
    }

    #[test]
    fn zero_retries_is_rejected() {
        let file: FileConfig = toml::from_str("[router]\nmax_retries = 0\n").unwrap();
        assert!(matches!(
            file.router_config(),
            Err(ConfigError::Router(RouterConfigError::ZeroRetries))
        ));
    }

    #[test]
    fn parses_output_section() {
        let file: FileConfig = toml::from_str("[output]\nformat = \"json\"\ncolor = false\n").unwrap();
        assert_eq!(file.output.format, Some(FileOutputFormat::Json));
        assert!(!file.output.color);
    }

    #[test]
    fn parses_storage_section() {
        let file: FileConfig = toml::from_str("[storage]\ndata_dir = \"/srv/coach\"\n").unwrap();
        assert_eq!(file.storage.root(), Some(PathBuf::from("/srv/coach")));

        let file: FileConfig =
            toml::from_str("[storage]\npersist = false\ndata_dir = \"/srv/coach\"\n").unwrap();
        assert_eq!(file.storage.root(), None);
        assert!(FileConfig::default().storage.persist);
    }

    #[test]
    fn rendered_config_hides_keys() {
        let mut file = FileConfig::default();
        file.providers.anthropic.api_key = Some("sk-ant-secret".into());
        let rendered = file.to_toml().unwrap();
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(rendered.contains("[router]"));
    }
}
