//! Configuration file loading for pitch-coach
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `AI_PROVIDER` and `COACH_`-prefixed keys
//! 2. `--config <path>` specified file
//! 3. Project root: `./coach.toml` or `./.coach.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/pitch-coach/config.toml`
//! 5. Default values
//!
//! API keys are resolved once at startup, from the file or from the
//! environment variable each provider section names.

mod file_config;
mod loader;

pub use file_config::{
    ConfigError, FileAnthropicConfig, FileConfig, FileGeminiConfig, FileOutputConfig,
    FileOutputFormat, FileProvidersConfig, FileRouterConfig, FileStorageConfig, FileValidationPolicy,
};
pub use loader::ConfigLoader;
