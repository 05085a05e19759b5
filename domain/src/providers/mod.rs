//! Provider identity and configuration types (provider-neutral, serde-free
//! apart from the identity tag).
//!
//! These types define the shape of provider settings without depending
//! on any file format; the infrastructure layer maps TOML/env onto them.

pub mod backoff;
pub mod router_config;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One backend variant (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Anthropic, ProviderKind::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
        }
    }

    /// The provider used as fallback when none is configured explicitly.
    pub fn other(&self) -> ProviderKind {
        match self {
            ProviderKind::Anthropic => ProviderKind::Gemini,
            ProviderKind::Gemini => ProviderKind::Anthropic,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown provider: {0} (expected \"anthropic\" or \"gemini\")")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Anthropic Messages API settings.
#[derive(Debug, Clone)]
pub struct AnthropicProviderConfig {
    /// Credential, read once at startup. `None` leaves the adapter unregistered.
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    pub model: String,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for AnthropicProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-haiku-20240307".to_string(),
            api_version: "2023-06-01".to_string(),
        }
    }
}

/// Google Gemini `generateContent` settings.
#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    /// Credential, read once at startup. `None` leaves the adapter unregistered.
    pub api_key: Option<String>,
    /// Base URL for the Generative Language API.
    pub base_url: String,
    pub model: String,
}

impl Default for GeminiProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
        }
    }
}

/// Settings for every known backend.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub anthropic: AnthropicProviderConfig,
    pub gemini: GeminiProviderConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("anthropic".parse::<ProviderKind>(), Ok(ProviderKind::Anthropic));
        assert_eq!(" Gemini ".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert_eq!("claude".parse::<ProviderKind>(), Ok(ProviderKind::Anthropic));
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn other_is_symmetric() {
        for kind in ProviderKind::ALL {
            assert_ne!(kind.other(), kind);
            assert_eq!(kind.other().other(), kind);
        }
    }

    #[test]
    fn display_matches_serde_name() {
        let json = serde_json::to_string(&ProviderKind::Gemini).unwrap();
        assert_eq!(json, format!("\"{}\"", ProviderKind::Gemini));
    }
}
