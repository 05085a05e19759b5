//! Infrastructure layer for pitch-coach
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the provider adapters and the router behind
//! `FeedbackGateway`, an in-memory `SessionStore`, and configuration
//! file loading.

pub mod config;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig, FileOutputFormat, FileStorageConfig};
pub use providers::{
    AnthropicProviderAdapter, GeminiProviderAdapter, ProviderAdapter, ProviderRouter,
    configured_adapters,
};
pub use session::{FileSessionStore, InMemorySessionStore};
