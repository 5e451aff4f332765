//! Infrastructure layer for ai-fiesta
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: HTTP provider adapters, the remote aggregator client,
//! configuration file loading, session storage and transcript logging.

pub mod client;
pub mod config;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use client::HttpAggregatorClient;
pub use config::{
    ConfigLoader, ConfigValidationError, FileClientConfig, FileConfig, FileLoggingConfig,
    FileProvidersConfig, FileReplConfig, FileServerConfig, FileSessionConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{GeminiAdapter, GroqAdapter, OpenRouterAdapter, build_adapters};
pub use store::JsonFileSessionStore;
