//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing fields take their defaults.

mod endpoints;
mod providers;
mod session;

pub use endpoints::{FileClientConfig, FileLoggingConfig, FileReplConfig, FileServerConfig};
pub use providers::{
    FileGeminiConfig, FileGroqConfig, FileOpenRouterConfig, FileProvidersConfig, FileQwenConfig,
};
pub use session::FileSessionConfig;

use fiesta_domain::ProviderKey;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("session.max_messages cannot be 0")]
    ZeroMaxMessages,

    #[error("providers.{0}.model cannot be empty")]
    EmptyModelName(ProviderKey),

    #[error("no provider is enabled")]
    NoProvidersEnabled,

    #[error("server.bind is not a socket address: {0}")]
    InvalidBind(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// HTTP API settings
    pub server: FileServerConfig,
    /// Remote aggregator settings
    pub client: FileClientConfig,
    /// Quota and persistence settings
    pub session: FileSessionConfig,
    /// Upstream provider settings
    pub providers: FileProvidersConfig,
    /// Interactive chat settings
    pub repl: FileReplConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.session.max_messages == 0 {
            issues.push(ConfigValidationError::ZeroMaxMessages);
        }

        let enabled = self.providers.enabled_keys();
        if enabled.is_empty() {
            issues.push(ConfigValidationError::NoProvidersEnabled);
        }
        for key in enabled {
            if self.providers.model_for(key).trim().is_empty() {
                issues.push(ConfigValidationError::EmptyModelName(key));
            }
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            issues.push(ConfigValidationError::InvalidBind(self.server.bind.clone()));
        }

        issues
    }

    /// Bind address, once [`FileConfig::validate`] has accepted it
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigValidationError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigValidationError::InvalidBind(self.server.bind.clone()))
    }
}
