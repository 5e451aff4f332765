//! Configuration file loading for ai-fiesta
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FIESTA_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./fiesta.toml` or `./.fiesta.toml`
//! 4. Global: `$XDG_CONFIG_HOME/ai-fiesta/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileClientConfig, FileConfig, FileGeminiConfig, FileGroqConfig,
    FileLoggingConfig, FileOpenRouterConfig, FileProvidersConfig, FileQwenConfig, FileReplConfig,
    FileServerConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
