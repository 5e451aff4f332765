//! Upstream provider adapters
//!
//! Each adapter implements the [`ProviderAdapter`] port for one provider
//! slot. [`build_adapters`] turns the `[providers]` config into the list the
//! fan-out use case runs.

mod chat_completions;
pub mod gemini;
pub mod groq;
pub mod http;
pub mod openrouter;

pub use gemini::GeminiAdapter;
pub use groq::GroqAdapter;
pub use openrouter::OpenRouterAdapter;

use crate::config::FileProvidersConfig;
use fiesta_application::ProviderAdapter;
use fiesta_domain::ProviderKey;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Construct the enabled adapters, in reporting order.
///
/// Credentials are not checked here; an adapter without a key reports a
/// failure for its slot when called.
pub fn build_adapters(
    config: &FileProvidersConfig,
) -> Result<Vec<Arc<dyn ProviderAdapter>>, reqwest::Error> {
    let client = http::build_client(Duration::from_secs(config.timeout_secs))?;
    Ok(adapters_with_client(config, client))
}

pub fn adapters_with_client(
    config: &FileProvidersConfig,
    client: reqwest::Client,
) -> Vec<Arc<dyn ProviderAdapter>> {
    let adapters: Vec<Arc<dyn ProviderAdapter>> = config
        .enabled_keys()
        .into_iter()
        .map(|key| -> Arc<dyn ProviderAdapter> {
            match key {
                ProviderKey::Gemini => Arc::new(GeminiAdapter::new(client.clone(), &config.gemini)),
                ProviderKey::Groq => Arc::new(GroqAdapter::new(client.clone(), &config.groq)),
                ProviderKey::OpenRouter | ProviderKey::Qwen => Arc::new(OpenRouterAdapter::new(
                    key,
                    client.clone(),
                    &config.openrouter,
                    config.model_for(key),
                )),
            }
        })
        .collect();

    for adapter in &adapters {
        info!("Provider {} -> {}", adapter.key(), adapter.model());
    }
    adapters
}
