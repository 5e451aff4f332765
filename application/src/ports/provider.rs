//! Provider adapter port
//!
//! Defines the interface every upstream LLM provider is reached through.

use async_trait::async_trait;
use fiesta_domain::{Conversation, ProviderKey, ProviderOutcome};
use thiserror::Error;

/// Errors an adapter can hit while talking to its provider.
///
/// These never cross the adapter boundary as errors: they are rendered into
/// a [`ProviderOutcome::Failure`] via [`ProviderError::into_outcome`].
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API key is not configured (set {0})")]
    MissingCredential(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Upstream(String),

    #[error("empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Render as the provider-scoped failure string
    pub fn into_outcome(self, key: ProviderKey) -> ProviderOutcome {
        ProviderOutcome::failure(key, self)
    }
}

/// Adapter for one upstream provider
///
/// `respond` always resolves: credential, transport, status and payload
/// problems come back as [`ProviderOutcome::Failure`]. The aggregator relies
/// on this to fill every provider slot.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Key under which this adapter's outcome is reported
    fn key(&self) -> ProviderKey;

    /// Upstream model id, for logs and display
    fn model(&self) -> &str;

    /// Send the conversation and return the complete answer or a failure
    async fn respond(&self, conversation: &Conversation) -> ProviderOutcome;
}
