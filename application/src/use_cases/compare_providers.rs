//! Compare Providers use case
//!
//! Fans one conversation out to every configured provider at once and
//! gathers the answers into a single keyed result.

use crate::ports::aggregator::Aggregator;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider::ProviderAdapter;
use async_trait::async_trait;
use fiesta_domain::{
    Conversation, DomainError, Message, ProviderKey, ProviderResponses, ResponseRecord,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors raised before any provider is called
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No providers configured")]
    NoProviders,

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] DomainError),
}

impl AggregateError {
    /// Whether the caller sent something malformed (as opposed to a
    /// server-side setup problem)
    pub fn is_client_error(&self) -> bool {
        matches!(self, AggregateError::InvalidRequest(_))
    }
}

/// Use case for querying every provider with the same conversation
pub struct CompareProvidersUseCase {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
    logger: Arc<dyn ConversationLogger>,
}

impl CompareProvidersUseCase {
    pub fn new(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self {
            adapters,
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Record requests and answers to a transcript
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Keys of the configured providers, in configuration order
    pub fn provider_keys(&self) -> Vec<ProviderKey> {
        self.adapters.iter().map(|a| a.key()).collect()
    }

    /// Validate raw turns, then execute
    pub async fn execute_messages(
        &self,
        messages: Vec<Message>,
    ) -> Result<ProviderResponses, AggregateError> {
        let conversation = Conversation::new(messages)?;
        self.execute(&conversation).await
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        conversation: &Conversation,
    ) -> Result<ProviderResponses, AggregateError> {
        self.execute_with_progress(conversation, &NoProgress).await
    }

    /// Query all providers in parallel.
    ///
    /// Every adapter runs as its own task; one adapter failing or panicking
    /// never affects the others. The returned mapping holds exactly the
    /// configured keys.
    pub async fn execute_with_progress(
        &self,
        conversation: &Conversation,
        progress: &dyn ProgressNotifier,
    ) -> Result<ProviderResponses, AggregateError> {
        if self.adapters.is_empty() {
            return Err(AggregateError::NoProviders);
        }

        let keys = self.provider_keys();
        info!(
            "Querying {} providers with {} turns",
            keys.len(),
            conversation.len()
        );
        self.logger.log(ConversationEvent::new(
            "aggregate_request",
            serde_json::json!({
                "providers": keys,
                "messages": conversation,
            }),
        ));

        let mut join_set = JoinSet::new();

        for adapter in &self.adapters {
            let adapter = Arc::clone(adapter);
            let conversation = conversation.clone();

            join_set.spawn(async move {
                let started = Instant::now();
                let outcome = adapter.respond(&conversation).await;
                debug!(
                    provider = %adapter.key(),
                    model = adapter.model(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Provider resolved"
                );
                (adapter.key(), outcome)
            });
        }
        progress.on_dispatch(&keys);

        let mut outcomes = BTreeMap::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((key, outcome)) => {
                    if outcome.is_success() {
                        info!("Provider {} responded successfully", key);
                    } else {
                        warn!("Provider {} failed: {}", key, outcome.as_text());
                    }
                    progress.on_provider_complete(key, outcome.is_success());
                    self.logger.log(ConversationEvent::new(
                        "provider_response",
                        serde_json::json!({
                            "provider": key,
                            "success": outcome.is_success(),
                            "text": outcome.as_text(),
                        }),
                    ));
                    outcomes.insert(key, outcome);
                }
                Err(e) => {
                    // The slot is filled with a failure by `complete` below
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_complete();
        Ok(ProviderResponses::complete(&keys, outcomes))
    }
}

#[async_trait]
impl Aggregator for CompareProvidersUseCase {
    fn providers(&self) -> Vec<ProviderKey> {
        self.provider_keys()
    }

    async fn aggregate_with_progress(
        &self,
        conversation: &Conversation,
        progress: &dyn ProgressNotifier,
    ) -> ResponseRecord {
        match self.execute_with_progress(conversation, progress).await {
            Ok(responses) => ResponseRecord::Providers(responses),
            Err(e) => ResponseRecord::Error(e.to_string()),
        }
    }
}
