//! Aggregator port
//!
//! The session talks to "something that fans a conversation out" through this
//! trait: the in-process [`crate::CompareProvidersUseCase`] or a remote
//! server reached over HTTP.

use super::progress::{NoProgress, ProgressNotifier};
use async_trait::async_trait;
use fiesta_domain::{Conversation, ProviderKey, ResponseRecord};

#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Providers whose keys appear in every successful record
    fn providers(&self) -> Vec<ProviderKey>;

    /// Fan the conversation out with progress callbacks.
    ///
    /// Never fails: a call that could not reach any provider resolves to
    /// [`ResponseRecord::Error`].
    async fn aggregate_with_progress(
        &self,
        conversation: &Conversation,
        progress: &dyn ProgressNotifier,
    ) -> ResponseRecord;

    /// Fan the conversation out with no progress reporting
    async fn aggregate(&self, conversation: &Conversation) -> ResponseRecord {
        self.aggregate_with_progress(conversation, &NoProgress).await
    }
}
