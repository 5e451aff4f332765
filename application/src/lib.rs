//! Application layer for ai-fiesta
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    aggregator::Aggregator,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, ProgressNotifier},
    provider::{ProviderAdapter, ProviderError},
    session_store::{InMemorySessionStore, SessionStore, StoreError, StoredSession},
};
pub use use_cases::chat_session::{ChatSessionService, SendOutcome};
pub use use_cases::compare_providers::{AggregateError, CompareProvidersUseCase};
