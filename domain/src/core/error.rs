//! Domain error types

use crate::chat::entities::ChatId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Conversation must contain at least one message")]
    EmptyConversation,

    #[error("Message cannot be empty")]
    EmptyInput,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Chat not found: {0}")]
    ChatNotFound(ChatId),

    #[error("Cannot delete the last remaining chat")]
    LastChat,
}

impl DomainError {
    /// Check if this error is a refused deletion of the only chat
    pub fn is_last_chat(&self) -> bool {
        matches!(self, DomainError::LastChat)
    }
}
