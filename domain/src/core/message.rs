//! Conversation turns

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// An ordered, non-empty sequence of turns (Value Object)
///
/// This is the input handed to every provider adapter. Adapters that only
/// accept a single prompt use [`Conversation::last_user_message`]; the others
/// forward the full history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Message>", into = "Vec<Message>")]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Build a conversation, rejecting an empty turn list
    pub fn new(messages: Vec<Message>) -> Result<Self, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::EmptyConversation);
        }
        Ok(Self { messages })
    }

    /// A single-turn conversation holding one user message
    pub fn from_user_input(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyInput);
        }
        Self::new(vec![Message::user(trimmed)])
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Content of the most recent `user` turn, or of the last turn when the
    /// conversation has no user turn at all.
    pub fn last_user_message(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .or_else(|| self.messages.last())
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

impl TryFrom<Vec<Message>> for Conversation {
    type Error = DomainError;

    fn try_from(messages: Vec<Message>) -> Result<Self, Self::Error> {
        Self::new(messages)
    }
}

impl From<Conversation> for Vec<Message> {
    fn from(conversation: Conversation) -> Self {
        conversation.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_conversation_rejected() {
        assert_eq!(
            Conversation::new(vec![]).unwrap_err(),
            DomainError::EmptyConversation
        );
    }

    #[test]
    fn test_from_user_input_trims() {
        let conv = Conversation::from_user_input("  Hello \n").unwrap();
        assert_eq!(conv.messages(), &[Message::user("Hello")]);
        assert_eq!(
            Conversation::from_user_input("   ").unwrap_err(),
            DomainError::EmptyInput
        );
    }

    #[test]
    fn test_last_user_message() {
        let conv = Conversation::new(vec![
            Message::system("be brief"),
            Message::user("first"),
            Message::assistant("answer"),
            Message::user("second"),
            Message::assistant("another"),
        ])
        .unwrap();
        assert_eq!(conv.last_user_message(), "second");

        let system_only = Conversation::new(vec![Message::system("only")]).unwrap();
        assert_eq!(system_only.last_user_message(), "only");
    }

    #[test]
    fn test_deserialize_validates() {
        let conv: Conversation =
            serde_json::from_str(r#"[{"role":"user","content":"hi"}]"#).unwrap();
        assert_eq!(conv.len(), 1);

        assert!(serde_json::from_str::<Conversation>("[]").is_err());
        assert!(
            serde_json::from_str::<Conversation>(r#"[{"role":"robot","content":"hi"}]"#).is_err()
        );
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("assistant".parse::<Role>().unwrap(), Role::Assistant);
        assert!("tool".parse::<Role>().is_err());
    }
}
