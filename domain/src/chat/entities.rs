//! Chat entities

use crate::response::ResponseRecord;
use serde::{Deserialize, Serialize};

/// Title every chat starts with
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Identifier of a chat, unique within a collection and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(u64);

impl ChatId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ChatId)
    }
}

/// A chat thread (Entity)
///
/// Holds the response log of every dispatched turn in chronological order.
/// The title starts as [`DEFAULT_CHAT_TITLE`] and is replaced once, from the
/// first message sent in this chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    id: ChatId,
    title: String,
    #[serde(default)]
    title_locked: bool,
    #[serde(default)]
    responses: Vec<ResponseRecord>,
}

impl Chat {
    pub fn new(id: ChatId) -> Self {
        Self {
            id,
            title: DEFAULT_CHAT_TITLE.to_string(),
            title_locked: false,
            responses: Vec::new(),
        }
    }

    pub fn id(&self) -> ChatId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn responses(&self) -> &[ResponseRecord] {
        &self.responses
    }

    /// Derive the title from a user message, at most once per chat.
    ///
    /// The trimmed message is cut to `max_chars` characters, with `...`
    /// appended when it was longer. Returns `true` if the title changed.
    pub fn apply_title_from(&mut self, input: &str, max_chars: usize) -> bool {
        if self.title_locked {
            return false;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return false;
        }

        self.title = if trimmed.chars().count() > max_chars {
            let head: String = trimmed.chars().take(max_chars).collect();
            format!("{head}...")
        } else {
            trimmed.to_string()
        };
        self.title_locked = true;
        true
    }

    /// Append a record to the response log
    pub fn push_response(&mut self, record: ResponseRecord) {
        self.responses.push(record);
    }
}
