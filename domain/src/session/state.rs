//! Session state

use super::quota::{DEFAULT_MAX_MESSAGES, Quota};
use crate::chat::collection::ChatCollection;
use crate::chat::entities::ChatId;
use std::time::{Duration, Instant};

/// Phase of the send cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Ready to accept a send
    Idle,
    /// A send was dispatched and has not completed yet
    Sending,
    /// A send was refused; the notice clears on dismissal or after a delay
    LimitReached { raised_at: Instant },
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Sending => "sending",
            SessionPhase::LimitReached { .. } => "limit-reached",
        }
    }
}

/// Tunables of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Messages allowed per session
    pub max_messages: u32,
    /// How long the limit notice stays up without being dismissed
    pub notice_ttl: Duration,
    /// Characters of the first message kept in a chat title
    pub title_max_chars: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
            notice_ttl: Duration::from_secs(3),
            title_max_chars: 20,
        }
    }
}

/// Everything one session owns
///
/// Mutated only through [`super::transition::transition`] and the chat
/// collection operations; the caller is responsible for persisting it.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) quota: Quota,
    pub(crate) chats: ChatCollection,
    pub(crate) input_buffer: String,
    /// Chat that was active when the in-flight send was dispatched
    pub(crate) pending_chat: Option<ChatId>,
    pub(crate) settings: SessionSettings,
}

impl SessionState {
    /// Fresh session: one empty chat, unused quota
    pub fn new(settings: SessionSettings) -> Self {
        Self::restore(settings, 0, ChatCollection::new())
    }

    /// Rebuild a session from persisted parts
    pub fn restore(settings: SessionSettings, used: u32, chats: ChatCollection) -> Self {
        Self {
            phase: SessionPhase::Idle,
            quota: Quota::with_used(settings.max_messages, used),
            chats,
            input_buffer: String::new(),
            pending_chat: None,
            settings,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }

    pub fn chats(&self) -> &ChatCollection {
        &self.chats
    }

    /// Chat operations (create/switch/delete) never touch quota or phase
    pub fn chats_mut(&mut self) -> &mut ChatCollection {
        &mut self.chats
    }

    /// Text of the last submitted message, kept until its send completes
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Whether the limit notice is currently shown
    pub fn notice_visible(&self) -> bool {
        matches!(self.phase, SessionPhase::LimitReached { .. })
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}
