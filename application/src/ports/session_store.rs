//! Session store port
//!
//! The session is loaded once when the client starts and saved after every
//! mutation. Where it lives (a JSON file, memory) is an adapter concern.

use fiesta_domain::{ChatCollection, SessionSettings, SessionState};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persisted part of a session
///
/// Phase and input buffer are transient and always restart as idle/empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub messages_used: u32,
    pub chats: ChatCollection,
}

impl StoredSession {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            messages_used: state.quota().used(),
            chats: state.chats().clone(),
        }
    }

    pub fn into_state(self, settings: SessionSettings) -> SessionState {
        SessionState::restore(settings, self.messages_used, self.chats)
    }
}

pub trait SessionStore: Send + Sync {
    /// Load the saved session, `None` if nothing was saved yet
    fn load(&self) -> Result<Option<StoredSession>, StoreError>;

    /// Replace the saved session
    fn save(&self, session: &StoredSession) -> Result<(), StoreError>;
}

/// Store that keeps the session in memory only
#[derive(Default)]
pub struct InMemorySessionStore {
    saved: Mutex<Option<StoredSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            saved: Mutex::new(Some(session)),
        }
    }

    /// Last saved session
    pub fn snapshot(&self) -> Option<StoredSession> {
        self.saved.lock().ok().and_then(|s| s.clone())
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, session: &StoredSession) -> Result<(), StoreError> {
        if let Ok(mut saved) = self.saved.lock() {
            *saved = Some(session.clone());
        }
        Ok(())
    }
}
