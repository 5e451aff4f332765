//! Session configuration from TOML (`[session]` section)

use crate::store::JsonFileSessionStore;
use fiesta_domain::{DEFAULT_MAX_MESSAGES, SessionSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Messages allowed per session
    pub max_messages: u32,
    /// Seconds the limit notice stays up
    pub notice_ttl_secs: u64,
    /// Characters of the first message kept in a chat title
    pub title_max_chars: usize,
    /// Where the session is saved (default: `$XDG_DATA_HOME/ai-fiesta/session.json`)
    pub state_file: Option<PathBuf>,
    /// Save the session between runs; off means quota and chats last for one run
    pub persist: bool,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
            notice_ttl_secs: 3,
            title_max_chars: 20,
            state_file: None,
            persist: false,
        }
    }
}

impl FileSessionConfig {
    pub fn to_settings(&self) -> SessionSettings {
        SessionSettings {
            max_messages: self.max_messages,
            notice_ttl: Duration::from_secs(self.notice_ttl_secs),
            title_max_chars: self.title_max_chars,
        }
    }

    /// File the session is saved to, `None` when the session is kept in memory
    pub fn store_path(&self) -> Option<PathBuf> {
        if !self.persist {
            return None;
        }
        self.state_file
            .clone()
            .or_else(JsonFileSessionStore::default_path)
    }
}
