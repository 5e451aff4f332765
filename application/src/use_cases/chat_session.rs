//! Chat session use case
//!
//! Drives the session state machine for one client: quota guard, dispatch to
//! the aggregator, recording results, and chat management. The session is
//! loaded from the store on construction and saved after every mutation.

use crate::ports::aggregator::Aggregator;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::session_store::{SessionStore, StoredSession};
use fiesta_domain::{
    Chat, ChatCollection, ChatId, DomainError, IgnoreReason, Quota, ResponseRecord,
    SessionEffect, SessionEvent, SessionPhase, SessionSettings, SessionState, transition,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What became of a send request
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The aggregator ran and its record was appended to the chat
    Delivered(ResponseRecord),
    /// The guard refused the send (empty input or quota exhausted)
    LimitReached { quota: Quota },
    /// Another send is still in flight
    Busy,
}

/// Client-side chat session
///
/// Takes `&mut self` for every mutation, so one send completes before the
/// next one is accepted.
pub struct ChatSessionService {
    state: SessionState,
    aggregator: Arc<dyn Aggregator>,
    store: Arc<dyn SessionStore>,
}

impl ChatSessionService {
    /// Load the saved session (or start a fresh one) and wire collaborators
    pub fn new(
        aggregator: Arc<dyn Aggregator>,
        store: Arc<dyn SessionStore>,
        settings: SessionSettings,
    ) -> Self {
        let state = match store.load() {
            Ok(Some(saved)) => {
                info!(
                    "Restored session with {} chats, {} messages used",
                    saved.chats.len(),
                    saved.messages_used
                );
                saved.into_state(settings)
            }
            Ok(None) => SessionState::new(settings),
            Err(e) => {
                warn!("Could not load saved session, starting fresh: {}", e);
                SessionState::new(settings)
            }
        };

        Self {
            state,
            aggregator,
            store,
        }
    }

    /// Send a message with default (no-op) progress
    pub async fn send(&mut self, input: &str) -> SendOutcome {
        self.send_with_progress(input, &NoProgress).await
    }

    /// Send a message to every provider through the aggregator
    pub async fn send_with_progress(
        &mut self,
        input: &str,
        progress: &dyn ProgressNotifier,
    ) -> SendOutcome {
        let effects = transition(
            &mut self.state,
            SessionEvent::Submit {
                input: input.to_string(),
            },
            Instant::now(),
        );

        for effect in effects {
            match effect {
                SessionEffect::Dispatch { chat, conversation } => {
                    debug!("Dispatching message for chat {}", chat);
                    let record = self
                        .aggregator
                        .aggregate_with_progress(&conversation, progress)
                        .await;
                    let completed = transition(
                        &mut self.state,
                        SessionEvent::Completed {
                            record: record.clone(),
                        },
                        Instant::now(),
                    );
                    self.apply(completed);
                    info!("Message delivered ({} used)", self.state.quota());
                    return SendOutcome::Delivered(record);
                }
                SessionEffect::ShowLimitNotice => {
                    info!("Send refused ({} used)", self.state.quota());
                    return SendOutcome::LimitReached {
                        quota: self.state.quota(),
                    };
                }
                SessionEffect::Ignore(IgnoreReason::Busy) => return SendOutcome::Busy,
                other => self.apply(vec![other]),
            }
        }

        SendOutcome::Busy
    }

    /// Dismiss the limit notice
    pub fn dismiss_notice(&mut self) {
        let effects = transition(&mut self.state, SessionEvent::DismissNotice, Instant::now());
        self.apply(effects);
    }

    /// Expire the limit notice if it has been up long enough
    pub fn tick(&mut self, now: Instant) {
        let effects = transition(&mut self.state, SessionEvent::Tick, now);
        self.apply(effects);
    }

    /// Start a new chat and make it active
    pub fn new_chat(&mut self) -> ChatId {
        let id = self.state.chats_mut().create();
        info!("Created chat {}", id);
        self.persist();
        id
    }

    /// Make another chat active
    pub fn switch_chat(&mut self, id: ChatId) -> Result<(), DomainError> {
        self.state.chats_mut().switch(id)?;
        self.persist();
        Ok(())
    }

    /// Delete a chat; deleting the only chat is refused
    pub fn delete_chat(&mut self, id: ChatId) -> Result<(), DomainError> {
        self.state.chats_mut().delete(id)?;
        info!("Deleted chat {}", id);
        self.persist();
        Ok(())
    }

    pub fn quota(&self) -> Quota {
        self.state.quota()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn chats(&self) -> &ChatCollection {
        self.state.chats()
    }

    pub fn active_chat(&self) -> &Chat {
        self.state.chats().active()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    fn apply(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            match effect {
                SessionEffect::Persist => self.persist(),
                SessionEffect::ClearNotice => debug!("Limit notice cleared"),
                SessionEffect::Ignore(reason) => debug!(
                    "Session event ignored while {}: {:?}",
                    self.state.phase().as_str(),
                    reason
                ),
                SessionEffect::Dispatch { .. } | SessionEffect::ShowLimitNotice => {}
            }
        }
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&StoredSession::from_state(&self.state)) {
            warn!("Failed to save session: {}", e);
        }
    }
}
