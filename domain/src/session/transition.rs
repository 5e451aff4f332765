//! Session state machine.
//!
//! ```text
//!            Submit (ok)                 Completed
//!   Idle ─────────────────▶ Sending ─────────────────▶ Idle
//!    │  ▲
//!    │  │ DismissNotice / Tick (ttl elapsed)
//!    ▼  │
//!   LimitReached ◀── Submit (empty input or quota exhausted)
//! ```
//!
//! [`transition`] is pure apart from mutating the given state: it never
//! performs I/O. Side effects are returned as [`SessionEffect`]s for the
//! caller to carry out.

use super::state::{SessionPhase, SessionState};
use crate::chat::entities::ChatId;
use crate::core::message::Conversation;
use crate::response::ResponseRecord;
use std::time::Instant;

/// Input to the state machine
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The user asked to send `input`
    Submit { input: String },
    /// The dispatched aggregate call finished (fully or partially)
    Completed { record: ResponseRecord },
    /// The user dismissed the limit notice
    DismissNotice,
    /// Clock tick; expires the limit notice once its delay has passed
    Tick,
}

/// Why an event had no effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A send is already in flight
    Busy,
    /// The event does not apply to the current phase
    InvalidTransition,
}

/// Work the caller must carry out after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Call the aggregator with `conversation`, then feed back `Completed`
    Dispatch {
        chat: ChatId,
        conversation: Conversation,
    },
    /// Raise the limit notice
    ShowLimitNotice,
    /// Take the limit notice down
    ClearNotice,
    /// Session data changed and should be saved
    Persist,
    /// Nothing happened
    Ignore(IgnoreReason),
}

/// Apply `event` to `state` at time `now`.
pub fn transition(
    state: &mut SessionState,
    event: SessionEvent,
    now: Instant,
) -> Vec<SessionEffect> {
    match (state.phase, event) {
        (SessionPhase::Sending, SessionEvent::Submit { .. }) => {
            vec![SessionEffect::Ignore(IgnoreReason::Busy)]
        }
        (_, SessionEvent::Submit { input }) => submit(state, input, now),

        (SessionPhase::Sending, SessionEvent::Completed { record }) => complete(state, record),

        (SessionPhase::LimitReached { .. }, SessionEvent::DismissNotice) => {
            state.phase = SessionPhase::Idle;
            vec![SessionEffect::ClearNotice]
        }
        (SessionPhase::LimitReached { raised_at }, SessionEvent::Tick) => {
            if now.saturating_duration_since(raised_at) >= state.settings.notice_ttl {
                state.phase = SessionPhase::Idle;
                vec![SessionEffect::ClearNotice]
            } else {
                vec![]
            }
        }
        (SessionPhase::Idle | SessionPhase::Sending, SessionEvent::Tick) => vec![],

        _ => vec![SessionEffect::Ignore(IgnoreReason::InvalidTransition)],
    }
}

fn submit(state: &mut SessionState, input: String, now: Instant) -> Vec<SessionEffect> {
    let conversation = match Conversation::from_user_input(&input) {
        Ok(conversation) if state.quota.can_send() => conversation,
        _ => {
            state.input_buffer = input;
            state.phase = SessionPhase::LimitReached { raised_at: now };
            return vec![SessionEffect::ShowLimitNotice];
        }
    };

    let max_chars = state.settings.title_max_chars;
    let chat = state.chats.active_mut();
    chat.apply_title_from(&input, max_chars);
    let chat_id = chat.id();

    state.input_buffer = input;
    state.pending_chat = Some(chat_id);
    state.phase = SessionPhase::Sending;

    vec![SessionEffect::Dispatch {
        chat: chat_id,
        conversation,
    }]
}

fn complete(state: &mut SessionState, record: ResponseRecord) -> Vec<SessionEffect> {
    let target = state.pending_chat.take();
    match target.and_then(|id| state.chats.get_mut(id)) {
        Some(chat) => chat.push_response(record),
        // The dispatching chat was deleted while the send was in flight
        None => state.chats.append_to_active(record),
    }

    state.quota.record_send();
    state.input_buffer.clear();
    state.phase = SessionPhase::Idle;
    vec![SessionEffect::Persist]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::entities::DEFAULT_CHAT_TITLE;
    use crate::core::provider::ProviderKey;
    use crate::response::{ProviderOutcome, ProviderResponses};
    use crate::session::state::SessionSettings;
    use std::collections::BTreeMap;
    use std::time::Duration;

    fn record() -> ResponseRecord {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(ProviderKey::Gemini, ProviderOutcome::success("Hi"));
        ResponseRecord::from(ProviderResponses::complete(&[ProviderKey::Gemini], outcomes))
    }

    /// Submit and complete one message, returning the dispatch effects
    fn send(state: &mut SessionState, input: &str, now: Instant) -> Vec<SessionEffect> {
        let effects = transition(
            state,
            SessionEvent::Submit {
                input: input.to_string(),
            },
            now,
        );
        if matches!(effects.first(), Some(SessionEffect::Dispatch { .. })) {
            transition(state, SessionEvent::Completed { record: record() }, now);
        }
        effects
    }

    #[test]
    fn hello_on_fresh_chat() {
        let mut state = SessionState::default();
        let now = Instant::now();
        assert_eq!(state.chats().active().title(), DEFAULT_CHAT_TITLE);

        let effects = transition(
            &mut state,
            SessionEvent::Submit {
                input: "Hello".to_string(),
            },
            now,
        );
        assert!(matches!(
            effects.as_slice(),
            [SessionEffect::Dispatch { conversation, .. }] if conversation.last_user_message() == "Hello"
        ));
        assert_eq!(state.phase(), SessionPhase::Sending);
        assert_eq!(state.input_buffer(), "Hello");

        let effects = transition(&mut state, SessionEvent::Completed { record: record() }, now);
        assert_eq!(effects, vec![SessionEffect::Persist]);
        assert_eq!(state.phase(), SessionPhase::Idle);
        assert_eq!(state.quota().used(), 1);
        assert_eq!(state.chats().active().responses().len(), 1);
        assert_eq!(state.chats().active().title(), "Hello");
        assert_eq!(state.input_buffer(), "");
    }

    #[test]
    fn fourth_send_is_rejected() {
        let mut state = SessionState::default();
        let now = Instant::now();
        for i in 0..3 {
            send(&mut state, &format!("message {i}"), now);
        }
        assert_eq!(state.quota().used(), 3);

        let effects = send(&mut state, "one more", now);
        assert_eq!(effects, vec![SessionEffect::ShowLimitNotice]);
        assert!(state.notice_visible());
        assert_eq!(state.quota().used(), 3);
        assert_eq!(state.chats().active().responses().len(), 3);
    }

    #[test]
    fn empty_input_raises_notice_without_dispatch() {
        let mut state = SessionState::default();
        let effects = send(&mut state, "   ", Instant::now());
        assert_eq!(effects, vec![SessionEffect::ShowLimitNotice]);
        assert_eq!(state.quota().used(), 0);
        assert!(state.chats().active().responses().is_empty());
        assert_eq!(state.chats().active().title(), DEFAULT_CHAT_TITLE);
    }

    #[test]
    fn submit_while_sending_is_ignored() {
        let mut state = SessionState::default();
        let now = Instant::now();
        transition(
            &mut state,
            SessionEvent::Submit {
                input: "first".to_string(),
            },
            now,
        );
        let effects = transition(
            &mut state,
            SessionEvent::Submit {
                input: "second".to_string(),
            },
            now,
        );
        assert_eq!(effects, vec![SessionEffect::Ignore(IgnoreReason::Busy)]);
        assert_eq!(state.input_buffer(), "first");
    }

    #[test]
    fn notice_cleared_by_dismissal() {
        let mut state = SessionState::default();
        let now = Instant::now();
        send(&mut state, "", now);
        let effects = transition(&mut state, SessionEvent::DismissNotice, now);
        assert_eq!(effects, vec![SessionEffect::ClearNotice]);
        assert_eq!(state.phase(), SessionPhase::Idle);
    }

    #[test]
    fn notice_expires_after_ttl() {
        let settings = SessionSettings {
            notice_ttl: Duration::from_secs(3),
            ..Default::default()
        };
        let mut state = SessionState::new(settings);
        let raised = Instant::now();
        send(&mut state, "", raised);

        let early = transition(&mut state, SessionEvent::Tick, raised + Duration::from_secs(1));
        assert!(early.is_empty());
        assert!(state.notice_visible());

        let late = transition(&mut state, SessionEvent::Tick, raised + Duration::from_secs(3));
        assert_eq!(late, vec![SessionEffect::ClearNotice]);
        assert_eq!(state.phase(), SessionPhase::Idle);
    }

    #[test]
    fn submit_from_limit_reached_reruns_guard() {
        let mut state = SessionState::default();
        let now = Instant::now();
        send(&mut state, "", now);
        let effects = send(&mut state, "Hello", now);
        assert!(matches!(effects.as_slice(), [SessionEffect::Dispatch { .. }]));
        assert_eq!(state.quota().used(), 1);
    }

    #[test]
    fn completion_without_dispatch_is_invalid() {
        let mut state = SessionState::default();
        let effects = transition(
            &mut state,
            SessionEvent::Completed { record: record() },
            Instant::now(),
        );
        assert_eq!(
            effects,
            vec![SessionEffect::Ignore(IgnoreReason::InvalidTransition)]
        );
        assert_eq!(state.quota().used(), 0);
        assert!(state.chats().active().responses().is_empty());
    }

    #[test]
    fn record_lands_in_dispatching_chat() {
        let mut state = SessionState::default();
        let now = Instant::now();
        let first = state.chats().active_id();
        transition(
            &mut state,
            SessionEvent::Submit {
                input: "Hello".to_string(),
            },
            now,
        );
        let second = state.chats_mut().create();

        transition(&mut state, SessionEvent::Completed { record: record() }, now);
        assert_eq!(state.chats().get(first).unwrap().responses().len(), 1);
        assert!(state.chats().get(second).unwrap().responses().is_empty());
    }

    #[test]
    fn responses_match_successful_sends() {
        let mut state = SessionState::new(SessionSettings {
            max_messages: 2,
            ..Default::default()
        });
        let now = Instant::now();
        for input in ["a", "", "b", "c", "d"] {
            send(&mut state, input, now);
            transition(&mut state, SessionEvent::DismissNotice, now);
        }
        assert_eq!(state.quota().used(), 2);
        assert_eq!(state.chats().active().responses().len(), 2);
    }
}
