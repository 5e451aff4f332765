//! Chat collection (Aggregate)
//!
//! Owns every chat of a session and the active selection. The collection is
//! never observably empty: it starts with one chat, refuses to delete the last
//! one, and always keeps `active` pointing at a member.

use super::entities::{Chat, ChatId};
use crate::core::error::DomainError;
use crate::response::ResponseRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Collection of chats with exactly one active member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChatCollection")]
pub struct ChatCollection {
    chats: Vec<Chat>,
    active: ChatId,
    /// Highest id ever issued, so deleted ids are never handed out again
    last_id: u64,
}

#[derive(Deserialize)]
struct RawChatCollection {
    chats: Vec<Chat>,
    active: ChatId,
    #[serde(default)]
    last_id: u64,
}

impl TryFrom<RawChatCollection> for ChatCollection {
    type Error = String;

    fn try_from(raw: RawChatCollection) -> Result<Self, Self::Error> {
        if raw.chats.is_empty() {
            return Err("chat collection cannot be empty".to_string());
        }
        if !raw.chats.iter().any(|c| c.id() == raw.active) {
            return Err(format!("active chat {} is not in the collection", raw.active));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = raw.chats.iter().map(Chat::id).find(|id| !seen.insert(*id)) {
            return Err(format!("chat id {} appears more than once", dup));
        }
        let max_id = raw.chats.iter().map(|c| c.id().value()).max().unwrap_or(0);
        if raw.last_id.max(max_id) == u64::MAX {
            return Err("chat id counter is exhausted".to_string());
        }
        Ok(Self {
            chats: raw.chats,
            active: raw.active,
            last_id: raw.last_id.max(max_id),
        })
    }
}

impl ChatCollection {
    /// Create a collection holding one fresh, active chat
    pub fn new() -> Self {
        Self::new_at(now_millis())
    }

    /// Same as [`ChatCollection::new`] with an explicit clock reading
    pub fn new_at(now_ms: u64) -> Self {
        let id = ChatId::new(now_ms);
        Self {
            chats: vec![Chat::new(id)],
            active: id,
            last_id: now_ms,
        }
    }

    /// Create a chat and make it active
    pub fn create(&mut self) -> ChatId {
        self.create_at(now_millis())
    }

    /// Same as [`ChatCollection::create`] with an explicit clock reading.
    ///
    /// Ids follow the clock but stay strictly increasing even if the clock
    /// stalls or moves backwards.
    pub fn create_at(&mut self, now_ms: u64) -> ChatId {
        self.last_id = now_ms.max(self.last_id.saturating_add(1));
        let id = ChatId::new(self.last_id);
        self.chats.push(Chat::new(id));
        self.active = id;
        id
    }

    /// Make another chat active; no chat's data is touched
    pub fn switch(&mut self, id: ChatId) -> Result<(), DomainError> {
        if !self.contains(id) {
            return Err(DomainError::ChatNotFound(id));
        }
        self.active = id;
        Ok(())
    }

    /// Delete a chat.
    ///
    /// Deleting the only chat is refused and leaves the collection unchanged.
    /// When the active chat is deleted, the first remaining chat becomes
    /// active.
    pub fn delete(&mut self, id: ChatId) -> Result<(), DomainError> {
        let index = self
            .chats
            .iter()
            .position(|c| c.id() == id)
            .ok_or(DomainError::ChatNotFound(id))?;
        if self.chats.len() == 1 {
            return Err(DomainError::LastChat);
        }

        self.chats.remove(index);
        if self.active == id {
            // Non-empty: at least one chat remained after removal
            self.active = self.chats[0].id();
        }
        Ok(())
    }

    pub fn active_id(&self) -> ChatId {
        self.active
    }

    pub fn active(&self) -> &Chat {
        self.chats
            .iter()
            .find(|c| c.id() == self.active)
            .unwrap_or(&self.chats[0])
    }

    pub fn active_mut(&mut self) -> &mut Chat {
        let index = self
            .chats
            .iter()
            .position(|c| c.id() == self.active)
            .unwrap_or(0);
        &mut self.chats[index]
    }

    pub fn get(&self, id: ChatId) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: ChatId) -> Option<&mut Chat> {
        self.chats.iter_mut().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: ChatId) -> bool {
        self.chats.iter().any(|c| c.id() == id)
    }

    /// Chats in creation order
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Append a record to the active chat's response log
    pub fn append_to_active(&mut self, record: ResponseRecord) {
        self.active_mut().push_response(record);
    }
}

impl Default for ChatCollection {
    fn default() -> Self {
        Self::new()
    }
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_collection_has_one_active_chat() {
        let chats = ChatCollection::new_at(1_000);
        assert_eq!(chats.len(), 1);
        assert_eq!(chats.active_id(), ChatId::new(1_000));
        assert_eq!(chats.active().id(), chats.active_id());
    }

    #[test]
    fn test_create_activates_new_chat() {
        let mut chats = ChatCollection::new_at(1_000);
        let id = chats.create_at(2_000);
        assert_eq!(chats.len(), 2);
        assert_eq!(chats.active_id(), id);
        assert_eq!(id, ChatId::new(2_000));
    }

    #[test]
    fn test_ids_monotonic_when_clock_stalls() {
        let mut chats = ChatCollection::new_at(1_000);
        let a = chats.create_at(1_000);
        let b = chats.create_at(999);
        assert!(a > ChatId::new(1_000));
        assert!(b > a);
    }

    #[test]
    fn test_deleted_ids_never_reused() {
        let mut chats = ChatCollection::new_at(1_000);
        let a = chats.create_at(1_001);
        chats.delete(a).unwrap();
        let b = chats.create_at(1_001);
        assert_ne!(a, b);
    }

    #[test]
    fn test_switch_does_not_touch_chats() {
        let mut chats = ChatCollection::new_at(1_000);
        let first = chats.active_id();
        chats.append_to_active(ResponseRecord::error("x"));
        chats.create_at(2_000);
        let before: Vec<Chat> = chats.chats().to_vec();

        chats.switch(first).unwrap();
        assert_eq!(chats.active_id(), first);
        assert_eq!(chats.chats(), before.as_slice());
    }

    #[test]
    fn test_switch_unknown_chat() {
        let mut chats = ChatCollection::new_at(1_000);
        let err = chats.switch(ChatId::new(7)).unwrap_err();
        assert_eq!(err, DomainError::ChatNotFound(ChatId::new(7)));
        assert_eq!(chats.active_id(), ChatId::new(1_000));
    }

    #[test]
    fn test_delete_last_chat_is_refused() {
        let mut chats = ChatCollection::new_at(1_000);
        let before = chats.clone();
        let err = chats.delete(ChatId::new(1_000)).unwrap_err();
        assert!(err.is_last_chat());
        assert_eq!(chats, before);
    }

    #[test]
    fn test_delete_active_falls_back_to_first() {
        let mut chats = ChatCollection::new_at(1_000);
        chats.create_at(2_000);
        let third = chats.create_at(3_000);

        chats.delete(third).unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats.active_id(), ChatId::new(1_000));

        chats.switch(ChatId::new(1_000)).unwrap();
        chats.delete(ChatId::new(1_000)).unwrap();
        assert_eq!(chats.active_id(), ChatId::new(2_000));
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let mut chats = ChatCollection::new_at(1_000);
        let second = chats.create_at(2_000);
        chats.delete(ChatId::new(1_000)).unwrap();
        assert_eq!(chats.active_id(), second);
    }

    #[test]
    fn test_deserialize_rejects_dangling_active() {
        let json = serde_json::json!({
            "chats": [{ "id": 1, "title": "New Chat" }],
            "active": 2,
        });
        assert!(serde_json::from_value::<ChatCollection>(json).is_err());

        let empty = serde_json::json!({ "chats": [], "active": 1 });
        assert!(serde_json::from_value::<ChatCollection>(empty).is_err());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_ids() {
        let json = serde_json::json!({
            "chats": [
                { "id": 7, "title": "New Chat" },
                { "id": 7, "title": "Other" },
            ],
            "active": 7,
        });
        let err = serde_json::from_value::<ChatCollection>(json).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_deserialize_rejects_exhausted_counter() {
        let json = serde_json::json!({
            "chats": [{ "id": 1, "title": "New Chat" }],
            "active": 1,
            "last_id": u64::MAX,
        });
        assert!(serde_json::from_value::<ChatCollection>(json).is_err());
    }

    #[test]
    fn test_serde_roundtrip_keeps_id_counter() {
        let mut chats = ChatCollection::new_at(1_000);
        let id = chats.create_at(5_000);
        chats.delete(id).unwrap();

        let json = serde_json::to_string(&chats).unwrap();
        let mut restored: ChatCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, chats);
        assert!(restored.create_at(1) > id);
    }
}
