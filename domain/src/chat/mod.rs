//! Chat domain.
//!
//! - [`entities::Chat`]: one conversation thread and its response log
//! - [`collection::ChatCollection`]: the set of chats with exactly one active

pub mod collection;
pub mod entities;
