//! Domain layer for ai-fiesta
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Fan-out
//!
//! One user message is sent to every configured provider at once. Each
//! provider slot resolves independently to a [`ProviderOutcome`], and the
//! slots are gathered into a fixed-key [`ProviderResponses`] mapping.
//!
//! ## Session
//!
//! A session owns several [`Chat`]s, a message [`Quota`] and a small state
//! machine ([`SessionPhase`]) deciding whether a send may be dispatched.

pub mod chat;
pub mod core;
pub mod response;
pub mod session;

// Re-export commonly used types
pub use chat::{
    collection::ChatCollection,
    entities::{Chat, ChatId, DEFAULT_CHAT_TITLE},
};
pub use core::{
    catalog::{ModelDef, model_catalog},
    error::DomainError,
    message::{Conversation, Message, Role},
    provider::ProviderKey,
};
pub use response::{ProviderOutcome, ProviderResponses, ResponseRecord};
pub use session::{
    quota::{DEFAULT_MAX_MESSAGES, Quota},
    state::{SessionPhase, SessionSettings, SessionState},
    transition::{IgnoreReason, SessionEffect, SessionEvent, transition},
};
