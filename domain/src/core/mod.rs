//! Core domain concepts shared across all subdomains.
//!
//! - [`provider::ProviderKey`]: the fixed set of providers a message fans out to
//! - [`message::Conversation`]: a validated, non-empty list of role/content turns
//! - [`catalog::ModelDef`]: the models offered by the upstream providers
//! - [`error::DomainError`]: domain-level errors

pub mod catalog;
pub mod error;
pub mod message;
pub mod provider;
