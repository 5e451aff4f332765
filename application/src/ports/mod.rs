//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod aggregator;
pub mod conversation_logger;
pub mod progress;
pub mod provider;
pub mod session_store;
