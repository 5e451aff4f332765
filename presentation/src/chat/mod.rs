//! Interactive chat module
//!
//! Provides a line-editor based chat interface over a quota-limited session.

mod repl;

pub use repl::{ChatRepl, ReplCommand};
