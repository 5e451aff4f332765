//! Client session domain.
//!
//! - [`quota::Quota`]: per-session message allowance
//! - [`state::SessionState`]: everything a session owns (phase, quota, chats)
//! - [`transition::transition`]: the pure state machine driving sends

pub mod quota;
pub mod state;
pub mod transition;
