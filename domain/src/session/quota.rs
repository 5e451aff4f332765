//! Message quota value object

use serde::{Deserialize, Serialize};

/// Messages a session may send before the limit notice is raised
pub const DEFAULT_MAX_MESSAGES: u32 = 3;

/// Per-session message allowance (Value Object)
///
/// `used` only grows, by exactly one per dispatched send, and never passes
/// `max`: the guard runs before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    used: u32,
    max: u32,
}

impl Quota {
    pub fn new(max: u32) -> Self {
        Self { used: 0, max }
    }

    /// Restore a persisted counter, clamped to `max`
    pub fn with_used(max: u32, used: u32) -> Self {
        Self {
            used: used.min(max),
            max,
        }
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn remaining(&self) -> u32 {
        self.max.saturating_sub(self.used)
    }

    /// Whether another send may be dispatched
    pub fn can_send(&self) -> bool {
        self.used < self.max
    }

    /// Count one completed send. Saturates at `max`.
    pub fn record_send(&mut self) {
        if self.can_send() {
            self.used += 1;
        }
    }

    /// Fraction used, in `0.0..=1.0`, for progress display
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            return 1.0;
        }
        f64::from(self.used) / f64::from(self.max)
    }
}

impl Default for Quota {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl std::fmt::Display for Quota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.used, self.max)
    }
}
