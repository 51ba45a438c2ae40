//! # Hook outcomes and priorities
//!
//! Every listener in the pipeline reports a [`HookResult`]: continue with the
//! next listener, or stop the current trigger. Listeners registered for the
//! same event run in descending [`Priority`] order.

use std::fmt;

/// Result of listener execution indicating whether to continue or stop propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookResult {
    /// Continue with the next listener.
    #[default]
    Next,
    /// Skip the remaining listeners of this trigger.
    Stop,
}

impl HookResult {
    /// Returns true if propagation should stop.
    pub const fn is_stop(self) -> bool {
        matches!(self, HookResult::Stop)
    }
}

/// Listener priority. Higher values fire first; any `i32` is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Fires last among the named levels.
    pub const LOWEST: Priority = Priority(10);
    /// Below normal.
    pub const LOW: Priority = Priority(20);
    /// The default level.
    pub const NORMAL: Priority = Priority(50);
    /// Above normal.
    pub const HIGH: Priority = Priority(80);
    /// Fires first among the named levels.
    pub const HIGHEST: Priority = Priority(90);

    /// The raw value.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

impl From<i32> for Priority {
    fn from(value: i32) -> Self {
        Priority(value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
