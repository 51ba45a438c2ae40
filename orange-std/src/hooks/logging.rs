//! Logging listener for event observation.

use orange_core::{BoxError, HookResult, Listener};
use std::fmt::Debug;

/// A listener that logs the event argument and lets propagation continue.
///
/// The listener does not know which event it is bound to, so it carries a
/// label of its own.
///
/// # Example
///
/// ```rust,ignore
/// events.register("after.output", LoggingListener::new("after.output"), Priority::LOWEST);
/// ```
#[derive(Debug, Clone)]
pub struct LoggingListener {
    label: String,
}

impl LoggingListener {
    /// Create a logging listener with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The label written with every record.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new("event")
    }
}

impl<A: Debug + ?Sized> Listener<A> for LoggingListener {
    fn on_event(&self, args: &mut A) -> Result<HookResult, BoxError> {
        tracing::info!(event = %self.label, ?args, "processing event");
        Ok(HookResult::Next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_listener_continues() {
        let listener = LoggingListener::new("test");
        let mut value = vec![1, 2, 3];

        let result = listener.on_event(&mut value).unwrap();

        assert_eq!(result, HookResult::Next);
        assert_eq!(value, vec![1, 2, 3]);
        assert_eq!(listener.label(), "test");
    }
}
