//! Event bus for named, priority-ordered listeners.
//!
//! [`Events`] stores listeners per event name and triggers them with a
//! mutable argument. Each name keeps its listeners sorted by descending
//! priority; listeners with equal priority keep their registration order.
//!
//! # Example
//! ```ignore
//! let mut events = Events::<String>::new();
//! events
//!     .register("page.open", |s: &mut String| s.push_str("[low]"), Priority::LOW)
//!     .register("page.open", |s: &mut String| s.push_str("[high]"), Priority::HIGH);
//!
//! let mut page = String::new();
//! events.trigger("page.open", &mut page)?;
//! assert_eq!(page, "[high][low]");
//! ```

use indexmap::IndexMap;
use orange_core::{BoxListener, HookError, HookResult, Listener, Priority};
use std::fmt;

/// Identifies one registered listener, for [`Events::unregister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Outcome of [`Events::trigger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Triggered {
    /// Whether a listener stopped propagation.
    pub stopped: bool,
    /// Number of listeners that ran.
    pub executed: usize,
}

/// A listener entry with associated metadata.
struct ListenerEntry<A: ?Sized> {
    id: ListenerId,
    priority: Priority,
    listener: BoxListener<A>,
}

/// Named-event registry.
///
/// Names are case-insensitive. Triggering a name without listeners is a no-op.
pub struct Events<A: ?Sized> {
    listeners: IndexMap<String, Vec<ListenerEntry<A>>>,
    next_id: u64,
}

impl<A: ?Sized + 'static> Events<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: IndexMap::new(),
            next_id: 0,
        }
    }

    /// Register a listener (chainable).
    pub fn register<L>(&mut self, name: &str, listener: L, priority: impl Into<Priority>) -> &mut Self
    where
        L: Listener<A>,
    {
        self.subscribe(name, listener, priority);
        self
    }

    /// Register a listener and return its id.
    pub fn subscribe<L>(&mut self, name: &str, listener: L, priority: impl Into<Priority>) -> ListenerId
    where
        L: Listener<A>,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        let priority = priority.into();
        let entries = self.listeners.entry(normalize(name)).or_default();

        // Insert after every entry of equal or higher priority so that the
        // list stays sorted and ties keep registration order.
        let at = entries.partition_point(|e| e.priority >= priority);
        entries.insert(
            at,
            ListenerEntry {
                id,
                priority,
                listener: Box::new(listener),
            },
        );

        id
    }

    /// Trigger an event.
    ///
    /// Listeners run in descending priority order and see each other's
    /// mutations of `args`. A listener returning [`HookResult::Stop`] ends the
    /// trigger; a listener returning an error aborts it and the error is
    /// returned.
    pub fn trigger(&self, name: &str, args: &mut A) -> Result<Triggered, HookError> {
        let name = normalize(name);
        let mut triggered = Triggered::default();

        let Some(entries) = self.listeners.get(&name) else {
            return Ok(triggered);
        };

        tracing::debug!(event = %name, listeners = entries.len(), "triggering event");

        for entry in entries {
            triggered.executed += 1;
            match entry.listener.on_event(args) {
                Ok(HookResult::Next) => continue,
                Ok(HookResult::Stop) => {
                    tracing::debug!(event = %name, priority = %entry.priority, "listener stopped propagation");
                    triggered.stopped = true;
                    break;
                }
                Err(source) => return Err(HookError { event: name, source }),
            }
        }

        Ok(triggered)
    }

    /// Check if any listener is registered for `name`.
    pub fn has(&self, name: &str) -> bool {
        self.listeners.contains_key(&normalize(name))
    }

    /// Remove one listener, or every listener of `name` when `id` is `None`.
    ///
    /// Returns true if something was removed. An event left without listeners
    /// is forgotten.
    pub fn unregister(&mut self, name: &str, id: Option<ListenerId>) -> bool {
        let name = normalize(name);

        let Some(id) = id else {
            return self.listeners.shift_remove(&name).is_some();
        };

        let Some(entries) = self.listeners.get_mut(&name) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;

        if entries.is_empty() {
            self.listeners.shift_remove(&name);
        }

        removed
    }

    /// Remove all listeners (chainable).
    pub fn unregister_all(&mut self) -> &mut Self {
        self.listeners.clear();
        self
    }

    /// Names with registered listeners, in first-registration order.
    pub fn events(&self) -> Vec<String> {
        self.listeners.keys().cloned().collect()
    }

    /// Number of listeners registered for `name`.
    pub fn count(&self, name: &str) -> usize {
        self.listeners.get(&normalize(name)).map_or(0, Vec::len)
    }

    /// Priorities of the listeners of `name`, in firing order.
    pub fn priorities(&self, name: &str) -> Vec<Priority> {
        self.listeners
            .get(&normalize(name))
            .map(|entries| entries.iter().map(|e| e.priority).collect())
            .unwrap_or_default()
    }
}

impl<A: ?Sized + 'static> Default for Events<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> fmt::Debug for Events<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.listeners.iter().map(|(name, entries)| (name, entries.len())))
            .finish()
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use orange_core::BoxError;

    fn appender(tag: &'static str) -> impl Fn(&mut String) + Send + Sync + 'static {
        move |s: &mut String| s.push_str(tag)
    }

    #[test]
    fn test_descending_priority_with_stable_ties() {
        let mut events = Events::<String>::new();
        events
            .register("test", appender("[highest1]"), Priority::HIGHEST)
            .register("test", appender("[low]"), Priority::LOW)
            .register("test", appender("[highest2]"), Priority::HIGHEST)
            .register("test", appender("[normal]"), Priority::NORMAL);

        let mut value = String::new();
        let triggered = events.trigger("test", &mut value).unwrap();

        assert_eq!(value, "[highest1][highest2][normal][low]");
        assert_eq!(triggered.executed, 4);
        assert!(!triggered.stopped);
    }

    #[test]
    fn test_registration_after_trigger_is_ordered() {
        let mut events = Events::<String>::new();
        events.register("test", appender("b"), Priority::NORMAL);

        let mut value = String::new();
        events.trigger("test", &mut value).unwrap();

        events.register("test", appender("a"), Priority::HIGH);
        events.register("test", appender("c"), -100);

        let mut value = String::new();
        events.trigger("test", &mut value).unwrap();
        assert_eq!(value, "abc");
        assert_eq!(
            events.priorities("test"),
            vec![Priority::HIGH, Priority::NORMAL, Priority(-100)]
        );
    }

    #[test]
    fn test_false_stops_propagation() {
        let mut events = Events::<String>::new();
        events
            .register(
                "test",
                |s: &mut String| {
                    s.push_str("first");
                    false
                },
                Priority::HIGH,
            )
            .register("test", appender("second"), Priority::LOW);

        let mut value = String::new();
        let triggered = events.trigger("test", &mut value).unwrap();

        assert_eq!(value, "first");
        assert!(triggered.stopped);
        assert_eq!(triggered.executed, 1);
    }

    #[test]
    fn test_error_aborts_and_propagates() {
        let mut events = Events::<String>::new();
        events
            .register(
                "test",
                |s: &mut String| -> Result<(), BoxError> {
                    s.push_str("ran");
                    Err("boom".into())
                },
                Priority::HIGH,
            )
            .register("test", appender("never"), Priority::LOW);

        let mut value = String::new();
        let err = events.trigger("Test", &mut value).unwrap_err();

        assert_eq!(err.event, "test");
        assert_eq!(err.source.to_string(), "boom");
        assert_eq!(value, "ran");
    }

    #[test]
    fn test_unknown_event_is_noop() {
        let events = Events::<String>::new();
        let mut value = String::from("same");

        let triggered = events.trigger("nothing.here", &mut value).unwrap();
        assert_eq!(triggered, Triggered::default());
        assert_eq!(value, "same");
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut events = Events::<String>::new();
        events.register("Page.Open", appender("x"), Priority::NORMAL);

        assert!(events.has("page.open"));
        assert_eq!(events.count("PAGE.OPEN"), 1);
        assert_eq!(events.events(), vec!["page.open".to_string()]);

        let mut value = String::new();
        events.trigger("page.OPEN", &mut value).unwrap();
        assert_eq!(value, "x");
    }

    #[test]
    fn test_unregister() {
        let mut events = Events::<String>::new();
        let keep = events.subscribe("test", appender("keep"), Priority::NORMAL);
        let dropped = events.subscribe("test", appender("drop"), Priority::NORMAL);
        events.register("other", appender("other"), Priority::NORMAL);

        assert!(events.unregister("test", Some(dropped)));
        assert!(!events.unregister("test", Some(dropped)));
        assert_eq!(events.count("test"), 1);

        let mut value = String::new();
        events.trigger("test", &mut value).unwrap();
        assert_eq!(value, "keep");

        assert!(events.unregister("test", Some(keep)));
        assert!(!events.has("test"));

        assert!(events.unregister("other", None));
        assert!(!events.unregister("other", None));
    }

    #[test]
    fn test_unregister_all() {
        let mut events = Events::<String>::new();
        events
            .register("a", appender("a"), Priority::NORMAL)
            .register("b", appender("b"), Priority::NORMAL);

        events.unregister_all();
        assert!(events.events().is_empty());
        assert_eq!(events.count("a"), 0);
    }
}
