//! Testing utilities for Orange.
//!
//! This module provides listeners that make assertions about event dispatch
//! easier.
//!
//! # Features
//!
//! - [`RecordingListener`]: records a copy of every argument it receives
//! - [`CountingListener`]: counts invocations

use orange_core::{BoxError, HookResult, Listener};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Listener
// ============================================================================

/// A listener that records a clone of every argument it receives.
///
/// Clones share the same record, so keep one clone for assertions and
/// register the other.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingListener::<String>::new();
/// events.register("test", recorder.clone(), Priority::NORMAL);
///
/// events.trigger("test", &mut String::from("hello"))?;
/// assert_eq!(recorder.events(), vec!["hello".to_string()]);
/// ```
pub struct RecordingListener<A: Clone> {
    events: Arc<Mutex<Vec<A>>>,
    result: HookResult,
    error: Option<String>,
}

impl<A: Clone> RecordingListener<A> {
    /// Create a recording listener that returns `Next`.
    pub fn new() -> Self {
        Self::with_result(HookResult::Next)
    }

    /// Create a recording listener that returns a specific result.
    pub fn with_result(result: HookResult) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            result,
            error: None,
        }
    }

    /// Create a recording listener that fails with `message` after recording.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::new()
        }
    }

    /// Get a clone of the recorded arguments.
    pub fn events(&self) -> Vec<A> {
        self.lock().clone()
    }

    /// Get the number of recorded arguments.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Clear the record.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<A>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: Clone> Default for RecordingListener<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Clone> Clone for RecordingListener<A> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            result: self.result,
            error: self.error.clone(),
        }
    }
}

impl<A: Clone + Send + 'static> Listener<A> for RecordingListener<A> {
    fn on_event(&self, args: &mut A) -> Result<HookResult, BoxError> {
        self.lock().push(args.clone());

        match &self.error {
            Some(message) => Err(message.clone().into()),
            None => Ok(self.result),
        }
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations, for any argument type.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingListener::new();
/// events.register("test", counter.clone(), Priority::NORMAL);
///
/// events.trigger("test", &mut ())?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingListener {
    count: Arc<AtomicUsize>,
}

impl CountingListener {
    /// Create a new counting listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<A: ?Sized> Listener<A> for CountingListener {
    fn on_event(&self, _args: &mut A) -> Result<HookResult, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(HookResult::Next)
    }
}
