//! # Listener
//!
//! A listener is bound to a named event and receives the event's argument by
//! mutable reference. Later listeners observe the mutations of earlier ones,
//! which is how middleware rewrites a route before dispatch or a body after it.
//!
//! Closures of the form `Fn(&mut A) -> R` where `R: IntoHookResult` are
//! listeners, so most registrations need no dedicated type:
//!
//! ```rust,ignore
//! events.register("after.controller", |body: &mut String| {
//!     body.push_str("<!-- cached -->");
//! }, Priority::LOW);
//! ```

use crate::{error::BoxError, hook::HookResult, response::IntoHookResult};

/// A callback bound to a named event.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Listener<{A}>`",
    label = "missing `Listener` implementation",
    note = "Listeners must implement `on_event(&self, &mut {A})`, or be a closure `Fn(&mut {A}) -> R`."
)]
pub trait Listener<A: ?Sized>: Send + Sync + 'static {
    /// Called when the event is triggered.
    fn on_event(&self, args: &mut A) -> Result<HookResult, BoxError>;
}

// Blanket implementation for closures
impl<A, F, R> Listener<A> for F
where
    A: ?Sized,
    F: Fn(&mut A) -> R + Send + Sync + 'static,
    R: IntoHookResult,
{
    fn on_event(&self, args: &mut A) -> Result<HookResult, BoxError> {
        (self)(args).into_hook_result()
    }
}

/// A boxed, type-erased listener.
pub type BoxListener<A> = Box<dyn Listener<A>>;

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Listener<String> for Upper {
        fn on_event(&self, args: &mut String) -> Result<HookResult, BoxError> {
            *args = args.to_uppercase();
            Ok(HookResult::Next)
        }
    }

    #[test]
    fn test_closure_listener_mutates_argument() {
        let listener = |s: &mut String| s.push('!');
        let mut value = String::from("hi");

        assert_eq!(listener.on_event(&mut value).unwrap(), HookResult::Next);
        assert_eq!(value, "hi!");
    }

    #[test]
    fn test_boxed_listener_dispatches_dynamically() {
        let listener: BoxListener<String> = Box::new(Upper);
        let mut value = String::from("abc");

        listener.on_event(&mut value).unwrap();
        assert_eq!(value, "ABC");
    }

    #[test]
    fn test_closure_returning_false_stops() {
        let listener = |_: &mut String| false;
        let mut value = String::new();
        assert_eq!(listener.on_event(&mut value).unwrap(), HookResult::Stop);
    }
}
