//! # Controller
//!
//! The terminal point of the request pipeline. A controller is constructed per
//! request with its collaborators and then asked to run one action with the
//! positional arguments captured by the router.
//!
//! Controllers are never looked up by reflection. They are registered at boot
//! in a lookup table together with the list of actions they expose; the
//! `#[controller]` attribute generates both the list and [`Controller::invoke`].

use crate::error::DispatchError;
use std::{fmt::Display, str::FromStr};

/// A request handler exposing named actions.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a controller",
    label = "missing `Controller` implementation",
    note = "Annotate the controller's `impl` block with `#[orange::controller]` or implement `invoke`."
)]
pub trait Controller {
    /// Run `action` with the decoded route arguments.
    ///
    /// Returns the body contribution of the action, if any.
    fn invoke(&mut self, action: &str, args: Vec<String>) -> Result<Option<String>, DispatchError>;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn invoke(&mut self, action: &str, args: Vec<String>) -> Result<Option<String>, DispatchError> {
        (**self).invoke(action, args)
    }
}

/// Bind one positional argument for an action.
///
/// Used by the code generated by `#[controller]`.
pub fn parse_arg<T>(raw: Option<String>, action: &str, index: usize) -> Result<T, DispatchError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = raw.ok_or_else(|| DispatchError::MissingArgument {
        action: action.to_owned(),
        index,
    })?;

    raw.parse().map_err(|e: T::Err| DispatchError::InvalidArgument {
        action: action.to_owned(),
        index,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Controller for Echo {
        fn invoke(
            &mut self,
            action: &str,
            args: Vec<String>,
        ) -> Result<Option<String>, DispatchError> {
            match action {
                "echo" => Ok(Some(args.join(","))),
                _ => Err(DispatchError::ControllerMethodNotFound(action.to_owned())),
            }
        }
    }

    #[test]
    fn test_parse_arg() {
        let id: u32 = parse_arg(Some("42".into()), "show", 0).unwrap();
        assert_eq!(id, 42);

        let name: String = parse_arg(Some("abc".into()), "show", 1).unwrap();
        assert_eq!(name, "abc");
    }

    #[test]
    fn test_parse_arg_errors() {
        let missing = parse_arg::<String>(None, "show", 2);
        assert!(matches!(
            missing,
            Err(DispatchError::MissingArgument { index: 2, .. })
        ));

        let invalid = parse_arg::<u32>(Some("abc".into()), "show", 0);
        assert!(matches!(
            invalid,
            Err(DispatchError::InvalidArgument { index: 0, .. })
        ));
    }

    #[test]
    fn test_boxed_controller_invokes() {
        let mut controller: Box<dyn Controller> = Box::new(Echo);
        let body = controller
            .invoke("echo", vec!["a".into(), "b".into()])
            .unwrap();
        assert_eq!(body.as_deref(), Some("a,b"));
    }
}
