//! Response conversion traits.

use crate::{
    error::{BoxError, DispatchError},
    hook::HookResult,
};

/// Trait for converting a listener's return value into a [`HookResult`].
///
/// # Default Implementations
///
/// - `()` → Next
/// - `bool` → `false` = Stop, `true` = Next
/// - `HookResult` → As is
/// - `Result<T, E>` → Delegates to inner `T` or propagates error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoHookResult`",
    label = "missing `IntoHookResult` implementation",
    note = "Listeners must return `()`, `bool`, `HookResult` or a `Result` of those."
)]
pub trait IntoHookResult {
    /// Convert the output into propagation behavior and optional error.
    fn into_hook_result(self) -> Result<HookResult, BoxError>;
}

impl IntoHookResult for () {
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        Ok(HookResult::Next)
    }
}

impl IntoHookResult for bool {
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        Ok(if self {
            HookResult::Next
        } else {
            HookResult::Stop
        })
    }
}

impl IntoHookResult for HookResult {
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        Ok(self)
    }
}

impl<T, E> IntoHookResult for Result<T, E>
where
    T: IntoHookResult,
    E: Into<BoxError>,
{
    fn into_hook_result(self) -> Result<HookResult, BoxError> {
        match self {
            Ok(t) => t.into_hook_result(),
            Err(e) => Err(e.into()),
        }
    }
}

/// Trait for converting a controller action's return value into a response body.
///
/// `None` means the action produced no body; the pipeline then appends nothing.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a controller action result",
    label = "missing `IntoBody` implementation",
    note = "Actions may return `()`, `String`, `&'static str`, `Option<String>` or a `Result` of those."
)]
pub trait IntoBody {
    /// Convert the output into an optional body.
    fn into_body(self) -> Result<Option<String>, DispatchError>;
}

impl IntoBody for () {
    fn into_body(self) -> Result<Option<String>, DispatchError> {
        Ok(None)
    }
}

impl IntoBody for String {
    fn into_body(self) -> Result<Option<String>, DispatchError> {
        Ok(Some(self))
    }
}

impl IntoBody for &'static str {
    fn into_body(self) -> Result<Option<String>, DispatchError> {
        Ok(Some(self.to_owned()))
    }
}

impl IntoBody for Option<String> {
    fn into_body(self) -> Result<Option<String>, DispatchError> {
        Ok(self)
    }
}

impl<T, E> IntoBody for Result<T, E>
where
    T: IntoBody,
    E: Into<BoxError>,
{
    fn into_body(self) -> Result<Option<String>, DispatchError> {
        match self {
            Ok(t) => t.into_body(),
            Err(e) => Err(DispatchError::Controller(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_result_conversions() {
        assert_eq!(().into_hook_result().unwrap(), HookResult::Next);
        assert_eq!(true.into_hook_result().unwrap(), HookResult::Next);
        assert_eq!(false.into_hook_result().unwrap(), HookResult::Stop);
        assert_eq!(HookResult::Stop.into_hook_result().unwrap(), HookResult::Stop);

        let failed: Result<(), std::io::Error> = Err(std::io::Error::other("nope"));
        assert_eq!(failed.into_hook_result().unwrap_err().to_string(), "nope");
    }

    #[test]
    fn test_body_conversions() {
        assert_eq!(().into_body().unwrap(), None);
        assert_eq!("hi".into_body().unwrap(), Some("hi".to_string()));
        assert_eq!(String::from("a").into_body().unwrap(), Some("a".to_string()));
        assert_eq!(None::<String>.into_body().unwrap(), None);

        let failed: Result<String, std::io::Error> = Err(std::io::Error::other("db down"));
        assert!(matches!(
            failed.into_body(),
            Err(DispatchError::Controller(e)) if e.to_string() == "db down"
        ));
    }
}
