//! View collaborator interface.
//!
//! Template rendering lives outside the pipeline. Controllers that need it
//! resolve a [`Renderer`] from the container and call it with a view name and
//! a data map.

use crate::error::ViewError;
use std::collections::BTreeMap;

/// Data handed to a view, keyed by variable name.
pub type ViewData = BTreeMap<String, String>;

/// Renders a named view.
pub trait Renderer: Send + Sync {
    /// Render `name` with `data`, failing with [`ViewError::ViewNotFound`]
    /// if the template does not exist.
    fn render(&self, name: &str, data: &ViewData) -> Result<String, ViewError>;
}

impl<F> Renderer for F
where
    F: Fn(&str, &ViewData) -> Result<String, ViewError> + Send + Sync,
{
    fn render(&self, name: &str, data: &ViewData) -> Result<String, ViewError> {
        (self)(name, data)
    }
}
