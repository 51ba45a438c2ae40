//! Controller resolution and invocation.
//!
//! Controllers are registered at boot in a [`ControllerRegistry`] under their
//! reference name, together with the list of actions they expose and a
//! constructor. The [`Dispatcher`] looks up the controller named by a
//! [`RouteMatch`], builds it with the request's [`ControllerContext`] and
//! invokes the action with the URL-decoded arguments.
//!
//! # Example
//!
//! ```rust,ignore
//! struct Hello<'a> {
//!     output: &'a mut Output,
//! }
//!
//! impl Controller for Hello<'_> {
//!     fn invoke(&mut self, action: &str, args: Vec<String>) -> Result<Option<String>, DispatchError> {
//!         self.output.content_type("text/plain");
//!         Ok(Some(format!("hello {}", args.join(" "))))
//!     }
//! }
//!
//! let mut registry = ControllerRegistry::new();
//! registry.register("Hello", &["index"], |ctx| Box::new(Hello { output: ctx.output }));
//! let dispatcher = Dispatcher::new(registry);
//! ```

use crate::{container::Container, input::Input, output::Output, routing::RouteMatch};
use indexmap::IndexMap;
use orange_core::{Controller, DispatchError};
use percent_encoding::percent_decode_str;
use std::fmt;

/// What a controller receives when it is built for a request.
pub struct ControllerContext<'a> {
    /// The request input.
    pub input: &'a Input,
    /// The response buffer.
    pub output: &'a mut Output,
    /// The service container.
    pub container: &'a Container,
}

type ControllerFactory =
    Box<dyn for<'a> Fn(ControllerContext<'a>) -> Box<dyn Controller + 'a> + Send + Sync>;

struct ControllerEntry {
    name: String,
    actions: &'static [&'static str],
    factory: ControllerFactory,
}

impl ControllerEntry {
    fn action(&self, name: &str) -> Option<&'static str> {
        self.actions
            .iter()
            .copied()
            .find(|action| action.eq_ignore_ascii_case(name))
    }
}

/// Controllers known to a [`Dispatcher`], keyed case-insensitively.
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: IndexMap<String, ControllerEntry>,
}

impl ControllerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller (chainable).
    ///
    /// `actions` lists the action names the controller answers to; types
    /// annotated with `#[controller]` provide it as `ACTIONS`.
    pub fn register<F>(
        &mut self,
        name: &str,
        actions: &'static [&'static str],
        factory: F,
    ) -> &mut Self
    where
        F: for<'a> Fn(ControllerContext<'a>) -> Box<dyn Controller + 'a> + Send + Sync + 'static,
    {
        tracing::trace!(controller = name, actions = actions.len(), "registering controller");
        self.controllers.insert(
            name.to_lowercase(),
            ControllerEntry {
                name: name.to_owned(),
                actions,
                factory: Box::new(factory),
            },
        );
        self
    }

    /// Check if a controller is registered.
    pub fn has(&self, name: &str) -> bool {
        self.controllers.contains_key(&name.to_lowercase())
    }

    /// Registered controller names, as given at registration.
    pub fn names(&self) -> Vec<&str> {
        self.controllers.values().map(|e| e.name.as_str()).collect()
    }

    /// Actions of a controller.
    pub fn actions(&self, name: &str) -> Option<&'static [&'static str]> {
        self.controllers.get(&name.to_lowercase()).map(|e| e.actions)
    }

    /// Get the number of controllers.
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    fn get(&self, name: &str) -> Option<&ControllerEntry> {
        self.controllers.get(&name.to_lowercase())
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.controllers.values().map(|e| (&e.name, e.actions)))
            .finish()
    }
}

/// Invokes the controller action selected by a route.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: ControllerRegistry,
}

impl Dispatcher {
    /// Create a dispatcher over a registry.
    pub fn new(registry: ControllerRegistry) -> Self {
        Self { registry }
    }

    /// The controller registry.
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Build the controller of `route` and run its action.
    ///
    /// Returns the body contribution of the action, if any.
    pub fn call(
        &self,
        route: &RouteMatch,
        ctx: ControllerContext<'_>,
    ) -> Result<Option<String>, DispatchError> {
        let entry = self
            .registry
            .get(&route.controller)
            .ok_or_else(|| DispatchError::ControllerClassNotFound(route.controller.clone()))?;

        let action = entry
            .action(&route.method)
            .ok_or_else(|| DispatchError::ControllerMethodNotFound(route.method.clone()))?;

        let args: Vec<String> = route.args.iter().map(|arg| url_decode(arg)).collect();

        tracing::debug!(
            controller = %entry.name,
            action,
            args = args.len(),
            "dispatching"
        );

        let mut controller = (entry.factory)(ctx);
        controller.invoke(action, args)
    }
}

/// Decode a URL component: `+` becomes a space, then percent escapes are
/// resolved. Invalid UTF-8 is replaced.
pub fn url_decode(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}
