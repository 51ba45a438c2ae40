//! # orange - a small MVC request pipeline
//!
//! A request enters through one front controller ([`Application`]), is
//! matched against a static route table, passes through priority-ordered
//! event listeners and is dispatched to a controller action. The action's
//! result is buffered in an [`Output`] and emitted as a [`Response`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use orange::prelude::*;
//!
//! struct Main<'a> {
//!     output: &'a mut Output,
//! }
//!
//! #[orange::controller]
//! impl<'a> Main<'a> {
//!     pub fn index(&mut self) -> &'static str {
//!         "<h1>Hello</h1>"
//!     }
//!
//!     pub fn product(&mut self, slug: String, id: u32) -> String {
//!         self.output.content_type("text/plain");
//!         format!("{slug} #{id}")
//!     }
//! }
//!
//! let app = Application::builder()
//!     .route(RouteDefinition::get("/", "Main", "index"))
//!     .route(RouteDefinition::get(r"/product/([a-z]+)/(\d+)", "Main", "product").named("product"))
//!     .controller(Main::NAME, Main::ACTIONS, |ctx| Box::new(Main { output: ctx.output }))
//!     .listen(BEFORE_CONTROLLER, LoggingListener::new(BEFORE_CONTROLLER), Priority::LOWEST)
//!     .build()?;
//!
//! let response = app.handle_request("/product/abc/123", "GET", Input::default())?;
//! response.write_to(std::io::stdout())?;
//! ```
//!
//! ## Crates
//!
//! - `orange-core`: traits, errors and hook vocabulary
//! - `orange-std`: container, events, router, dispatcher, input, output, config
//! - `orange-macros`: the `#[controller]` attribute

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod app;

pub use app::{
    AFTER_CONTROLLER, AFTER_OUTPUT, Application, ApplicationBuilder, BEFORE_CONTROLLER,
    BEFORE_ROUTER, CONFIG_SERVICE, Exchange, ROUTER_SERVICE,
};

pub use orange_core::{
    // Error types
    BoxError,
    ConfigError,
    ContainerError,
    // Controllers
    Controller,
    DispatchError,
    HookError,
    // Hook vocabulary
    HookResult,
    // Response conversions
    IntoBody,
    IntoHookResult,
    // Listeners
    BoxListener,
    Listener,
    OrangeError,
    Priority,
    // Views
    Renderer,
    RouterError,
    ViewData,
    ViewError,
    parse_arg,
};

pub use orange_std::{
    ANY_METHOD, Config, Container, ControllerContext, ControllerRegistry, Dispatcher, Events,
    HTML_KEY, Input, InputSnapshot, JSON_CONTENT_TYPE, ListenerId, LoggingListener, Output,
    OutputSettings, RequestType, Response, RouteDefinition, RouteMatch, Router, Triggered,
    url_decode,
};

/// Standard listener implementations.
pub mod hooks {
    pub use orange_std::hooks::LoggingListener;
}

/// Testing utilities.
pub mod testing {
    pub use orange_std::testing::{CountingListener, RecordingListener};
}

/// Prelude module - common imports for Orange.
///
/// # Usage
///
/// ```rust,ignore
/// use orange::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Front controller
        AFTER_CONTROLLER,
        AFTER_OUTPUT,
        Application,
        BEFORE_CONTROLLER,
        BEFORE_ROUTER,
        // Errors
        BoxError,
        // Services
        Container,
        // Controllers
        Controller,
        ControllerContext,
        DispatchError,
        Exchange,
        HookResult,
        Input,
        IntoBody,
        Listener,
        LoggingListener,
        OrangeError,
        Output,
        Priority,
        RouteDefinition,
    };
}

#[cfg(feature = "macros")]
pub use orange_macros::controller;
