//! Error types for Orange.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`OrangeError`] - Top-level error type for a request pipeline
//! - [`ContainerError`] - Service resolution errors
//! - [`RouterError`] - Route matching and reverse routing errors
//! - [`DispatchError`] - Controller resolution and invocation errors
//! - [`ConfigError`] - Boot-time configuration errors
//! - [`HookError`] - Errors raised by event listeners
//! - [`ViewError`] - Errors from the view collaborator

use std::path::PathBuf;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Orange operations.
#[derive(Error, Debug)]
pub enum OrangeError {
    /// A service could not be resolved.
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// Routing failed.
    #[error("routing error: {0}")]
    Router(#[from] RouterError),

    /// The controller could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A listener failed.
    #[error("hook error: {0}")]
    Hook(#[from] HookError),

    /// A view could not be rendered.
    #[error("view error: {0}")]
    View(#[from] ViewError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

impl OrangeError {
    /// Returns true if no route matched the request.
    ///
    /// Hosts use this to map a missing catch-all route to a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OrangeError::Router(RouterError::RouteNotFound { .. }))
    }
}

/// Errors that can occur while resolving services.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// Nothing is registered under the name.
    #[error("service not found: {0}")]
    ServiceNotFound(String),

    /// The registered service is not of the requested type.
    #[error("service \"{name}\" is not a {expected}")]
    ServiceTypeMismatch {
        /// Service name.
        name: String,
        /// Requested type name.
        expected: &'static str,
    },

    /// The service factory failed.
    #[error("service \"{name}\" could not be created")]
    ServiceFailed {
        /// Service name.
        name: String,
        /// The factory's error.
        #[source]
        source: BoxError,
    },
}

/// Errors that can occur during routing.
#[derive(Error, Debug)]
pub enum RouterError {
    /// No route matched the request.
    #[error("no route found for {method} {uri}")]
    RouteNotFound {
        /// Uppercased request method.
        method: String,
        /// Request URI as received.
        uri: String,
    },

    /// Reverse routing arguments do not fit the route pattern.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// No route carries the requested name.
    #[error("path \"{0}\" not found")]
    RouterNameNotFound(String),

    /// A route pattern is not a valid regular expression.
    #[error("invalid route pattern \"{pattern}\"")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: BoxError,
    },
}

/// Errors that can occur while dispatching to a controller.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No controller is registered under the reference.
    #[error("controller not found: {0}")]
    ControllerClassNotFound(String),

    /// The controller has no such action.
    #[error("controller method not found: {0}")]
    ControllerMethodNotFound(String),

    /// The route captured fewer arguments than the action takes.
    #[error("action \"{action}\" is missing argument {index}")]
    MissingArgument {
        /// Action name.
        action: String,
        /// Zero-based argument position.
        index: usize,
    },

    /// A captured argument could not be parsed into the parameter type.
    #[error("action \"{action}\" argument {index} is invalid: {reason}")]
    InvalidArgument {
        /// Action name.
        action: String,
        /// Zero-based argument position.
        index: usize,
        /// Parser message.
        reason: String,
    },

    /// The action itself failed.
    #[error("controller error")]
    Controller(#[source] BoxError),
}

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested section does not exist.
    #[error("config \"{0}\" not found")]
    ConfigNotFound(String),

    /// The configuration folder does not exist.
    #[error("config folder {0} not found")]
    ConfigFolderNotFound(PathBuf),

    /// A configuration file does not hold an object or array.
    #[error("config file {0} must contain an object or an array")]
    ConfigFileNotArray(PathBuf),

    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse {path}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: BoxError,
    },

    /// A section does not have the expected shape.
    #[error("config \"{name}\" is invalid")]
    Invalid {
        /// Section name.
        name: String,
        /// Underlying deserialization error.
        #[source]
        source: BoxError,
    },
}

/// A listener failed while an event was triggered.
#[derive(Error, Debug)]
#[error("listener for \"{event}\" failed")]
pub struct HookError {
    /// Normalized event name.
    pub event: String,
    /// The listener's error.
    #[source]
    pub source: BoxError,
}

/// Errors from the view collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The named template does not exist.
    #[error("view not found: {0}")]
    ViewNotFound(String),
}

// Convenience conversions
impl From<BoxError> for OrangeError {
    fn from(err: BoxError) -> Self {
        OrangeError::Custom(err)
    }
}

impl From<BoxError> for DispatchError {
    fn from(err: BoxError) -> Self {
        DispatchError::Controller(err)
    }
}
