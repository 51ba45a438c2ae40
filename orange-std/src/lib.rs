//! # orange-std
//!
//! Standard implementations for the Orange request pipeline.
//!
//! This crate provides:
//! - **Services**: [`Container`] with singleton, factory and reference entries
//! - **Events**: [`Events`], a priority-ordered listener registry
//! - **Routing**: [`Router`] over a regex route table, with reverse routing
//! - **Dispatch**: [`Dispatcher`] and [`ControllerRegistry`]
//! - **Request and response**: [`Input`], [`Output`], [`Response`]
//! - **Configuration**: [`Config`], loaded from a folder of JSON files
//! - **Standard listeners**: [`LoggingListener`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use orange_core;

// Modules
pub mod config;
pub mod container;
pub mod dispatcher;
pub mod events;
pub mod hooks;
pub mod input;
pub mod output;
pub mod routing;
pub mod testing;

pub use config::Config;
pub use container::Container;
pub use dispatcher::{ControllerContext, ControllerRegistry, Dispatcher, url_decode};
pub use events::{Events, ListenerId, Triggered};
pub use hooks::LoggingListener;
pub use input::{Input, InputSnapshot, RequestType};
pub use output::{HTML_KEY, JSON_CONTENT_TYPE, Output, OutputSettings, Response};
pub use routing::{ANY_METHOD, RouteDefinition, RouteMatch, Router};
