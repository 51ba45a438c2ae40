//! # orange-core
//!
//! Core traits for the Orange request pipeline.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! controllers and middleware that don't need the full `orange-std`
//! implementation.
//!
//! # Pipeline Vocabulary
//!
//! ## Listeners ([`Listener`])
//!
//! Callbacks bound to a named event. They receive the event argument by
//! mutable reference and answer with a [`HookResult`]: `Next` or `Stop`.
//! Listeners of one event run in descending [`Priority`] order.
//!
//! ## Controllers ([`Controller`])
//!
//! The terminal point of a request. A controller exposes named actions that
//! receive the positional arguments captured by the router and return a body
//! contribution ([`IntoBody`]).
//!
//! ## Views ([`Renderer`])
//!
//! The narrow interface to an external template engine.
//!
//! # Error Types
//!
//! - [`OrangeError`] - Top-level error type
//! - [`ContainerError`], [`RouterError`], [`DispatchError`], [`ConfigError`],
//!   [`HookError`], [`ViewError`] - one per pipeline stage

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod controller;
mod error;
mod hook;
mod listener;
mod response;
mod view;

// Re-exports
pub use controller::{Controller, parse_arg};
pub use error::{
    BoxError, ConfigError, ContainerError, DispatchError, HookError, OrangeError, RouterError,
    ViewError,
};
pub use hook::{HookResult, Priority};
pub use listener::{BoxListener, Listener};
pub use response::{IntoBody, IntoHookResult};
pub use view::{Renderer, ViewData};
