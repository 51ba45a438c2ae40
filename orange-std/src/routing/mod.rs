//! # Routing
//!
//! A [`Router`] holds an ordered table of [`RouteDefinition`]s. Each entry
//! pairs a request method (or `*`) with a regular expression body that must
//! match the whole normalized request path. Capture groups become the
//! positional arguments of the resulting [`RouteMatch`].
//!
//! Named routes can be turned back into URLs with [`Router::get_url`].

mod reverse;
mod route;
mod router;

pub use route::{ANY_METHOD, RouteDefinition, RouteMatch};
pub use router::Router;
