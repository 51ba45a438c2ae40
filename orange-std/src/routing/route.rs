//! Route definitions and matches.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Matches any request method.
pub const ANY_METHOD: &str = "*";

/// A static route table entry.
///
/// Deserializes from
/// `{"method": "GET", "url": "/test/([a-z]+)", "callback": ["Test", "index"], "name": "test"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Request method, or `*` for any.
    pub method: String,
    /// Regular expression body matched against the whole normalized path.
    pub url: String,
    /// Controller reference and action name.
    pub callback: (String, String),
    /// Name used for reverse routing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RouteDefinition {
    /// Create a route for `method`.
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            callback: (controller.into(), action.into()),
            name: None,
        }
    }

    /// Create a route matching any method.
    pub fn any(
        url: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new(ANY_METHOD, url, controller, action)
    }

    /// Create a `GET` route.
    pub fn get(
        url: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new("GET", url, controller, action)
    }

    /// Create a `POST` route.
    pub fn post(
        url: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::new("POST", url, controller, action)
    }

    /// Set the route name (builder style).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Controller reference.
    pub fn controller(&self) -> &str {
        &self.callback.0
    }

    /// Action name.
    pub fn action(&self) -> &str {
        &self.callback.1
    }

    pub(crate) fn accepts(&self, method: &str) -> bool {
        self.method == ANY_METHOD || self.method.eq_ignore_ascii_case(method)
    }
}

/// The result of routing one request.
///
/// Fields are public so `before.controller` listeners can rewrite the target
/// or the arguments before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteMatch {
    /// Uppercased request method.
    pub request_method: String,
    /// Request URI as received.
    pub request_uri: String,
    /// Pattern of the matching route.
    pub matched_uri: String,
    /// Uppercased method of the matching route.
    pub matched_method: String,
    /// Controller reference.
    pub controller: String,
    /// Action name.
    pub method: String,
    /// The full matched path.
    pub url: String,
    /// Positional capture groups.
    pub args: Vec<String>,
}

impl RouteMatch {
    /// Number of captured arguments.
    pub fn count(&self) -> usize {
        self.args.len()
    }

    /// Whether any argument was captured.
    pub fn has_args(&self) -> bool {
        !self.args.is_empty()
    }

    /// Look up a field by its wire name.
    ///
    /// Known keys are `requestMethod`, `requestURI`, `matchedURI`,
    /// `matchedMethod`, `controller`, `method`, `url`, `args`, `count` and
    /// `has`.
    pub fn field(&self, key: &str) -> Option<Value> {
        let value = match key {
            "requestMethod" => json!(self.request_method),
            "requestURI" => json!(self.request_uri),
            "matchedURI" => json!(self.matched_uri),
            "matchedMethod" => json!(self.matched_method),
            "controller" => json!(self.controller),
            "method" => json!(self.method),
            "url" => json!(self.url),
            "args" => json!(self.args),
            "count" => json!(self.count()),
            "has" => json!(self.has_args()),
            _ => return None,
        };
        Some(value)
    }

    /// Every field as a JSON object, keyed by wire name.
    pub fn to_value(&self) -> Value {
        json!({
            "requestMethod": self.request_method,
            "requestURI": self.request_uri,
            "matchedURI": self.matched_uri,
            "matchedMethod": self.matched_method,
            "controller": self.controller,
            "method": self.method,
            "url": self.url,
            "args": self.args,
            "count": self.count(),
            "has": self.has_args(),
        })
    }
}
