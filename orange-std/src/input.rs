//! Request input snapshot.

use serde::Deserialize;
use std::{collections::BTreeMap, fmt};

/// Raw request data, as handed over by the host.
///
/// Every map may use any key case; [`Input`] lowercases them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputSnapshot {
    /// Raw request body.
    pub raw: String,
    /// Query string parameters.
    pub get: BTreeMap<String, String>,
    /// Form parameters.
    pub post: BTreeMap<String, String>,
    /// Merged request parameters.
    pub request: BTreeMap<String, String>,
    /// Server variables (`request_uri`, `request_method`, `http_*` headers).
    pub server: BTreeMap<String, String>,
    /// Environment variables.
    pub env: BTreeMap<String, String>,
    /// Cookies.
    pub cookie: BTreeMap<String, String>,
}

macro_rules! with_entry {
    ($($(#[$doc:meta])* $method:ident => $field:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $method(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
                self.$field.insert(name.into(), value.into());
                self
            }
        )*
    };
}

impl InputSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw body.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    with_entry! {
        /// Add a query string parameter.
        with_get => get,
        /// Add a form parameter.
        with_post => post,
        /// Add a request parameter.
        with_request => request,
        /// Add a server variable.
        with_server => server,
        /// Add an environment variable.
        with_env => env,
        /// Add a cookie.
        with_cookie => cookie,
    }
}

/// How the request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// An XHR or a client asking for JSON.
    Ajax,
    /// No HTTP request method: command line.
    Cli,
    /// A regular browser request.
    Html,
}

impl RequestType {
    /// Uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Ajax => "AJAX",
            RequestType::Cli => "CLI",
            RequestType::Html => "HTML",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the current request.
#[derive(Debug, Clone)]
pub struct Input {
    snapshot: InputSnapshot,
    request_type: RequestType,
}

impl Input {
    /// Build the input from a snapshot, lowercasing every key.
    pub fn new(snapshot: InputSnapshot) -> Self {
        let snapshot = InputSnapshot {
            raw: snapshot.raw,
            get: lowercase_keys(snapshot.get),
            post: lowercase_keys(snapshot.post),
            request: lowercase_keys(snapshot.request),
            server: lowercase_keys(snapshot.server),
            env: lowercase_keys(snapshot.env),
            cookie: lowercase_keys(snapshot.cookie),
        };

        let is_ajax = snapshot
            .server
            .get("http_x_requested_with")
            .is_some_and(|v| v.eq_ignore_ascii_case("xmlhttprequest"));
        let wants_json = snapshot
            .server
            .get("http_accept")
            .is_some_and(|v| v.to_lowercase().contains("application/json"));
        let has_method = snapshot
            .server
            .get("request_method")
            .is_some_and(|v| !v.is_empty());

        let request_type = if is_ajax || wants_json {
            RequestType::Ajax
        } else if !has_method {
            RequestType::Cli
        } else {
            RequestType::Html
        };

        Self {
            snapshot,
            request_type,
        }
    }

    /// Raw request body.
    pub fn raw(&self) -> &str {
        &self.snapshot.raw
    }

    /// Query string parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        pick(&self.snapshot.get, name)
    }

    /// Form parameter.
    pub fn post(&self, name: &str) -> Option<&str> {
        pick(&self.snapshot.post, name)
    }

    /// Request parameter.
    pub fn request(&self, name: &str) -> Option<&str> {
        pick(&self.snapshot.request, name)
    }

    /// Server variable.
    pub fn server(&self, name: &str) -> Option<&str> {
        pick(&self.snapshot.server, name)
    }

    /// Environment variable.
    pub fn env(&self, name: &str) -> Option<&str> {
        pick(&self.snapshot.env, name)
    }

    /// Cookie.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        pick(&self.snapshot.cookie, name)
    }

    /// Every map, with lowercased keys.
    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    /// The request URI, or `/` when the host gave none.
    pub fn request_uri(&self) -> &str {
        self.server("request_uri").unwrap_or("/")
    }

    /// Uppercased request method, `CLI` when absent.
    pub fn request_method(&self) -> String {
        self.server("request_method")
            .filter(|m| !m.is_empty())
            .map_or_else(|| "CLI".to_owned(), str::to_uppercase)
    }

    /// How the request was made.
    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    /// Whether this is an XHR or JSON request.
    pub fn is_ajax_request(&self) -> bool {
        self.request_type == RequestType::Ajax
    }

    /// Whether this is a command line request.
    pub fn is_cli_request(&self) -> bool {
        self.request_type == RequestType::Cli
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(InputSnapshot::default())
    }
}

impl From<InputSnapshot> for Input {
    fn from(snapshot: InputSnapshot) -> Self {
        Self::new(snapshot)
    }
}

fn lowercase_keys(map: BTreeMap<String, String>) -> BTreeMap<String, String> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}

fn pick<'a>(map: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    map.get(&name.to_lowercase()).map(String::as_str)
}
