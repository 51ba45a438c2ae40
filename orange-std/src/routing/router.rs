//! Regex route table.

use super::{
    reverse::UrlTemplate,
    route::{RouteDefinition, RouteMatch},
};
use orange_core::RouterError;
use regex::Regex;
use std::{fmt, fmt::Display};

struct CompiledRoute {
    definition: RouteDefinition,
    regex: Regex,
    /// Named routes only. A pattern the group scan cannot split still routes;
    /// the failure is reported by `get_url`.
    template: Option<Result<UrlTemplate, String>>,
}

/// An ordered, immutable route table.
///
/// Routes are tried in declaration order and the first match wins. Each
/// pattern must match the whole normalized path.
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::new([
///     RouteDefinition::get(r"/product/([a-z]+)/(\d+)", "Product", "show").named("product"),
///     RouteDefinition::any("(.*)", "FourOhFour", "index"),
/// ])?;
///
/// let matched = router.route("/product/abc/123", "get")?;
/// assert_eq!(matched.args, ["abc", "123"]);
///
/// let url = router.get_url("product", &[&"abc", &123])?;
/// assert_eq!(url, "/product/abc/123");
/// ```
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    /// Compile a route table.
    pub fn new(routes: impl IntoIterator<Item = RouteDefinition>) -> Result<Self, RouterError> {
        let routes = routes
            .into_iter()
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(routes = routes.len(), "route table compiled");

        Ok(Self { routes })
    }

    /// Match a request.
    pub fn route(&self, uri: &str, method: &str) -> Result<RouteMatch, RouterError> {
        let method = method.to_uppercase();
        let path = normalize_path(uri);

        for route in &self.routes {
            let definition = &route.definition;
            if !definition.accepts(&method) {
                continue;
            }

            let Some(caps) = route.regex.captures(&path) else {
                continue;
            };

            let mut args: Vec<Option<&str>> =
                caps.iter().skip(1).map(|m| m.map(|m| m.as_str())).collect();
            // Trailing groups that did not participate are dropped; inner
            // ones become empty strings.
            while matches!(args.last(), Some(None)) {
                args.pop();
            }

            let matched = RouteMatch {
                request_method: method.clone(),
                request_uri: uri.to_owned(),
                matched_uri: definition.url.clone(),
                matched_method: definition.method.to_uppercase(),
                controller: definition.controller().to_owned(),
                method: definition.action().to_owned(),
                url: caps.get(0).map_or_else(String::new, |m| m.as_str().to_owned()),
                args: args
                    .into_iter()
                    .map(|arg| arg.unwrap_or_default().to_owned())
                    .collect(),
            };

            tracing::debug!(
                method = %matched.request_method,
                uri = %path,
                route = %matched.matched_uri,
                controller = %matched.controller,
                action = %matched.method,
                "route matched"
            );

            return Ok(matched);
        }

        Err(RouterError::RouteNotFound {
            method,
            uri: uri.to_owned(),
        })
    }

    /// Build the URL of a named route.
    ///
    /// Names are compared case-insensitively. Each argument must fully match
    /// the capture group it replaces: `"abc1"` is rejected for `([a-z]+)` even
    /// though it contains a match. A route whose groups nest cannot be
    /// reverse-routed and fails with [`RouterError::InvalidValue`].
    pub fn get_url(&self, name: &str, args: &[&dyn Display]) -> Result<String, RouterError> {
        let name = name.to_lowercase();

        let template = self
            .routes
            .iter()
            .find(|route| {
                route
                    .definition
                    .name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase() == name)
            })
            .and_then(|route| route.template.as_ref())
            .ok_or_else(|| RouterError::RouterNameNotFound(name.clone()))?;

        template
            .as_ref()
            .map_err(|reason| RouterError::InvalidValue(reason.clone()))?
            .build(args)
    }

    /// The route definitions, in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter().map(|route| &route.definition)
    }

    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes()).finish()
    }
}

fn compile(definition: RouteDefinition) -> Result<CompiledRoute, RouterError> {
    let invalid = |e: regex::Error| RouterError::InvalidPattern {
        pattern: definition.url.clone(),
        source: Box::new(e),
    };

    let regex = Regex::new(&format!("^(?:{})$", definition.url)).map_err(invalid)?;
    let template = definition.name.as_deref().map(|name| {
        UrlTemplate::parse(&definition.url).map_err(|err| {
            tracing::warn!(route = %name, error = %err, "route cannot be reverse-routed");
            err.to_string()
        })
    });

    Ok(CompiledRoute {
        definition,
        regex,
        template,
    })
}

/// Strip the query string and fragment, trim slashes, add one leading slash.
fn normalize_path(uri: &str) -> String {
    let path = uri.split(['?', '#']).next().unwrap_or_default();
    format!("/{}", path.trim_matches('/'))
}
