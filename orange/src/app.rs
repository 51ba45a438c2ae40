//! The front controller.
//!
//! An [`Application`] owns the route table, the controllers, the event
//! listeners and a [`Container`]. Each request gets its own scope of that
//! container unless the application was built with
//! [`ApplicationBuilder::shared_container`]. Each request runs through the
//! same stages:
//!
//! 1. `before.router` listeners, which may rewrite the request URI or method
//! 2. routing
//! 3. `before.controller` listeners, which may rewrite the route
//! 4. controller dispatch
//! 5. `after.controller` listeners, which may rewrite the body
//! 6. the body is appended to the output and the response is produced
//! 7. `after.output` listeners, which see a copy of the response
//!
//! Every listener receives the request's [`Exchange`]. The first error ends
//! the request and is returned.

use orange_core::{Listener, OrangeError, Priority, RouterError};
use orange_std::{
    Config, Container, ControllerContext, ControllerRegistry, Dispatcher, Events, Input, Output,
    OutputSettings, Response, RouteDefinition, RouteMatch, Router,
};
use serde_json::Value;
use std::{fmt, sync::Arc};

/// Triggered before routing.
pub const BEFORE_ROUTER: &str = "before.router";
/// Triggered after routing, before the controller runs.
pub const BEFORE_CONTROLLER: &str = "before.controller";
/// Triggered after the controller ran.
pub const AFTER_CONTROLLER: &str = "after.controller";
/// Triggered once the response is produced.
pub const AFTER_OUTPUT: &str = "after.output";

/// Container name of the application's [`Router`].
pub const ROUTER_SERVICE: &str = "router";
/// Container name of the [`Config`] given to [`ApplicationBuilder::from_config`].
pub const CONFIG_SERVICE: &str = "config";

/// The state of one request, handed to every listener.
pub struct Exchange {
    /// Request URI used for routing.
    pub uri: String,
    /// Uppercased request method used for routing.
    pub method: String,
    /// The request input.
    pub input: Input,
    /// The matched route, once routing ran.
    pub route: Option<RouteMatch>,
    /// What the controller returned.
    pub body: Option<String>,
    /// The response buffer.
    pub output: Output,
    /// A copy of the response, once produced. Changing it does not change
    /// what the request returns.
    pub response: Option<Response>,
    /// The request's service container.
    pub container: Arc<Container>,
}

impl Exchange {
    /// A field of the matched route, by wire name (`controller`, `args`, ...).
    ///
    /// Without a key the whole route is returned as an object. Returns
    /// `None` before routing or for unknown keys.
    pub fn responds(&self, key: Option<&str>) -> Option<Value> {
        let route = self.route.as_ref()?;
        match key {
            Some(key) => route.field(key),
            None => Some(route.to_value()),
        }
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exchange")
            .field("uri", &self.uri)
            .field("method", &self.method)
            .field("route", &self.route)
            .field("body", &self.body)
            .field("status", &self.output.get_response_code())
            .finish_non_exhaustive()
    }
}

/// The request pipeline.
///
/// Build one with [`Application::builder`] and share it; handling a request
/// only needs `&self`.
pub struct Application {
    router: Arc<Router>,
    dispatcher: Dispatcher,
    events: Events<Exchange>,
    container: Arc<Container>,
    scope: Scope,
    output: OutputSettings,
}

/// How requests see the application's container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Every request resolves from its own [`Container::scope`].
    Request,
    /// Every request resolves from the same container.
    Application,
}

impl Application {
    /// Start building an application.
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Handle a request whose URI and method come from the input's server
    /// variables (`request_uri`, `request_method`).
    pub fn handle(&self, input: impl Into<Input>) -> Result<Response, OrangeError> {
        let input = input.into();
        let uri = input.request_uri().to_owned();
        let method = input.request_method();
        self.handle_request(&uri, &method, input)
    }

    /// Handle a request.
    pub fn handle_request(
        &self,
        uri: &str,
        method: &str,
        input: impl Into<Input>,
    ) -> Result<Response, OrangeError> {
        let span = tracing::info_span!("request", method = %method, uri = %uri);
        let _enter = span.enter();

        let container = match self.scope {
            Scope::Request => Arc::new(self.container.scope()),
            Scope::Application => Arc::clone(&self.container),
        };

        let mut exchange = Exchange {
            uri: uri.to_owned(),
            method: method.to_uppercase(),
            input: input.into(),
            route: None,
            body: None,
            output: Output::with_settings(&self.output),
            response: None,
            container,
        };

        self.run(&mut exchange).inspect_err(|err| {
            tracing::warn!(error = %err, "request aborted");
        })
    }

    fn run(&self, exchange: &mut Exchange) -> Result<Response, OrangeError> {
        self.events.trigger(BEFORE_ROUTER, exchange)?;

        exchange.route = Some(self.router.route(&exchange.uri, &exchange.method)?);

        self.events.trigger(BEFORE_CONTROLLER, exchange)?;

        // A listener may have cleared the route.
        let route = exchange
            .route
            .as_ref()
            .ok_or_else(|| RouterError::RouteNotFound {
                method: exchange.method.clone(),
                uri: exchange.uri.clone(),
            })?;
        let body = self.dispatcher.call(
            route,
            ControllerContext {
                input: &exchange.input,
                output: &mut exchange.output,
                container: &exchange.container,
            },
        )?;
        exchange.body = body;

        self.events.trigger(AFTER_CONTROLLER, exchange)?;

        let response = exchange
            .output
            .append_output(exchange.body.as_deref())
            .send(false);
        exchange.response = Some(response.clone());

        self.events.trigger(AFTER_OUTPUT, exchange)?;

        Ok(response)
    }

    /// Build the URL of a named route.
    pub fn get_url(
        &self,
        name: &str,
        args: &[&dyn fmt::Display],
    ) -> Result<String, OrangeError> {
        Ok(self.router.get_url(name, args)?)
    }

    /// The route table.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// The event listeners.
    pub fn events(&self) -> &Events<Exchange> {
        &self.events
    }

    /// The application's service container.
    ///
    /// Unless it is shared, requests resolve from scopes of it and its own
    /// singletons stay unbuilt by request handling.
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// The controllers.
    pub fn controllers(&self) -> &ControllerRegistry {
        self.dispatcher.registry()
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("router", &self.router)
            .field("controllers", self.dispatcher.registry())
            .field("events", &self.events)
            .field("container", &self.container)
            .field("scope", &self.scope)
            .field("output", &self.output)
            .finish()
    }
}

// ============================================================================
// ApplicationBuilder
// ============================================================================

/// Builder for an [`Application`].
///
/// # Example
/// ```ignore
/// let app = Application::builder()
///     .route(RouteDefinition::get("/", "Main", "index"))
///     .route(RouteDefinition::any("(.*)", "FourOhFour", "index"))
///     .controller("Main", Main::ACTIONS, |ctx| Box::new(Main::new(ctx)))
///     .controller("FourOhFour", FourOhFour::ACTIONS, |ctx| Box::new(FourOhFour::new(ctx)))
///     .listen("before.controller", |x: &mut Exchange| { /* ... */ }, Priority::NORMAL)
///     .build()?;
/// ```
#[derive(Default)]
pub struct ApplicationBuilder {
    routes: Vec<RouteDefinition>,
    controllers: ControllerRegistry,
    events: Events<Exchange>,
    container: Option<Arc<Container>>,
    shared: bool,
    output: OutputSettings,
}

impl ApplicationBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a configuration.
    ///
    /// Reads the `routes` section (required) and the `output` section (if
    /// present), and registers the configuration as the `config` service.
    pub fn from_config(config: Config) -> Result<Self, OrangeError> {
        let routes: Vec<RouteDefinition> = config.section("routes")?;
        let output = if config.has("output") {
            config.section("output")?
        } else {
            OutputSettings::default()
        };

        let container = Container::new();
        container.reference(CONFIG_SERVICE, config);

        Ok(Self::new()
            .routes(routes)
            .output(output)
            .container(container))
    }

    /// Add a route. Routes are tried in the order they are added.
    pub fn route(mut self, route: RouteDefinition) -> Self {
        self.routes.push(route);
        self
    }

    /// Add several routes.
    pub fn routes(mut self, routes: impl IntoIterator<Item = RouteDefinition>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Register a controller.
    pub fn controller<F>(mut self, name: &str, actions: &'static [&'static str], factory: F) -> Self
    where
        F: for<'a> Fn(ControllerContext<'a>) -> Box<dyn orange_core::Controller + 'a>
            + Send
            + Sync
            + 'static,
    {
        self.controllers.register(name, actions, factory);
        self
    }

    /// Register a listener.
    pub fn listen<L>(mut self, event: &str, listener: L, priority: impl Into<Priority>) -> Self
    where
        L: Listener<Exchange>,
    {
        self.events.register(event, listener, priority);
        self
    }

    /// Register a listener (mutable version).
    pub fn listen_mut<L>(&mut self, event: &str, listener: L, priority: impl Into<Priority>)
    where
        L: Listener<Exchange>,
    {
        self.events.register(event, listener, priority);
    }

    /// Use `container`'s registrations for every request.
    ///
    /// Each request resolves from a fresh [`Container::scope`], so singletons
    /// are built at most once per request.
    pub fn container(mut self, container: Container) -> Self {
        self.container = Some(Arc::new(container));
        self.shared = false;
        self
    }

    /// Resolve every request from `container` itself.
    ///
    /// Singletons then live as long as the container, across requests.
    pub fn shared_container(mut self, container: Arc<Container>) -> Self {
        self.container = Some(container);
        self.shared = true;
        self
    }

    /// Set the initial content type and charset of every response.
    pub fn output(mut self, settings: OutputSettings) -> Self {
        self.output = settings;
        self
    }

    /// Build the application.
    ///
    /// Compiles the route table and registers it as the `router` service.
    pub fn build(self) -> Result<Application, OrangeError> {
        let router = Arc::new(Router::new(self.routes)?);
        let container = self.container.unwrap_or_default();
        container.reference_arc(ROUTER_SERVICE, Arc::clone(&router));

        tracing::debug!(
            routes = router.len(),
            controllers = self.controllers.len(),
            events = self.events.events().len(),
            "application built"
        );

        Ok(Application {
            router,
            dispatcher: Dispatcher::new(self.controllers),
            events: self.events,
            container,
            scope: if self.shared {
                Scope::Application
            } else {
                Scope::Request
            },
            output: self.output,
        })
    }
}
