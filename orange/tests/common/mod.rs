#![allow(dead_code)]

use orange::{
    Application, ApplicationBuilder, Container, Controller, ControllerContext, DispatchError,
    Exchange, JSON_CONTENT_TYPE, Output, ROUTER_SERVICE, Renderer, RouteDefinition, Router,
    ViewData,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Controllers
// ============================================================================

pub const MAIN_ACTIONS: &[&str] = &["index", "bikes", "product", "json", "url", "fail", "visits", "page"];

pub struct Main<'a> {
    output: &'a mut Output,
    container: &'a Container,
}

impl<'a> Main<'a> {
    pub fn new(ctx: ControllerContext<'a>) -> Self {
        Self {
            output: ctx.output,
            container: ctx.container,
        }
    }
}

impl Controller for Main<'_> {
    fn invoke(&mut self, action: &str, args: Vec<String>) -> Result<Option<String>, DispatchError> {
        let mut args = args.into_iter();

        match action {
            "index" => Ok(Some("<h1>Home</h1>".to_string())),
            "bikes" => Ok(args.next()),
            "product" => {
                let slug: String = orange::parse_arg(args.next(), action, 0)?;
                let id: u32 = orange::parse_arg(args.next(), action, 1)?;
                Ok(Some(format!("{slug} #{id}")))
            }
            "json" => {
                self.output
                    .content_type(JSON_CONTENT_TYPE)
                    .set("name", "Johnny")
                    .set("age", 23);
                Ok(None)
            }
            "url" => {
                let router: Arc<Router> = self
                    .container
                    .get(ROUTER_SERVICE)
                    .map_err(|e| DispatchError::Controller(e.into()))?;
                let url = router
                    .get_url("product", &[&"abc", &123])
                    .map_err(|e| DispatchError::Controller(e.into()))?;
                Ok(Some(url))
            }
            "fail" => Err(DispatchError::Controller("controller exploded".into())),
            "visits" => {
                let visits: Arc<AtomicUsize> = self
                    .container
                    .get("visits")
                    .map_err(|e| DispatchError::Controller(e.into()))?;
                let count = visits.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(Some(count.to_string()))
            }
            "page" => {
                let view: String = orange::parse_arg(args.next(), action, 0)?;
                let renderer: Arc<Box<dyn Renderer>> = self
                    .container
                    .get("view")
                    .map_err(|e| DispatchError::Controller(e.into()))?;
                let data = ViewData::from([("title".to_string(), "Bikes".to_string())]);
                renderer
                    .render(&view, &data)
                    .map(Some)
                    .map_err(|e| DispatchError::Controller(e.into()))
            }
            _ => Err(DispatchError::ControllerMethodNotFound(action.to_owned())),
        }
    }
}

pub struct FourOhFour<'a> {
    output: &'a mut Output,
}

impl<'a> FourOhFour<'a> {
    pub fn new(output: &'a mut Output) -> Self {
        Self { output }
    }
}

impl Controller for FourOhFour<'_> {
    fn invoke(&mut self, _action: &str, _args: Vec<String>) -> Result<Option<String>, DispatchError> {
        self.output.response_code(404);
        Ok(Some("Page not found".to_string()))
    }
}

// ============================================================================
// Test Middleware
// ============================================================================

/// Marks the first argument before the controller sees it.
pub fn inject_marker(exchange: &mut Exchange) {
    if let Some(first) = exchange.route.as_mut().and_then(|r| r.args.first_mut()) {
        first.insert_str(0, "{{**}}");
    }
}

/// Replaces the marker in the controller's body.
pub fn replace_marker(exchange: &mut Exchange) {
    if let Some(body) = exchange.body.as_mut() {
        *body = body.replace("{{**}}", "It's just bikes: ");
    }
}

// ============================================================================
// Application Fixtures
// ============================================================================

pub fn routes() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition::get("/", "Main", "index").named("home"),
        RouteDefinition::get("/bikes/(.+)", "Main", "bikes"),
        RouteDefinition::get(r"/product/([a-z]+)/(\d+)", "Main", "product").named("product"),
        RouteDefinition::get("/json", "Main", "json"),
        RouteDefinition::get("/url", "Main", "url"),
        RouteDefinition::get("/fail", "Main", "fail"),
        RouteDefinition::get("/visits", "Main", "visits"),
        RouteDefinition::get("/page/([a-z]+)", "Main", "page"),
    ]
}

pub fn catch_all() -> RouteDefinition {
    RouteDefinition::any("(.*)", "FourOhFour", "index")
}

/// Routes and controllers, without the catch-all route.
pub fn bare_builder() -> ApplicationBuilder {
    Application::builder()
        .routes(routes())
        .controller("Main", MAIN_ACTIONS, |ctx| Box::new(Main::new(ctx)))
        .controller("FourOhFour", &["index"], |ctx| {
            Box::new(FourOhFour::new(ctx.output))
        })
}

/// Routes, controllers and the catch-all route.
pub fn builder() -> ApplicationBuilder {
    bare_builder().route(catch_all())
}

pub fn app() -> Application {
    builder().build().unwrap()
}
