//! Routing through the application: first-match-wins, reverse routing and
//! the router service.

use orange::{
    Application, Input, OrangeError, ROUTER_SERVICE, RouteDefinition, Router, RouterError,
};
use std::sync::Arc;

mod common;
use common::app;

#[test]
fn test_first_declared_route_wins() {
    let app = Application::builder()
        .route(RouteDefinition::get("/page/([a-z]+)", "First", "index"))
        .route(RouteDefinition::get("/page/(.*)", "Second", "index"))
        .controller("First", &["index"], |_| Box::new(Label("first")))
        .controller("Second", &["index"], |_| Box::new(Label("second")))
        .build()
        .unwrap();

    let response = app.handle_request("/page/abc", "GET", Input::default()).unwrap();
    assert_eq!(response.body, "first");

    let response = app.handle_request("/page/123", "GET", Input::default()).unwrap();
    assert_eq!(response.body, "second");
}

#[test]
fn test_get_url() {
    let app = app();

    assert_eq!(app.get_url("product", &[&"abc", &123]).unwrap(), "/product/abc/123");
    assert_eq!(app.get_url("HOME", &[]).unwrap(), "/");
}

#[test]
fn test_get_url_errors() {
    let app = app();

    let err = app.get_url("product", &[&"ABC123", &1]).unwrap_err();
    assert!(matches!(err, OrangeError::Router(RouterError::InvalidValue(_))));

    let err = app.get_url("product", &[&"abc"]).unwrap_err();
    assert!(matches!(err, OrangeError::Router(RouterError::InvalidValue(_))));

    let err = app.get_url("nowhere", &[]).unwrap_err();
    assert!(matches!(err, OrangeError::Router(RouterError::RouterNameNotFound(_))));
}

#[test]
fn test_router_is_a_service() {
    let app = app();
    let router: Arc<Router> = app.container().get(ROUTER_SERVICE).unwrap();

    assert_eq!(router.len(), app.router().len());
    assert!(router.routes().any(|r| r.name.as_deref() == Some("product")));
}

#[test]
fn test_invalid_pattern_fails_build() {
    let err = Application::builder()
        .route(RouteDefinition::get("/broken/(", "Main", "index"))
        .build()
        .unwrap_err();

    assert!(matches!(err, OrangeError::Router(RouterError::InvalidPattern { .. })));
}

struct Label(&'static str);

impl orange::Controller for Label {
    fn invoke(
        &mut self,
        _action: &str,
        _args: Vec<String>,
    ) -> Result<Option<String>, orange::DispatchError> {
        Ok(Some(self.0.to_string()))
    }
}
