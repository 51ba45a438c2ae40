//! Booting an application from a configuration folder.

use orange::{
    ApplicationBuilder, CONFIG_SERVICE, Config, ConfigError, Input, OrangeError,
};
use std::{fs, sync::Arc};

mod common;
use common::{FourOhFour, MAIN_ACTIONS, Main};

const ROUTES: &str = r#"[
    {"method": "get", "url": "/", "callback": ["Main", "index"], "name": "home"},
    {"method": "GET", "url": "/json", "callback": ["Main", "json"]},
    {"method": "*", "url": "(.*)", "callback": ["FourOhFour", "index"]}
]"#;

fn config_folder(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

fn boot(config: Config) -> Result<orange::Application, OrangeError> {
    ApplicationBuilder::from_config(config)?
        .controller("Main", MAIN_ACTIONS, |ctx| Box::new(Main::new(ctx)))
        .controller("FourOhFour", &["index"], |ctx| {
            Box::new(FourOhFour::new(ctx.output))
        })
        .build()
}

#[test]
fn test_boot_from_folder() {
    let dir = config_folder(&[
        ("routes.json", ROUTES),
        ("output.json", r#"{"contentType": "text/plain", "charSet": "iso-8859-1"}"#),
        ("site.json", r#"{"name": "Orange"}"#),
    ]);

    let app = boot(Config::load(dir.path()).unwrap()).unwrap();

    let response = app.handle_request("/", "GET", Input::default()).unwrap();
    assert_eq!(response.body, "<h1>Home</h1>");
    assert_eq!(
        response.headers,
        vec!["Content-Type: text/plain; charset=iso-8859-1"]
    );

    let response = app.handle_request("/missing", "GET", Input::default()).unwrap();
    assert_eq!(response.status, 404);

    let config: Arc<Config> = app.container().get(CONFIG_SERVICE).unwrap();
    assert_eq!(config.get("site").unwrap()["name"], "Orange");
}

#[test]
fn test_output_section_is_optional() {
    let dir = config_folder(&[("routes.json", ROUTES)]);
    let app = boot(Config::load(dir.path()).unwrap()).unwrap();

    let response = app.handle_request("/", "GET", Input::default()).unwrap();
    assert_eq!(response.headers, vec!["Content-Type: text/html; charset=utf-8"]);
}

#[test]
fn test_routes_section_is_required() {
    let dir = config_folder(&[("site.json", "{}")]);
    let err = boot(Config::load(dir.path()).unwrap()).unwrap_err();

    assert!(matches!(
        err,
        OrangeError::Config(ConfigError::ConfigNotFound(ref name)) if name == "routes"
    ));
}

#[test]
fn test_malformed_routes() {
    let dir = config_folder(&[("routes.json", r#"[{"url": "/"}]"#)]);
    let err = boot(Config::load(dir.path()).unwrap()).unwrap_err();

    assert!(matches!(err, OrangeError::Config(ConfigError::Invalid { .. })));
}

#[test]
fn test_missing_folder() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("config")).unwrap_err();

    assert!(matches!(err, ConfigError::ConfigFolderNotFound(_)));
}
