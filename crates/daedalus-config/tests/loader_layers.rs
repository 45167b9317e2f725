//! Layered loading from files on disk.

use daedalus_config::{ConfigError, ConfigLoader};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

const BASE_YAML: &str = r"
routes:
  new-api/2.0:
    channels:
      GET:
        service: app.listChannels
      POST:
        service: app.createChannel
        middlewareGroups: [auth]
  chat/1.0:
    brand/{brandId}:
      GET:
        service: app.brand
middlewareGroups:
  auth: [app.goldenKeyAuth]
afterRouteMiddlewares: [app.audit]
settings:
  registerOnlyNecessaryRoutes: true
";

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn yaml_base_with_json_override() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "routes.yaml", BASE_YAML);
    let local = write(
        &dir,
        "routes.local.json",
        r#"{
            "routes": {
                "new-api/2.0": { "channels": { "POST": null } },
                "chat/1.0": null
            },
            "settings": { "apiPrefix": "/api" }
        }"#,
    );

    let definition = ConfigLoader::new()
        .with_file(&base)
        .unwrap()
        .with_file(&local)
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(
        definition.routes.get("new-api/2.0"),
        Some(&json!({"channels": {"GET": {"service": "app.listChannels"}}}))
    );
    assert!(!definition.routes.contains_key("chat/1.0"));
    assert!(definition.settings.register_only_necessary_routes);
    assert_eq!(definition.settings.api_prefix, "/api");
    assert_eq!(definition.after_route_middlewares, vec!["app.audit"]);
}

#[test]
fn toml_override_replaces_lists() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "routes.yml", BASE_YAML);
    let local = write(
        &dir,
        "routes.toml",
        r#"
afterRouteMiddlewares = ["app.cors", "app.audit"]

[middlewareGroups]
auth = ["app.tokenAuth"]
"#,
    );

    let definition = ConfigLoader::new()
        .with_file(&base)
        .unwrap()
        .with_file(&local)
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(definition.after_route_middlewares, vec!["app.cors", "app.audit"]);
    assert_eq!(definition.middleware_groups["auth"], vec!["app.tokenAuth"]);
    assert_eq!(
        definition.api_names().collect::<Vec<_>>(),
        vec!["new-api/2.0", "chat/1.0"]
    );
}

#[test]
fn optional_file_missing_is_skipped() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "routes.yaml", BASE_YAML);

    let definition = ConfigLoader::new()
        .with_file(&base)
        .unwrap()
        .with_optional_file(dir.path().join("routes.local.yaml"))
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(definition.routes.len(), 2);
}

#[test]
fn missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .with_file(dir.path().join("nope.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn unknown_extension_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "routes.ini", "routes=1");
    let err = ConfigLoader::new().with_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn malformed_yaml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "routes.yaml", "routes: [unclosed");
    let err = ConfigLoader::new().with_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::YamlError(_)));
}

#[test]
fn env_overrides_settings() {
    let dir = TempDir::new().unwrap();
    let base = write(&dir, "routes.yaml", BASE_YAML);

    std::env::set_var(
        "DAEDALUS_LAYERS_TEST__SETTINGS__ROUTE_API_NAMES_ALWAYS_INCLUDE",
        "healthcheck,status",
    );
    std::env::set_var("DAEDALUS_LAYERS_TEST__LOGGING__LEVEL", "debug");

    let definition = ConfigLoader::new()
        .with_file(&base)
        .unwrap()
        .with_env_prefix("DAEDALUS_LAYERS_TEST")
        .load()
        .unwrap();

    std::env::remove_var("DAEDALUS_LAYERS_TEST__SETTINGS__ROUTE_API_NAMES_ALWAYS_INCLUDE");
    std::env::remove_var("DAEDALUS_LAYERS_TEST__LOGGING__LEVEL");

    assert_eq!(
        definition.settings.route_api_names_always_include,
        vec!["healthcheck", "status"]
    );
    assert_eq!(definition.logging.level, "debug");
}

#[test]
fn invalid_prefix_fails_validation() {
    let err = ConfigLoader::new()
        .with_string("settings:\n  apiPrefix: api\n", "yaml")
        .unwrap()
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}
