//! Configuration binding scenario: a `#[config]` field coerced to a non-string
//! scalar, covering the default path, an explicit override, and a coercion
//! failure.

use loomwork::{Component, ContextBuilder};
use std::sync::Arc;

#[derive(Component, Debug)]
struct ServerSettings {
    #[config(name = "server.port", default = "5432")]
    port: i64,
}

#[test]
fn config_binding_uses_declared_default_without_override() {
    let context = ContextBuilder::new().build().unwrap();
    let settings: Arc<ServerSettings> = context.get_component().unwrap();
    assert_eq!(settings.port, 5432);
}

#[test]
fn config_binding_honors_a_runtime_property_override() {
    let context = ContextBuilder::new()
        .put_param("server.port", "5433")
        .build()
        .unwrap();
    let settings: Arc<ServerSettings> = context.get_component().unwrap();
    assert_eq!(settings.port, 5433);
}

#[test]
fn config_binding_rejects_a_value_that_does_not_coerce() {
    let result = ContextBuilder::new()
        .put_param("server.port", "oops")
        .build();

    let err = result.expect_err("a non-numeric port should fail coercion during build");
    let message = err.to_string();
    assert!(
        message.contains("server.port") || message.contains("oops"),
        "error should name the offending key or value: {message}"
    );
}
