//! Loading configuration files from disk.

use std::io::Write;

use restgate_config::{ConfigError, ConfigLoader, LogFormat};
use restgate_core::ResponseFormat;
use tempfile::Builder;

fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_complete_toml_file() {
    let file = write_file(
        ".toml",
        r#"
        [server]
        http_addr = "127.0.0.1:3000"
        shutdown_timeout_secs = 5
        request_timeout_ms = 1500
        max_body_bytes = 4096
        rest_prefix = "/api/rest"

        [dispatch]
        default_format = "xml"
        tunneling_enabled = false

        [telemetry]
        service_name = "gate-test"

        [telemetry.metrics]
        enabled = true
        addr = "127.0.0.1:9191"

        [telemetry.logging]
        level = "warn"
        format = "pretty"
        "#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    assert_eq!(config.server.request_timeout_ms, 1500);
    assert_eq!(config.server.rest_prefix, "/api/rest");
    assert_eq!(config.dispatch.default_format, ResponseFormat::Xml);
    assert!(!config.dispatch.tunneling_enabled);
    assert_eq!(config.telemetry.service_name, "gate-test");
    assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    assert!(config.telemetry.metrics.enabled);
}

#[test]
fn test_json_file() {
    let file = write_file(".json", r#"{"server": {"max_body_bytes": 10}}"#);
    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    assert_eq!(config.server.max_body_bytes, 10);
}

#[test]
fn test_unknown_field_in_file_fails() {
    let file = write_file(".toml", "[server]\nhttp2_enabled = true\n");
    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}

#[test]
fn test_unsupported_extension() {
    let file = write_file(".yaml", "server: {}\n");
    let result = ConfigLoader::new().with_file(file.path());
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}
