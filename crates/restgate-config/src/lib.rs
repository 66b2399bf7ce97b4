//! Typed configuration for restgate.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides (`RESTGATE__SECTION__KEY`)
//! - Strict parsing that fails on unknown fields
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:8080"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_bytes = 2097152
//! rest_prefix = "/rest"
//!
//! [dispatch]
//! default_format = "json"
//! tunneling_enabled = true
//!
//! [telemetry]
//! service_name = "restgate"
//!
//! [telemetry.metrics]
//! enabled = true
//! addr = "0.0.0.0:9090"
//!
//! [telemetry.logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `RESTGATE__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `RESTGATE__DISPATCH__DEFAULT_FORMAT=xml`
//! - `RESTGATE__TELEMETRY__LOGGING__LEVEL=debug`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::GateConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{
    DispatchSection, LogFormat, LoggingSection, MetricsSection, ServerSection, TelemetrySection,
};
