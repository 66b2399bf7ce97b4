//! The root configuration type.

use std::net::SocketAddr;

use restgate_core::ResponseFormat;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, DispatchSection, LogFormat, ServerSection, TelemetrySection};

/// Complete restgate configuration.
///
/// ```
/// use restgate_config::GateConfig;
///
/// let config = GateConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(config.dispatch.tunneling_enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct GateConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Dispatcher settings.
    #[serde(default)]
    pub dispatch: DispatchSection,

    /// Logging and metrics settings.
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl GateConfig {
    /// Checks values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        let prefix = &self.server.rest_prefix;
        if !prefix.starts_with('/') || (prefix.len() > 1 && prefix.ends_with('/')) {
            return Err(ConfigError::invalid_value(
                "server.rest_prefix",
                format!("must start with '/' and have no trailing slash: {prefix}"),
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "server.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if let ResponseFormat::Other(name) = &self.dispatch.default_format {
            return Err(ConfigError::invalid_value(
                "dispatch.default_format",
                format!("expected 'json' or 'xml', got '{name}'"),
            ));
        }

        if self.telemetry.metrics.enabled
            && self.telemetry.metrics.addr.parse::<SocketAddr>().is_err()
        {
            return Err(ConfigError::invalid_value(
                "telemetry.metrics.addr",
                format!("invalid socket address: {}", self.telemetry.metrics.addr),
            ));
        }

        Ok(())
    }

    /// Development preset: pretty debug logs on localhost.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:8080".to_string();
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;
        config
    }

    /// Production preset: JSON logs and metrics enabled.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.telemetry.metrics.enabled = true;
        config
    }
}
