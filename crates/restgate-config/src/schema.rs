//! Configuration schema types.
//!
//! Every section rejects unknown fields and fills missing ones with
//! defaults.

use restgate_core::ResponseFormat;
use serde::{Deserialize, Serialize};

/// HTTP server section.
///
/// ```
/// use restgate_config::ServerSection;
///
/// let server = ServerSection::default();
/// assert_eq!(server.rest_prefix, "/rest");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,

    /// Request timeout in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// URL prefix the REST API is mounted under.
    #[serde(default = "default_rest_prefix")]
    pub rest_prefix: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            request_timeout_ms: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
            rest_prefix: default_rest_prefix(),
        }
    }
}

fn default_http_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_rest_prefix() -> String {
    "/rest".to_string()
}

/// Dispatcher section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DispatchSection {
    /// Response format used when a request names none.
    #[serde(default)]
    pub default_format: ResponseFormat,

    /// Whether POST may carry another verb in `X-HTTP-Method` or `method`.
    #[serde(default = "default_true")]
    pub tunneling_enabled: bool,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            default_format: ResponseFormat::Json,
            tunneling_enabled: true,
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Install the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Scrape listener address.
    #[serde(default = "default_metrics_addr")]
    pub addr: String,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: false,
            addr: default_metrics_addr(),
        }
    }
}

fn default_metrics_addr() -> String {
    "0.0.0.0:9090".to_string()
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines (production).
    #[default]
    Json,
    /// Human-readable (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (e.g. "info", "restgate_dispatch=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telemetry section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    /// Service name reported in logs.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            metrics: MetricsSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl TelemetrySection {
    /// Converts the section into the telemetry crate's configuration.
    #[must_use]
    pub fn to_telemetry_config(&self) -> restgate_telemetry::TelemetryConfig {
        let logging = restgate_telemetry::LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            json_format: self.logging.format == LogFormat::Json,
            file_line_info: self.logging.include_location,
            ..restgate_telemetry::LogConfig::default()
        };
        let metrics = restgate_telemetry::MetricsConfig {
            enabled: self.metrics.enabled,
            addr: self.metrics.addr.clone(),
            ..restgate_telemetry::MetricsConfig::default()
        };

        restgate_telemetry::TelemetryConfig::builder()
            .service_name(&self.service_name)
            .logging(logging)
            .metrics(metrics)
            .build()
    }
}

fn default_service_name() -> String {
    "restgate".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_section_default() {
        let server = ServerSection::default();
        assert_eq!(server.http_addr, "0.0.0.0:8080");
        assert_eq!(server.request_timeout_ms, 30_000);
        assert_eq!(server.max_body_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn test_server_section_unknown_field_rejected() {
        let result: Result<ServerSection, _> = toml::from_str(r#"listen = "x""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_dispatch_section_deserialize() {
        let section: DispatchSection =
            toml::from_str("default_format = \"XML\"\ntunneling_enabled = false").unwrap();
        assert_eq!(section.default_format, ResponseFormat::Xml);
        assert!(!section.tunneling_enabled);
    }

    #[test]
    fn test_log_format_deserialize() {
        let section: LoggingSection = toml::from_str(r#"format = "pretty""#).unwrap();
        assert_eq!(section.format, LogFormat::Pretty);
        assert!(section.enabled);
    }

    #[test]
    fn test_to_telemetry_config() {
        let section = TelemetrySection {
            service_name: "gate".to_string(),
            metrics: MetricsSection {
                enabled: true,
                addr: "127.0.0.1:9100".to_string(),
            },
            logging: LoggingSection {
                format: LogFormat::Pretty,
                level: "debug".to_string(),
                ..LoggingSection::default()
            },
        };

        let config = section.to_telemetry_config();
        assert_eq!(config.service_name, "gate");
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.addr, "127.0.0.1:9100");
        assert!(!config.logging.json_format);
        assert_eq!(config.logging.level, "debug");
    }
}
