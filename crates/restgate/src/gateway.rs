//! Assembles a runnable gateway from configuration and services.

use std::sync::Arc;
use std::time::Duration;

use restgate_config::GateConfig;
use restgate_core::{InMemoryRegistry, ServiceCatalog, ServiceEntry, ServiceObject};
use restgate_dispatch::{DispatchOptions, Dispatcher};
use restgate_docs::SwaggerCatalog;
use restgate_server::{HealthCheck, Server, ServerConfig};

use crate::builtin::BuiltinService;
use crate::store::MemoryStore;

/// Services plus configuration, ready to become a [`Server`].
///
/// Every service added here is both resolvable by name and listed in the
/// registry, so it shows up in the index and the documentation catalog.
///
/// ```
/// use restgate::Gateway;
/// use restgate_config::GateConfig;
///
/// let gateway = Gateway::demo(GateConfig::default());
/// assert_eq!(gateway.service_names(), ["db", "system", "user"]);
/// ```
#[derive(Debug)]
pub struct Gateway {
    config: GateConfig,
    catalog: ServiceCatalog,
    registry: Arc<InMemoryRegistry>,
}

impl Gateway {
    /// Creates a gateway with no services.
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            catalog: ServiceCatalog::new(),
            registry: Arc::new(InMemoryRegistry::new()),
        }
    }

    /// Creates a gateway serving a [`MemoryStore`] as `db`, with
    /// placeholders behind the built-in `user` and `system` entries.
    #[must_use]
    pub fn demo(config: GateConfig) -> Self {
        Self::new(config)
            .with_builtins()
            .service(
                ServiceEntry::new("db", "In-Memory Database"),
                Arc::new(MemoryStore::new()),
            )
    }

    /// Serves a [`BuiltinService`] for each built-in entry not already
    /// backed by a service.
    ///
    /// The index lists built-in entries on its own, so they stay out of the
    /// registry.
    #[must_use]
    pub fn with_builtins(mut self) -> Self {
        for service in BuiltinService::all() {
            let api_name = service.entry().api_name.clone();
            if !self.catalog.contains(&api_name) {
                self.catalog.register(api_name, Arc::new(service));
            }
        }
        self
    }

    /// Adds a service under `entry.api_name`.
    #[must_use]
    pub fn service(mut self, entry: ServiceEntry, service: Arc<dyn ServiceObject>) -> Self {
        self.catalog.register(entry.api_name.clone(), service);
        self.registry.insert(entry);
        self
    }

    /// Returns the registered service names, sorted.
    #[must_use]
    pub fn service_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.catalog.names().collect();
        names.sort_unstable();
        names
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Builds the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        let docs = SwaggerCatalog::new(self.registry.clone())
            .base_path(self.config.server.rest_prefix.clone());

        Dispatcher::new(
            Arc::new(self.catalog.clone()),
            self.registry.clone(),
            Arc::new(docs),
        )
        .with_options(DispatchOptions {
            default_format: self.config.dispatch.default_format.clone(),
            tunneling_enabled: self.config.dispatch.tunneling_enabled,
        })
    }

    /// Translates the `[server]` section.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        let server = &self.config.server;
        ServerConfig::builder()
            .http_addr(server.http_addr.clone())
            .shutdown_timeout(Duration::from_secs(server.shutdown_timeout_secs))
            .request_timeout(Duration::from_millis(server.request_timeout_ms))
            .max_body_bytes(server.max_body_bytes)
            .rest_prefix(server.rest_prefix.clone())
            .build()
    }

    /// Builds the HTTP server.
    #[must_use]
    pub fn into_server(self) -> Server {
        let health = HealthCheck::new(
            self.config.telemetry.service_name.clone(),
            crate::VERSION,
        );
        Server::new(self.server_config(), Arc::new(self.dispatcher())).with_health(health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restgate_core::ResponseFormat;

    #[test]
    fn test_server_config_from_sections() {
        let mut config = GateConfig::default();
        config.server.request_timeout_ms = 1500;
        config.server.rest_prefix = "/api".to_string();

        let server = Gateway::new(config).server_config();
        assert_eq!(server.request_timeout(), Duration::from_millis(1500));
        assert_eq!(server.rest_prefix(), "/api");
    }

    #[test]
    fn test_dispatch_options_from_config() {
        let mut config = GateConfig::default();
        config.dispatch.default_format = ResponseFormat::Xml;
        config.dispatch.tunneling_enabled = false;

        let dispatcher = Gateway::new(config).dispatcher();
        assert_eq!(dispatcher.options().default_format, ResponseFormat::Xml);
        assert!(!dispatcher.options().tunneling_enabled);
    }

    #[test]
    fn test_service_is_registered_and_listed() {
        let gateway = Gateway::demo(GateConfig::default()).service(
            ServiceEntry::new("files", "Files"),
            Arc::new(MemoryStore::new()),
        );
        assert_eq!(gateway.service_names(), ["db", "files", "system", "user"]);
        assert_eq!(gateway.registry.len(), 2);
    }

    #[test]
    fn test_builtins_only_fill_gaps() {
        let gateway = Gateway::new(GateConfig::default())
            .service(ServiceEntry::new("user", "Accounts"), Arc::new(MemoryStore::new()))
            .with_builtins();
        assert_eq!(gateway.service_names(), ["system", "user"]);
        assert_eq!(gateway.registry.len(), 1);
    }
}
