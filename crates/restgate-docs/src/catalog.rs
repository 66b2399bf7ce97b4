//! The documentation catalog served in documentation mode.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use restgate_core::{
    DocumentationProvider, GateResult, RequestContext, ServiceEntry, ServiceRegistry,
};
use serde_json::Value;

use crate::error::{DocsError, DocsResult};
use crate::swagger::{ApiDeclaration, ResourceListing, ResourceSummary, SWAGGER_VERSION};

/// Builds Swagger 1.2 documents from the service registry.
///
/// Services can register a hand-written [`ApiDeclaration`]; every other known
/// service gets a generated one.
///
/// ```rust,ignore
/// let catalog = SwaggerCatalog::new(registry)
///     .api_version("1.0")
///     .base_path("/rest")
///     .declaration("db", db_declaration)?;
/// ```
pub struct SwaggerCatalog {
    registry: Arc<dyn ServiceRegistry>,
    declarations: IndexMap<String, ApiDeclaration>,
    api_version: String,
    base_path: String,
}

impl SwaggerCatalog {
    /// Creates a catalog over `registry` with API version `1.0` and base path
    /// `/rest`.
    #[must_use]
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self {
            registry,
            declarations: IndexMap::new(),
            api_version: "1.0".to_string(),
            base_path: "/rest".to_string(),
        }
    }

    /// Sets the documented API version.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the base path of the REST API.
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Registers the declaration for `service`.
    ///
    /// The declaration's `resourcePath` must be `/{service}`.
    pub fn declaration(mut self, service: &str, declaration: ApiDeclaration) -> DocsResult<Self> {
        let expected = format!("/{service}");
        if declaration.resource_path != expected {
            return Err(DocsError::InvalidDeclaration {
                service: service.to_string(),
                reason: format!("resourcePath must be '{expected}'"),
            });
        }
        self.declarations.insert(service.to_string(), declaration);
        Ok(self)
    }

    /// Returns the number of registered declarations.
    #[must_use]
    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    async fn entries(&self) -> GateResult<Vec<ServiceEntry>> {
        let rows = self.registry.list_services().await?;
        Ok(ServiceEntry::builtin().into_iter().chain(rows).collect())
    }

    /// Builds the resource listing.
    pub async fn resource_listing(&self) -> GateResult<ResourceListing> {
        let apis = self
            .entries()
            .await?
            .iter()
            .map(ResourceSummary::from)
            .collect();

        Ok(ResourceListing {
            api_version: self.api_version.clone(),
            swagger_version: SWAGGER_VERSION.to_string(),
            base_path: self.base_path.clone(),
            apis,
        })
    }

    /// Returns the declaration for one service.
    pub async fn api_declaration(&self, service: &str) -> GateResult<ApiDeclaration> {
        if let Some(declaration) = self.declarations.get(service) {
            return Ok(declaration.clone());
        }

        let entry = self
            .entries()
            .await?
            .into_iter()
            .find(|entry| entry.api_name == service)
            .ok_or_else(|| DocsError::UnknownService {
                service: service.to_string(),
            })?;

        Ok(ApiDeclaration::generated(
            &entry,
            &self.api_version,
            &self.base_path,
        ))
    }
}

impl std::fmt::Debug for SwaggerCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwaggerCatalog")
            .field("declarations", &self.declarations.keys().collect::<Vec<_>>())
            .field("api_version", &self.api_version)
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentationProvider for SwaggerCatalog {
    async fn get_swagger(&self, _ctx: &RequestContext) -> GateResult<Value> {
        let listing = self.resource_listing().await?;
        Ok(serde_json::to_value(listing).map_err(DocsError::from)?)
    }

    async fn get_swagger_for_service(
        &self,
        _ctx: &RequestContext,
        service: &str,
    ) -> GateResult<Value> {
        let declaration = self.api_declaration(service).await?;
        Ok(serde_json::to_value(declaration).map_err(DocsError::from)?)
    }
}
