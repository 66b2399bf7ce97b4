//! API documentation collaborator.

use async_trait::async_trait;
use serde_json::Value;

use crate::{GateResult, RequestContext};

/// Produces machine-readable API descriptions for documentation mode.
#[async_trait]
pub trait DocumentationProvider: Send + Sync + 'static {
    /// Returns the catalog describing every available service.
    async fn get_swagger(&self, ctx: &RequestContext) -> GateResult<Value>;

    /// Returns the description of a single service.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::NotFound`](crate::GateError::NotFound) when the
    /// service is unknown.
    async fn get_swagger_for_service(
        &self,
        ctx: &RequestContext,
        service: &str,
    ) -> GateResult<Value>;
}
