//! Service collaborator traits.
//!
//! The dispatcher never knows what a service does. It asks a
//! [`ServiceHandler`] for a [`ServiceObject`] by name and hands it a
//! [`ServiceCall`] describing the resource and verb; the payload that comes
//! back is passed through to the response formatter unchanged.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use restgate_core::{GateResult, ServiceCall, ServiceCatalog, ServiceObject};
//! use serde_json::{json, Value};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl ServiceObject for Echo {
//!     async fn process_request(&self, call: ServiceCall<'_>) -> GateResult<Value> {
//!         Ok(json!({ "resource": call.resource, "verb": call.verb }))
//!     }
//! }
//!
//! let mut catalog = ServiceCatalog::new();
//! catalog.register("echo", Arc::new(Echo));
//! assert!(catalog.contains("echo"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;
use serde_json::Value;

use crate::{GateError, GateResult, RequestContext, Verb};

/// Merged request parameters (query string and form body), in arrival order.
pub type RequestParams = IndexMap<String, String>;

/// One call into a service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceCall<'a> {
    /// Request-scoped context, carrying the calling application's name.
    pub ctx: &'a RequestContext,
    /// Sub-path within the service; empty for the service root.
    pub resource: &'a str,
    /// The effective verb, after tunneling.
    pub verb: Verb,
    /// Request parameters.
    pub params: &'a RequestParams,
    /// Raw request body.
    pub body: &'a Bytes,
}

impl ServiceCall<'_> {
    /// Returns a request parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Parses the request body as JSON.
    ///
    /// An empty body parses as `null`.
    pub fn json_body(&self) -> GateResult<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(self.body)?)
    }
}

/// A named backend handler capable of processing a resource under a verb.
#[async_trait]
pub trait ServiceObject: Send + Sync + 'static {
    /// Performs the operation and returns the result payload.
    async fn process_request(&self, call: ServiceCall<'_>) -> GateResult<Value>;
}

/// Resolves service objects by name.
#[async_trait]
pub trait ServiceHandler: Send + Sync + 'static {
    /// Returns the service registered under `name`.
    ///
    /// # Errors
    ///
    /// Implementations return [`GateError::NotFound`] for unknown names and
    /// may return any other error if the service cannot be instantiated.
    async fn get_service_object(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> GateResult<Arc<dyn ServiceObject>>;
}

/// A [`ServiceHandler`] backed by a fixed map of service objects.
#[derive(Default, Clone)]
pub struct ServiceCatalog {
    services: HashMap<String, Arc<dyn ServiceObject>>,
}

impl ServiceCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, service: Arc<dyn ServiceObject>) {
        self.services.insert(name.into(), service);
    }

    /// Returns `true` if a service is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.services.contains_key(name)
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Returns an iterator over registered service names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ServiceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCatalog")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl ServiceHandler for ServiceCatalog {
    async fn get_service_object(
        &self,
        _ctx: &RequestContext,
        name: &str,
    ) -> GateResult<Arc<dyn ServiceObject>> {
        self.services
            .get(name)
            .cloned()
            .ok_or_else(|| GateError::service_not_found(name))
    }
}
