//! Placeholders for the `user` and `system` services.
//!
//! The index always lists both. A gateway without real implementations
//! serves them with [`BuiltinService`], which describes itself on `GET` and
//! refuses everything else.

use async_trait::async_trait;
use restgate_core::{GateError, GateResult, ServiceCall, ServiceEntry, ServiceObject, Verb};
use serde_json::{json, Value};

/// A read-only service that answers with its own registry entry.
///
/// ```
/// use restgate::builtin::BuiltinService;
///
/// let [user, system] = BuiltinService::all();
/// assert_eq!(user.entry().api_name, "user");
/// assert_eq!(system.entry().name, "System Configuration");
/// ```
#[derive(Debug, Clone)]
pub struct BuiltinService {
    entry: ServiceEntry,
}

impl BuiltinService {
    /// Wraps a registry entry.
    #[must_use]
    pub const fn new(entry: ServiceEntry) -> Self {
        Self { entry }
    }

    /// One placeholder per built-in entry.
    #[must_use]
    pub fn all() -> [Self; 2] {
        ServiceEntry::builtin().map(Self::new)
    }

    /// The entry this service describes.
    #[must_use]
    pub const fn entry(&self) -> &ServiceEntry {
        &self.entry
    }
}

#[async_trait]
impl ServiceObject for BuiltinService {
    async fn process_request(&self, call: ServiceCall<'_>) -> GateResult<Value> {
        if call.verb != Verb::Get {
            return Err(GateError::method_not_allowed(call.verb.to_string()));
        }
        if !call.resource.is_empty() {
            return Err(GateError::not_found(format!(
                "Resource '{}' not found in service '{}'.",
                call.resource, self.entry.api_name
            )));
        }

        Ok(json!({
            "api_name": self.entry.api_name,
            "name": self.entry.name,
            "resource": [],
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use restgate_core::{ErrorKind, RequestContext, RequestParams};

    async fn run(service: &BuiltinService, verb: Verb, resource: &str) -> GateResult<Value> {
        let ctx = RequestContext::mock();
        let params = RequestParams::new();
        let body = Bytes::new();
        service
            .process_request(ServiceCall {
                ctx: &ctx,
                resource,
                verb,
                params: &params,
                body: &body,
            })
            .await
    }

    #[tokio::test]
    async fn test_get_describes_service() {
        let [user, _] = BuiltinService::all();
        let described = run(&user, Verb::Get, "").await.unwrap();
        assert_eq!(
            described,
            json!({ "api_name": "user", "name": "User Login", "resource": [] })
        );
    }

    #[tokio::test]
    async fn test_writes_are_refused() {
        let [_, system] = BuiltinService::all();
        for verb in [Verb::Post, Verb::Put, Verb::Merge, Verb::Delete] {
            let err = run(&system, verb, "").await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MethodNotAllowed);
        }
    }

    #[tokio::test]
    async fn test_sub_resource_is_missing() {
        let [user, _] = BuiltinService::all();
        let err = run(&user, Verb::Get, "session").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
