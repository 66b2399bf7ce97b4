//! The REST request dispatcher.
//!
//! A request goes through two stages:
//!
//! 1. [`Dispatcher::resolve`] reads format, identity and path into a
//!    [`DispatchState`]. A missing application name stops the request here.
//! 2. [`Dispatcher::dispatch`] resolves the effective verb (tunneling over
//!    POST) and runs exactly one branch: the index listing, a documentation
//!    lookup, or delegation to a service. Every collaborator error is
//!    rendered through the [`ResponseFormatter`].
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(services, registry, docs);
//! let response = dispatcher.handle(&input).await;
//! ```

use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use restgate_core::{
    DocumentationProvider, GateError, GateResult, RequestContext, ResponseFormat, ServiceCall,
    ServiceEntry, ServiceHandler, ServiceRegistry, Verb,
};
use restgate_telemetry::metrics::{record_request, InFlightGuard};
use serde_json::{json, Value};

use crate::format::resolve_format;
use crate::identity::resolve_identity;
use crate::path::resolve_path;
use crate::response::{HttpResponse, ResponseFormatter, RestResponse};
use crate::tunnel::tunneled_verb;
use crate::{DispatchState, RequestInput};

/// Dispatcher settings.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Format used when the request does not name one.
    pub default_format: ResponseFormat,
    /// Whether POST requests may tunnel other verbs.
    pub tunneling_enabled: bool,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            default_format: ResponseFormat::Json,
            tunneling_enabled: true,
        }
    }
}

/// A successful branch outcome, before formatting.
struct Reply {
    result: Value,
    status: StatusCode,
    forced_format: Option<ResponseFormat>,
}

impl Reply {
    fn ok(result: Value) -> Self {
        Self {
            result,
            status: StatusCode::OK,
            forced_format: None,
        }
    }

    fn created(result: Value) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(result)
        }
    }

    fn documentation(result: Value) -> Self {
        Self {
            forced_format: Some(ResponseFormat::Json),
            ..Self::ok(result)
        }
    }
}

/// Routes REST requests to named services.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct Dispatcher {
    services: Arc<dyn ServiceHandler>,
    registry: Arc<dyn ServiceRegistry>,
    docs: Arc<dyn DocumentationProvider>,
    formatter: Arc<dyn ResponseFormatter>,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Creates a dispatcher with the default [`RestResponse`] formatter.
    #[must_use]
    pub fn new(
        services: Arc<dyn ServiceHandler>,
        registry: Arc<dyn ServiceRegistry>,
        docs: Arc<dyn DocumentationProvider>,
    ) -> Self {
        Self {
            services,
            registry,
            docs,
            formatter: Arc::new(RestResponse::new()),
            options: DispatchOptions::default(),
        }
    }

    /// Replaces the response formatter.
    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn ResponseFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replaces the dispatcher settings.
    #[must_use]
    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the dispatcher settings.
    #[must_use]
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Returns the response formatter.
    #[must_use]
    pub fn formatter(&self) -> &dyn ResponseFormatter {
        self.formatter.as_ref()
    }

    /// Resolves then dispatches a request.
    ///
    /// A resolution error is rendered immediately and nothing is dispatched.
    pub async fn handle(&self, input: &RequestInput) -> HttpResponse {
        let started = Instant::now();
        match self.resolve(input) {
            Ok(state) => self.dispatch(&state, input).await,
            Err(err) => {
                let format = resolve_format(input, &self.options.default_format);
                tracing::warn!(
                    uri = %input.uri(),
                    error = %err,
                    "request rejected before dispatch"
                );
                let response = self.formatter.send_errors(&err, &format, None);
                record_request(
                    "",
                    input.method().as_str(),
                    response.status().as_u16(),
                    started.elapsed(),
                );
                response
            }
        }
    }

    /// Builds the per-request state.
    ///
    /// Fails with `BadRequest` when no application name is present.
    pub fn resolve(&self, input: &RequestInput) -> GateResult<DispatchState> {
        let format = resolve_format(input, &self.options.default_format);
        let identity = resolve_identity(input)?;
        let path = resolve_path(input.path(), input.uri());
        let context = RequestContext::new().with_application_name(identity.name);

        tracing::debug!(
            request_id = %context.request_id(),
            app_name = context.application_name().unwrap_or_default(),
            service = %path.service,
            resource = %path.resource,
            format = %format,
            documentation_mode = identity.documentation_mode,
            "request resolved"
        );

        Ok(DispatchState {
            format,
            service: path.service,
            resource: path.resource,
            documentation_mode: identity.documentation_mode,
            context,
        })
    }

    /// Runs the request against its target and renders the outcome.
    pub async fn dispatch(&self, state: &DispatchState, input: &RequestInput) -> HttpResponse {
        let _in_flight = InFlightGuard::new();
        let ctx = &state.context;

        let (verb_label, outcome) = match self.effective_verb(input) {
            Ok(verb) => (verb.as_str(), self.execute(state, input, verb).await),
            Err(err) => (input.method().as_str(), Err(err)),
        };

        let response = match outcome {
            Ok(reply) => self.formatter.send_results(
                &reply.result,
                reply.status,
                reply.forced_format.as_ref(),
                &state.format,
            ),
            Err(err) => {
                if err.status_code().is_server_error() {
                    tracing::error!(
                        request_id = %ctx.request_id(),
                        service = %state.service,
                        verb = verb_label,
                        error = %err,
                        "dispatch failed"
                    );
                } else {
                    tracing::warn!(
                        request_id = %ctx.request_id(),
                        service = %state.service,
                        verb = verb_label,
                        error = %err,
                        "dispatch rejected"
                    );
                }
                self.formatter
                    .send_errors(&err, &state.format, Some(ctx.request_id()))
            }
        };

        let status = response.status().as_u16();
        record_request(&state.service, verb_label, status, ctx.elapsed());
        tracing::debug!(
            request_id = %ctx.request_id(),
            http.status_code = status,
            duration_ms = u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX),
            "request dispatched"
        );
        response
    }

    /// The verb to run: the declared one, or the tunneled one for POST.
    fn effective_verb(&self, input: &RequestInput) -> GateResult<Verb> {
        let declared = Verb::from_method(input.method())
            .ok_or_else(|| GateError::method_not_allowed(input.method().as_str()))?;

        if declared != Verb::Post || !self.options.tunneling_enabled {
            return Ok(declared);
        }

        let verb = tunneled_verb(input)?.unwrap_or(Verb::Post);
        if verb != Verb::Post {
            tracing::debug!(tunneled = %verb, "POST tunnels another verb");
        }
        Ok(verb)
    }

    async fn execute(
        &self,
        state: &DispatchState,
        input: &RequestInput,
        verb: Verb,
    ) -> GateResult<Reply> {
        match verb {
            Verb::Get if state.is_index() => self.index(state).await,
            Verb::Get if state.documentation_mode => {
                let result = self
                    .docs
                    .get_swagger_for_service(&state.context, &state.service)
                    .await?;
                Ok(Reply::documentation(result))
            }
            _ => self.delegate(state, input, verb).await,
        }
    }

    /// Lists available services, or the full API catalog in documentation
    /// mode.
    async fn index(&self, state: &DispatchState) -> GateResult<Reply> {
        if state.documentation_mode {
            let result = self.docs.get_swagger(&state.context).await?;
            return Ok(Reply::documentation(result));
        }

        let rows = self.registry.list_services().await?;
        let services: Vec<Value> = ServiceEntry::builtin()
            .iter()
            .chain(rows.iter())
            .map(|entry| json!({ "api_name": entry.api_name, "name": entry.name }))
            .collect();

        Ok(Reply::ok(json!({ "service": services })))
    }

    async fn delegate(
        &self,
        state: &DispatchState,
        input: &RequestInput,
        verb: Verb,
    ) -> GateResult<Reply> {
        let service = self
            .services
            .get_service_object(&state.context, &state.service)
            .await?;

        tracing::debug!(
            request_id = %state.context.request_id(),
            service = %state.service,
            resource = %state.resource,
            verb = %verb,
            "delegating to service"
        );

        let result = service
            .process_request(ServiceCall {
                ctx: &state.context,
                resource: &state.resource,
                verb,
                params: input.params(),
                body: input.body(),
            })
            .await?;

        Ok(if verb.creates() {
            Reply::created(result)
        } else {
            Reply::ok(result)
        })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use http::{HeaderValue, Method};
    use http_body_util::BodyExt;
    use restgate_core::{InMemoryRegistry, ServiceCatalog, ServiceObject};

    struct Echo;

    #[async_trait]
    impl ServiceObject for Echo {
        async fn process_request(&self, call: ServiceCall<'_>) -> GateResult<Value> {
            Ok(json!({ "resource": call.resource, "verb": call.verb }))
        }
    }

    struct NoDocs;

    #[async_trait]
    impl DocumentationProvider for NoDocs {
        async fn get_swagger(&self, _ctx: &RequestContext) -> GateResult<Value> {
            Ok(json!({ "apis": [] }))
        }

        async fn get_swagger_for_service(
            &self,
            _ctx: &RequestContext,
            service: &str,
        ) -> GateResult<Value> {
            Ok(json!({ "resourcePath": format!("/{service}") }))
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut catalog = ServiceCatalog::new();
        catalog.register("db", Arc::new(Echo));
        Dispatcher::new(
            Arc::new(catalog),
            Arc::new(InMemoryRegistry::new()),
            Arc::new(NoDocs),
        )
    }

    async fn json_body(response: HttpResponse) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_resolve_builds_state() {
        let input = RequestInput::new(Method::GET, "/rest/db/todo/")
            .with_param("path", "db/todo")
            .with_param("app_name", "admin")
            .with_param("format", "XML");

        let state = dispatcher().resolve(&input).unwrap();
        assert_eq!(state.service, "db");
        assert_eq!(state.resource, "todo/");
        assert_eq!(state.format, ResponseFormat::Xml);
        assert_eq!(state.application_name(), "admin");
        assert!(!state.documentation_mode);
    }

    #[tokio::test]
    async fn test_post_returns_created() {
        let input = RequestInput::new(Method::POST, "/rest/db/todo")
            .with_param("path", "db/todo")
            .with_param("app_name", "admin");

        let response = dispatcher().handle(&input).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["verb"], "POST");
    }

    #[tokio::test]
    async fn test_dispatch_with_debug_logging() {
        use tracing_subscriber::util::SubscriberInitExt;

        let _guard = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .set_default();

        let input = RequestInput::new(Method::GET, "/rest/db/todo")
            .with_param("path", "db/todo")
            .with_param("app_name", "admin");

        let response = dispatcher().handle(&input).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["resource"], "todo");
    }

    #[tokio::test]
    async fn test_tunneling_disabled_keeps_post() {
        let input = RequestInput::new(Method::POST, "/rest/db/todo")
            .with_param("path", "db/todo")
            .with_param("app_name", "admin")
            .with_header("x-http-method", HeaderValue::from_static("DELETE"));

        let dispatcher = dispatcher().with_options(DispatchOptions {
            tunneling_enabled: false,
            ..DispatchOptions::default()
        });
        let response = dispatcher.handle(&input).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await["verb"], "POST");
    }

    #[tokio::test]
    async fn test_unrouted_method_is_405() {
        let input = RequestInput::new(Method::OPTIONS, "/rest/db")
            .with_param("path", "db")
            .with_param("app_name", "admin");

        let response = dispatcher().handle(&input).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_documentation_mode_ignored_for_writes() {
        let input = RequestInput::new(Method::PUT, "/rest/db/todo")
            .with_param("path", "db/todo")
            .with_param("swagger_app_name", "docs");

        let response = dispatcher().handle(&input).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["verb"], "PUT");
    }

    #[test]
    fn test_default_options() {
        let options = DispatchOptions::default();
        assert_eq!(options.default_format, ResponseFormat::Json);
        assert!(options.tunneling_enabled);
        assert!(format!("{:?}", dispatcher()).contains("Dispatcher"));
    }
}
