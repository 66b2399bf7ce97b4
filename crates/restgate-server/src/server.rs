//! The HTTP server.
//!
//! One hyper HTTP/1.1 connection task per accepted socket. Each request is
//! matched against the REST prefix, its body is read under a size limit and
//! a timeout, its parameters are merged, and the resulting
//! [`RequestInput`] is handed to the [`Dispatcher`].

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use restgate_core::{GateError, GateResult};
use restgate_dispatch::{Dispatcher, HttpResponse, RequestInput, PATH_PARAM};
use serde::Serialize;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::health::{HealthCheck, ReadinessCheck};
use crate::routing::{collect_params, match_route, Route};
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen address is invalid or unavailable.
    #[error("failed to bind: {0}")]
    BindError(String),

    /// Socket-level failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Serves the dispatcher over HTTP.
///
/// ```rust,ignore
/// let server = Server::new(ServerConfig::default(), Arc::new(dispatcher));
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
    health: HealthCheck,
    readiness: ReadinessCheck,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("readiness", &self.readiness)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Creates a server for `dispatcher`.
    #[must_use]
    pub fn new(config: ServerConfig, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            health: HealthCheck::new("restgate", env!("CARGO_PKG_VERSION")),
            readiness: ReadinessCheck::new(),
        }
    }

    /// Replaces the liveness probe, e.g. to report another service name.
    #[must_use]
    pub fn with_health(mut self, health: HealthCheck) -> Self {
        self.health = health;
        self
    }

    /// Replaces the readiness probe.
    #[must_use]
    pub fn with_readiness(mut self, readiness: ReadinessCheck) -> Self {
        self.readiness = readiness;
        self
    }

    /// Returns the server settings.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the readiness probe.
    #[must_use]
    pub fn readiness(&self) -> &ReadinessCheck {
        &self.readiness
    }

    /// Serves until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.socket_addr().map_err(|e| {
            ServerError::BindError(format!("invalid address '{}': {e}", self.config.http_addr()))
        })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(format!("failed to bind to {addr}: {e}")))?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's address cannot be read.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            prefix = self.config.rest_prefix(),
            "server listening"
        );

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let server = Arc::clone(&server);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();

                        tokio::spawn(async move {
                            if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(%remote_addr, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },

                () = shutdown.recv() => {
                    tracing::info!("shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        server.readiness.set_ready(false);

        let drain_timeout = server.config.shutdown_timeout();
        tracing::info!(
            open = tracker.active_connections(),
            timeout_secs = drain_timeout.as_secs(),
            "draining connections"
        );

        tokio::select! {
            () = tracker.wait_idle() => tracing::info!("all connections closed"),
            () = tokio::time::sleep(drain_timeout) => tracing::warn!(
                open = tracker.active_connections(),
                "drain timeout reached"
            ),
        }

        tracing::info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let server = Arc::clone(self);
        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { Ok::<_, Infallible>(server.handle(req).await) }
        });

        let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(%remote_addr, "finishing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    /// Handles one request.
    ///
    /// Generic over the body so it can be driven without a socket.
    pub async fn handle<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        tracing::debug!(method = %parts.method, uri = %parts.uri, "request received");

        let path = match match_route(self.config.rest_prefix(), parts.uri.path()) {
            Route::Health if parts.method == Method::GET => {
                return json_response(StatusCode::OK, &self.health.status());
            }
            Route::Ready if parts.method == Method::GET => {
                let status = self.readiness.status();
                let code = if status.ready {
                    StatusCode::OK
                } else {
                    StatusCode::SERVICE_UNAVAILABLE
                };
                return json_response(code, &status);
            }
            Route::Health | Route::Ready => {
                return self.reject(&GateError::method_not_allowed(parts.method.as_str()));
            }
            Route::Unmatched => {
                return self.reject(&GateError::not_found(format!(
                    "No route for '{}'.",
                    parts.uri.path()
                )));
            }
            Route::Rest(path) => path,
        };

        let body = match self.read_body(&parts.headers, body).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(uri = %parts.uri, error = %err, "request body rejected");
                return self.reject(&err);
            }
        };

        let mut params = collect_params(parts.uri.query(), &parts.headers, &body);
        if !path.is_empty() {
            params.insert(PATH_PARAM.to_string(), path);
        }

        let uri = parts.uri.to_string();
        let input = RequestInput::new(parts.method, uri)
            .with_headers(parts.headers)
            .with_params(params)
            .with_body(body);

        match tokio::time::timeout(self.config.request_timeout(), self.dispatcher.handle(&input))
            .await
        {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(uri = %input.uri(), "request timed out");
                self.reject(&GateError::timeout("Request processing timed out."))
            }
        }
    }

    async fn read_body<B>(&self, headers: &HeaderMap, body: B) -> GateResult<Bytes>
    where
        B: Body<Data = Bytes>,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let limit = self.config.max_body_bytes();
        let declared = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if declared.is_some_and(|len| len > limit) {
            return Err(GateError::payload_too_large(limit));
        }

        let collected =
            tokio::time::timeout(self.config.request_timeout(), Limited::new(body, limit).collect())
                .await;

        match collected {
            Ok(Ok(collected)) => Ok(collected.to_bytes()),
            Ok(Err(e)) if e.downcast_ref::<LengthLimitError>().is_some() => {
                Err(GateError::payload_too_large(limit))
            }
            Ok(Err(e)) => Err(GateError::bad_request(format!(
                "Failed to read request body: {e}"
            ))),
            Err(_) => Err(GateError::request_timeout(
                "Request body was not received in time.",
            )),
        }
    }

    /// Renders an error raised before dispatch with the default format.
    fn reject(&self, err: &GateError) -> HttpResponse {
        self.dispatcher
            .formatter()
            .send_errors(err, &self.dispatcher.options().default_format, None)
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    let bytes = serde_json::to_vec(body).unwrap_or_default();
    let mut response = Response::new(Full::new(Bytes::from(bytes)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use restgate_core::{
        DocumentationProvider, InMemoryRegistry, RequestContext, ServiceCall, ServiceCatalog,
        ServiceEntry, ServiceObject,
    };
    use serde_json::{json, Value};
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl ServiceObject for Echo {
        async fn process_request(&self, call: ServiceCall<'_>) -> GateResult<Value> {
            Ok(json!({
                "resource": call.resource,
                "verb": call.verb,
                "app": call.ctx.application_name(),
                "body_len": call.body.len(),
            }))
        }
    }

    struct Slow;

    #[async_trait]
    impl ServiceObject for Slow {
        async fn process_request(&self, _call: ServiceCall<'_>) -> GateResult<Value> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Value::Null)
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

    fn server_with(config: ServerConfig) -> Server {
        let mut catalog = ServiceCatalog::new();
        catalog.register("db", Arc::new(Echo));
        catalog.register("slow", Arc::new(Slow));
        let registry = InMemoryRegistry::from_entries([ServiceEntry::new("db", "Database")]);
        let dispatcher = Dispatcher::new(Arc::new(catalog), Arc::new(registry), Arc::new(NoDocs));
        Server::new(config, Arc::new(dispatcher))
    }

    fn server() -> Server {
        server_with(ServerConfig::default())
    }

    fn request(method: &str, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    async fn send(server: &Server, req: Request<Full<Bytes>>) -> (StatusCode, Value) {
        let response = server.handle(req).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn empty() -> Full<Bytes> {
        Full::new(Bytes::new())
    }

    #[tokio::test]
    async fn test_index_listing() {
        let req = request("GET", "/rest?app_name=admin").body(empty()).unwrap();
        let (status, body) = send(&server(), req).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body["service"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["api_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["user", "system", "db"]);
    }

    #[tokio::test]
    async fn test_trailing_slash_reaches_service() {
        let req = request("GET", "/rest/db/todo/?app_name=admin")
            .body(empty())
            .unwrap();
        let (status, body) = send(&server(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resource"], "todo/");
        assert_eq!(body["verb"], "GET");
        assert_eq!(body["app"], "admin");
    }

    #[tokio::test]
    async fn test_escaped_resource_is_decoded() {
        let req = request("GET", "/rest/db/my%20table?app_name=admin")
            .body(empty())
            .unwrap();
        let (status, body) = send(&server(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resource"], "my table");

        let req = request("GET", "/rest/db/my%20table/?app_name=admin")
            .body(empty())
            .unwrap();
        let (_, body) = send(&server(), req).await;
        assert_eq!(body["resource"], "my table/");
    }

    #[tokio::test]
    async fn test_form_body_tunnels_delete() {
        let req = request("POST", "/rest/db/todo")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from_static(b"app_name=admin&method=DELETE")))
            .unwrap();
        let (status, body) = send(&server(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verb"], "DELETE");
    }

    #[tokio::test]
    async fn test_post_creates() {
        let req = request("POST", "/rest/db/todo")
            .header("x-application-name", "admin")
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from_static(br#"{"title":"a"}"#)))
            .unwrap();
        let (status, body) = send(&server(), req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["body_len"], 13);
    }

    #[tokio::test]
    async fn test_patch_is_merge() {
        let req = request("PATCH", "/rest/db/todo/1?app_name=admin")
            .body(empty())
            .unwrap();
        let (_, body) = send(&server(), req).await;
        assert_eq!(body["verb"], "MERGE");
    }

    #[tokio::test]
    async fn test_unrouted_method() {
        let req = request("OPTIONS", "/rest/db?app_name=admin")
            .body(empty())
            .unwrap();
        let (status, body) = send(&server(), req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"]["kind"], "method_not_allowed");
    }

    #[tokio::test]
    async fn test_outside_prefix_is_not_found() {
        let req = request("GET", "/admin/db").body(empty()).unwrap();
        let (status, _) = send(&server(), req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_body_over_limit() {
        let server = server_with(ServerConfig::builder().max_body_bytes(4).build());
        let req = request("PUT", "/rest/db/todo?app_name=admin")
            .body(Full::new(Bytes::from_static(b"0123456789")))
            .unwrap();
        let (status, body) = send(&server, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"]["details"]["limit"], 4);
    }

    #[tokio::test]
    async fn test_dispatch_timeout() {
        let server = server_with(
            ServerConfig::builder()
                .request_timeout(Duration::from_millis(20))
                .build(),
        );
        let req = request("GET", "/rest/slow?app_name=admin")
            .body(empty())
            .unwrap();
        let (status, _) = send(&server, req).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_probes() {
        let server = server();
        let (status, body) = send(&server, request("GET", "/health").body(empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        server.readiness().set_ready(false);
        let (status, body) = send(&server, request("GET", "/ready").body(empty()).unwrap()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["ready"], false);

        let (status, _) = send(&server, request("POST", "/health").body(empty()).unwrap()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_missing_identity_is_bad_request() {
        let req = request("GET", "/rest/db").body(empty()).unwrap();
        let (status, _) = send(&server(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
