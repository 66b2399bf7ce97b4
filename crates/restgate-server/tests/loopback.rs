//! Drives the server over a real loopback socket.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use restgate_core::{
    DocumentationProvider, GateResult, InMemoryRegistry, RequestContext, ServiceCall,
    ServiceCatalog, ServiceObject,
};
use restgate_dispatch::Dispatcher;
use restgate_server::{Server, ServerConfig, ShutdownSignal};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

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
        _service: &str,
    ) -> GateResult<Value> {
        Ok(json!({}))
    }
}

async fn start() -> (String, ShutdownSignal, JoinHandle<()>) {
    let mut catalog = ServiceCatalog::new();
    catalog.register("db", Arc::new(Echo));
    let dispatcher = Dispatcher::new(
        Arc::new(catalog),
        Arc::new(InMemoryRegistry::new()),
        Arc::new(NoDocs),
    );

    let config = ServerConfig::builder()
        .shutdown_timeout(Duration::from_secs(1))
        .build();
    let server = Server::new(config, Arc::new(dispatcher));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let shutdown = ShutdownSignal::new();

    let handle = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            server.serve(listener, shutdown).await.unwrap();
        })
    };

    (addr, shutdown, handle)
}

async fn raw_request(addr: &str, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("response in time")
        .unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn test_get_over_socket() {
    let (addr, shutdown, handle) = start().await;

    let response = raw_request(
        &addr,
        "GET /rest/db/todo/?app_name=admin HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains(r#""resource":"todo/""#), "{response}");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(3), handle)
        .await
        .expect("server stops")
        .unwrap();
}

#[tokio::test]
async fn test_tunneled_post_over_socket() {
    let (addr, shutdown, handle) = start().await;

    let body = "app_name=admin&method=PUT";
    let request = format!(
        "POST /rest/db/todo HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    let response = raw_request(&addr, &request).await;

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains(r#""verb":"PUT""#), "{response}");

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_ready_probe_over_socket() {
    let (addr, shutdown, handle) = start().await;

    let response = raw_request(
        &addr,
        "GET /ready HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");

    shutdown.trigger();
    handle.await.unwrap();
}
