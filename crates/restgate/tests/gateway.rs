//! End-to-end requests through the assembled gateway.

use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::{BodyExt, Full};
use restgate::config::GateConfig;
use restgate::core::ResponseFormat;
use restgate::server::Server;
use restgate::Gateway;
use serde_json::Value;

fn server() -> Server {
    Gateway::demo(GateConfig::default()).into_server()
}

async fn send(server: &Server, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-dreamfactory-application-name", "todo-app")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap();
    let response = server.handle(req).await;
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_document_lifecycle() {
    let server = server();

    let (status, body) = send(&server, "POST", "/rest/db/todo/", r#"{"title":"ship"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json(&body)["path"], "todo/1");

    let (status, _) = send(&server, "PATCH", "/rest/db/todo/1", r#"{"done":true}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&server, "GET", "/rest/db/todo/1", "").await;
    let record = json(&body);
    assert_eq!(record["document"]["title"], "ship");
    assert_eq!(record["document"]["done"], true);

    let (status, _) = send(
        &server,
        "POST",
        "/rest/db/todo/1?method=DELETE",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&server, "GET", "/rest/db/todo/1", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["error"]["kind"], "not_found");
}

#[tokio::test]
async fn test_index_lists_builtins_then_db() {
    let (status, body) = send(&server(), "GET", "/rest/", "").await;
    assert_eq!(status, StatusCode::OK);

    let listing = json(&body);
    let names: Vec<_> = listing["service"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["User Login", "System Configuration", "In-Memory Database"]);
}

#[tokio::test]
async fn test_documentation_mode() {
    let server = server();

    let (status, body) = send(&server, "GET", "/rest?swagger_app_name=docs&format=xml", "").await;
    assert_eq!(status, StatusCode::OK);
    let listing = json(&body);
    assert_eq!(listing["swaggerVersion"], "1.2");
    assert_eq!(listing["basePath"], "/rest");

    let (status, body) = send(&server, "GET", "/rest/db?swagger_app_name=docs", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["resourcePath"], "/db");
}

#[tokio::test]
async fn test_xml_default_format() {
    let mut config = GateConfig::default();
    config.dispatch.default_format = ResponseFormat::Xml;
    let server = Gateway::demo(config).into_server();

    let (status, body) = send(&server, "GET", "/rest/db/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<dfapi>"), "{body}");
}

#[tokio::test]
async fn test_unknown_service() {
    let (status, body) = send(&server(), "GET", "/rest/mail/inbox", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("mail"));
}

#[tokio::test]
async fn test_builtin_entries_resolve() {
    let server = server();

    let (status, body) = send(&server, "GET", "/rest/user", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["name"], "User Login");

    let (status, body) = send(&server, "GET", "/rest/system/", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["api_name"], "system");

    let (status, _) = send(&server, "DELETE", "/rest/system", "").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
