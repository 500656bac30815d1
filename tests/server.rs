//! End-to-end tests against a running server.

use axum::body::{Body, Bytes};
use axum::http::Request;
use reqwest::StatusCode;
use route_bridge::config::ServerConfig;
use route_bridge::{endpoints, HttpServer};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_health_endpoint() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;

    let res = common::client()
        .get(format!("http://{addr}/api/health"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(chrono_like(&body["timestamp"]));

    shutdown.trigger();
}

#[tokio::test]
async fn test_post_echo_and_malformed_body() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;
    let client = common::client();
    let url = format!("http://{addr}/api/test");

    let body: Value = client
        .post(&url)
        .json(&json!({ "items": [1, 2, 3] }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        body,
        json!({ "message": "POST request received", "body": { "items": [1, 2, 3] } })
    );

    let res = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{ broken")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["body"], json!({}));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unmatched_routes_are_404() {
    let (addr, shutdown) = common::spawn_server(ServerConfig::default()).await;
    let client = common::client();

    for (method, path) in [
        (reqwest::Method::GET, "/api/missing"),
        (reqwest::Method::PUT, "/api/test"),
        (reqwest::Method::GET, "/elsewhere"),
    ] {
        let res = client
            .request(method.clone(), format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{method} {path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Not Found" }));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_limit_enforced() {
    let mut config = ServerConfig::default();
    config.limits.max_body_bytes = 16;
    let (addr, shutdown) = common::spawn_server(config).await;

    let res = common::client()
        .post(format!("http://{addr}/api/test"))
        .header("content-type", "application/json")
        .body(format!("{{\"padding\":\"{}\"}}", "x".repeat(64)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    shutdown.trigger();
}

#[tokio::test]
async fn test_body_limit_enforced_without_content_length() {
    let mut config = ServerConfig::default();
    config.limits.max_body_bytes = 16;
    let server = HttpServer::new(config, endpoints::build_router().unwrap()).unwrap();

    let payload = format!("{{\"padding\":\"{}\"}}", "x".repeat(64));
    let chunks = payload
        .into_bytes()
        .chunks(8)
        .map(|chunk| Ok::<_, std::io::Error>(Bytes::copy_from_slice(chunk)))
        .collect::<Vec<_>>();
    let request = Request::builder()
        .method("POST")
        .uri("/api/test")
        .header("content-type", "application/json")
        .body(Body::from_stream(futures_util::stream::iter(chunks)))
        .unwrap();

    let response = server.app().oneshot(request).await.unwrap();
    assert_eq!(response.status().as_u16(), StatusCode::PAYLOAD_TOO_LARGE.as_u16());

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "Payload Too Large" }));
}

fn chrono_like(value: &Value) -> bool {
    value
        .as_str()
        .map(|s| s.len() == "2026-01-01T00:00:00.000Z".len() && s.ends_with('Z'))
        .unwrap_or(false)
}
