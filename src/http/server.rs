//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app hosting the route table
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Normalize paths and dispatch to the routing engine
//! - Hand unmatched requests to the fallback
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::Request,
    response::Response,
    routing::any,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::fallback::{Fallback, FallbackError};
use crate::http::path::mount_relative;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::observability::metrics;
use crate::routing::{Dispatch, Router};

/// Application state injected into the bridge handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub mount_path: Arc<str>,
    pub fallback: Fallback,
}

/// HTTP server hosting one route table.
pub struct HttpServer {
    app: axum::Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server for `router` with the given configuration.
    ///
    /// The server takes ownership of the route table; it is read-only from
    /// here on.
    pub fn new(config: ServerConfig, router: Router) -> Result<Self, FallbackError> {
        let fallback = Fallback::from_config(&config.fallback)?;

        let state = AppState {
            router: Arc::new(router),
            mount_path: Arc::from(config.routing.mount_prefix()),
            fallback,
        };

        let app = Self::build_app(&config, state);
        Ok(Self { app, config })
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .route("/{*path}", any(bridge_handler))
            .route("/", any(bridge_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The assembled app, for driving without a socket.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mount_path = %self.config.routing.mount_prefix(),
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Normalize the path, dispatch, and fall back when nothing matched.
async fn bridge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().as_str().to_string();

    let unmatched = match mount_relative(request.uri().path(), &state.mount_path) {
        Some(path) => match state.router.dispatch(&path, request).await {
            Dispatch::Response(response) => {
                metrics::record_request(&method, response.status().as_u16(), "routed", start_time);
                return response;
            }
            Dispatch::NoMatch(request) => request,
        },
        None => {
            tracing::debug!(
                request_id = %request_id(&request),
                path = %request.uri().path(),
                "Outside mount path"
            );
            request
        }
    };

    let (response, outcome) = state.fallback.handle(unmatched).await;
    if !state.fallback.has_upstream() {
        tracing::debug!(method = %method, status = %response.status(), "Unmatched request");
    }
    metrics::record_request(&method, response.status().as_u16(), outcome.as_str(), start_time);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints;
    use axum::http::{header, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server(config: ServerConfig) -> HttpServer {
        HttpServer::new(config, endpoints::build_router().unwrap()).unwrap()
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_under_mount() {
        let (status, body) = send(server(ServerConfig::default()).app(), get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_trailing_slash_normalized() {
        let (status, body) = send(server(ServerConfig::default()).app(), get("/api/test/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "GET request received at /test");
    }

    #[tokio::test]
    async fn test_mount_root() {
        let (status, body) = send(server(ServerConfig::default()).app(), get("/api")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is working!");
    }

    #[tokio::test]
    async fn test_unmatched_is_404() {
        let app = server(ServerConfig::default()).app();

        let (status, body) = send(app.clone(), get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not Found" }));

        // Outside the mount path entirely.
        let (status, _) = send(app, get("/health")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_method_mismatch_is_404() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/api/test")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(server(ServerConfig::default()).app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_echo() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"bridge"}"#))
            .unwrap();
        let (status, body) = send(server(ServerConfig::default()).app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "message": "POST request received", "body": { "name": "bridge" } })
        );
    }

    #[tokio::test]
    async fn test_streamed_body_over_limit_is_413() {
        let mut config = ServerConfig::default();
        config.limits.max_body_bytes = 16;

        let chunks = vec![
            Ok::<_, std::io::Error>(axum::body::Bytes::from_static(b"{\"padding\":\"")),
            Ok(axum::body::Bytes::from("x".repeat(64))),
            Ok(axum::body::Bytes::from_static(b"\"}")),
        ];
        let request = Request::builder()
            .method("POST")
            .uri("/api/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap();

        let (status, body) = send(server(config).app(), request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "Payload Too Large" }));
    }

    #[tokio::test]
    async fn test_root_mount_config() {
        let mut config = ServerConfig::default();
        config.routing.mount_path = "/".into();
        let (status, body) = send(server(config).app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_request_id_propagated() {
        let response = server(ServerConfig::default())
            .app()
            .oneshot(get("/api/health"))
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
