//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics endpoint when enabled
//! - Bind the listener and hand it the route table
//! - Translate OS signals into the shutdown broadcast
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The route table is built by the caller and moved in; nothing global

use tokio::net::TcpListener;
use thiserror::Error;

use crate::config::ServerConfig;
use crate::http::{FallbackError, HttpServer};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::routing::Router;

/// Fatal startup or serving error.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fallback(#[from] FallbackError),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Serve `router` with `config` until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig, router: Router) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        mount_path = %config.routing.mount_prefix(),
        routes = router.len(),
        fallback_upstream = ?config.fallback.upstream,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let public_url = format!(
        "http://{}:{}",
        config.listener.public_hostname, config.listener.port
    );
    let mount = config.routing.mount_prefix().to_string();
    let server = HttpServer::new(config, router)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_shutdown().await;
        shutdown.trigger();
    });

    tracing::info!("Ready on {public_url}");
    tracing::info!("Routes available at {public_url}{mount}");

    server
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)
}
