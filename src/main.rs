//! route-bridge
//!
//! Serves an Express-style route table (`/users/:id`) behind a mount prefix,
//! handing every unmatched request to a fallback.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ http::path ──▶ routing::Router ──▶ handler
//!                          │          (strip /api,        │ first match
//!                          │           trim slash)        │ wins
//!                          │                              ▼ NoMatch
//!                          │                        http::fallback
//!                          │                     (404 or upstream proxy)
//!                          ▼
//!     Cross-cutting: config · observability · lifecycle
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use route_bridge::routing::Router;
use route_bridge::{config, endpoints, lifecycle, observability};

#[derive(Parser)]
#[command(name = "route-bridge", version)]
#[command(about = "Express-style route table served over HTTP", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Print the route table in match order
    Routes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref())?;
    let router = endpoints::build_router()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Routes => print_routes(&router, config.routing.mount_prefix()),
        Commands::Serve => {
            observability::logging::init(&config.observability)?;
            tracing::info!("route-bridge v{} starting", env!("CARGO_PKG_VERSION"));
            lifecycle::startup::run(config, router).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}

fn print_routes(router: &Router, mount: &str) {
    for route in router.routes() {
        let path = match (mount, route.path()) {
            ("", path) => path.to_string(),
            (mount, "/") => mount.to_string(),
            (mount, path) => format!("{mount}{path}"),
        };
        println!("{:<7} {}", route.method(), path);
    }
}
