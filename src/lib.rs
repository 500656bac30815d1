//! Express-style path router hosted on Axum.

pub mod config;
pub mod endpoints;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Dispatch, HandlerError, Params, Router};
