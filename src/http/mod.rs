//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → path.rs (strip mount prefix, trim trailing slash)
//!     → routing::Router::dispatch
//!     → fallback.rs (404 or upstream) when nothing matched
//!     → Send to client
//! ```

pub mod body;
pub mod fallback;
pub mod path;
pub mod request;
pub mod response;
pub mod server;

pub use body::{read_json, read_json_or, BodyError};
pub use fallback::{Fallback, FallbackError};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
