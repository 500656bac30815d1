//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     (method, "/users/:id", handler)
//!     → pattern.rs (compile anchored matcher, collect param names)
//!     → router.rs (append in registration order)
//!     → Router shared read-only via Arc
//!
//! Incoming Request (method, normalized path):
//!     → router.rs (linear scan, first match wins)
//!     → handler.rs (invoke with request + Params)
//!     → Return: Response, 500 on handler failure, or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)
//! - No-match is an outcome, not an error

pub mod error;
pub mod handler;
pub mod params;
pub mod pattern;
pub mod router;

pub use error::{HandlerError, HandlerFailure, RouteError};
pub use handler::Handler;
pub use params::Params;
pub use pattern::PathPattern;
pub use router::{Dispatch, Route, RouteMatch, Router};
