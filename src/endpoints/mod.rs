//! Built-in endpoints and the assembled route table.
//!
//! `build_router` is the single place the served table is put together;
//! the startup routine owns the result.

pub mod api;
pub mod health;

use chrono::{SecondsFormat, Utc};

use crate::routing::{RouteError, Router};

/// Main router: `/health` first, then the API routes.
pub fn build_router() -> Result<Router, RouteError> {
    let mut router = Router::new();
    router.get("/health", health::health)?;
    router.merge(api::routes()?);
    Ok(router)
}

/// Current UTC time as ISO-8601 with millisecond precision.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
