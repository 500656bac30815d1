//! Liveness endpoint.

use axum::{body::Body, http::Request, Json};
use serde::Serialize;

use crate::endpoints::timestamp;
use crate::routing::{HandlerError, Params};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
}

/// `GET /health`
pub async fn health(_request: Request<Body>, _params: Params) -> Result<Json<HealthStatus>, HandlerError> {
    Ok(Json(HealthStatus {
        status: "ok",
        timestamp: timestamp(),
    }))
}
