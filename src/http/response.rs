//! Responses produced by the HTTP layer itself.
//!
//! Route handlers build their own responses; these cover the cases where no
//! handler ran (no match, upstream failure).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// `{"error": <message>}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not Found")
}

pub fn bad_gateway() -> Response {
    json_error(StatusCode::BAD_GATEWAY, "Bad Gateway")
}
