//! Example API routes.

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::endpoints::timestamp;
use crate::http::read_json_or;
use crate::routing::{HandlerError, Params, RouteError, Router};

/// Routes merged into the main router.
pub fn routes() -> Result<Router, RouteError> {
    let mut router = Router::new();
    router
        .get("/", index)?
        .get("/test", get_test)?
        .post("/test", post_test)?;
    Ok(router)
}

/// `GET /`
async fn index(_request: Request<Body>, _params: Params) -> Result<Json<Value>, HandlerError> {
    Ok(Json(json!({
        "message": "API is working!",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// `GET /test`
async fn get_test(_request: Request<Body>, _params: Params) -> Result<Json<Value>, HandlerError> {
    tracing::info!("GET request received at /test");
    Ok(Json(json!({
        "message": "GET request received at /test",
        "timestamp": timestamp(),
    })))
}

/// `POST /test`: echoes the JSON body, or `{}` if it does not parse.
async fn post_test(request: Request<Body>, _params: Params) -> Result<Response, HandlerError> {
    let body: Value = match read_json_or(request, || json!({})).await {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    Ok(Json(json!({
        "message": "POST request received",
        "body": body,
    }))
    .into_response())
}
