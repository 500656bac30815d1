//! Routing error types.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised while registering a route.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The same parameter name appears twice in one template.
    #[error("duplicate parameter `{name}` in route `{path}`")]
    DuplicateParam { path: String, name: String },

    /// The compiled matcher was rejected by the regex engine.
    #[error("invalid route pattern `{path}`: {source}")]
    InvalidPattern {
        path: String,
        #[source]
        source: regex::Error,
    },
}

/// Error returned by a route handler.
///
/// Any `std::error::Error` converts into it, so handlers can use `?`.
pub struct HandlerError {
    inner: Box<dyn std::error::Error + Send + Sync + 'static>,
}

#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

impl HandlerError {
    /// Build an error from a plain message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self {
            inner: Box::new(Message(message.to_string())),
        }
    }

    /// The underlying error.
    pub fn source_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self {
            inner: Box::new(error),
        }
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// A handler failed or panicked while serving a matched route.
#[derive(Debug, Clone, Error)]
#[error("handler failure in {method} {route}: {message}")]
pub struct HandlerFailure {
    pub method: String,
    pub route: String,
    pub message: String,
}

impl IntoResponse for HandlerFailure {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal Server Error",
                "message": self.message,
            })),
        )
            .into_response()
    }
}
