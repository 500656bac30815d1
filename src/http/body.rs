//! Typed request body helpers for route handlers.

use axum::{
    body::{Body, Bytes},
    extract::{
        rejection::{BytesRejection, FailedToBufferBody},
        FromRequest,
    },
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::http::response;

/// Failure reading or decoding a request body.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds the size limit")]
    TooLarge,

    #[error("failed to read request body: {0}")]
    Read(#[source] BytesRejection),

    #[error("invalid JSON body: {0}")]
    Parse(#[from] serde_json::Error),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        match self {
            BodyError::TooLarge => response::json_error(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large"),
            other => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Bad Request", "message": other.to_string() })),
            )
                .into_response(),
        }
    }
}

/// Collect the body. Overflowing the server's body limit is `TooLarge`,
/// whether or not the client sent a `Content-Length`.
async fn read_bytes(request: Request<Body>) -> Result<Bytes, BodyError> {
    Bytes::from_request(request, &())
        .await
        .map_err(|rejection| match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                BodyError::TooLarge
            }
            other => BodyError::Read(other),
        })
}

/// Collect the body and deserialize it as JSON into `T`.
pub async fn read_json<T>(request: Request<Body>) -> Result<T, BodyError>
where
    T: DeserializeOwned,
{
    let bytes = read_bytes(request).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Like [`read_json`], substituting `default()` for an empty or malformed
/// body. Read failures, including an oversized body, are still errors.
pub async fn read_json_or<T, F>(request: Request<Body>, default: F) -> Result<T, BodyError>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match read_json(request).await {
        Err(BodyError::Parse(e)) => {
            tracing::debug!(error = %e, "Unusable request body, using default");
            Ok(default())
        }
        result => result,
    }
}
