//! Route handler abstraction.

use std::future::Future;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;

use crate::routing::error::HandlerError;
use crate::routing::params::Params;

/// Future returned by a type-erased handler.
pub type HandlerFuture = BoxFuture<'static, Result<Response, HandlerError>>;

/// A leaf function serving one route.
///
/// Implemented for every `Fn(Request<Body>, Params) -> impl Future` whose
/// output is `Result<impl IntoResponse, HandlerError>`, so plain
/// `async fn`s register directly.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request<Body>, params: Params) -> HandlerFuture;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request<Body>, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, request: Request<Body>, params: Params) -> HandlerFuture {
        let fut = (self)(request, params);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}
