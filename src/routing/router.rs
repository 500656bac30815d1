//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Look up the first route matching a method and path
//! - Invoke the matched handler and translate failures into a 500
//! - Return an explicit no-match, handing the request back to the caller
//!
//! # Design Decisions
//! - Immutable after startup (shared via Arc, no locks on dispatch)
//! - O(n) scan in registration order: first registered, first matched
//! - Methods compared case-sensitively, exactly as registered
//! - Paths are expected normalized; the router never rewrites them

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::routing::error::{HandlerFailure, RouteError};
use crate::routing::handler::Handler;
use crate::routing::params::Params;
use crate::routing::pattern::PathPattern;

/// A registered route.
#[derive(Clone)]
pub struct Route {
    method: String,
    pattern: PathPattern,
    handler: Arc<dyn Handler>,
}

impl Route {
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The path template as registered.
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn param_names(&self) -> &[String] {
        self.pattern.param_names()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.pattern.as_str())
            .field("param_names", &self.pattern.param_names())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.pattern.as_str())
    }
}

/// A route found by [`Router::find`] together with its extracted parameters.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

/// Outcome of [`Router::dispatch`].
#[derive(Debug)]
pub enum Dispatch {
    /// A route matched; this is the handler's response, or the 500 it was
    /// translated into.
    Response(Response),
    /// Nothing matched. The request is returned untouched for the fallback.
    NoMatch(Request<Body>),
}

/// Ordered collection of routes.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `path` and append a route for `method`.
    ///
    /// `method` is stored as given; no check that it is a known verb.
    pub fn register<H>(
        &mut self,
        method: impl Into<String>,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError>
    where
        H: Handler,
    {
        let method = method.into();
        let pattern = PathPattern::compile(path)?;

        tracing::debug!(
            method = %method,
            path = %path,
            params = ?pattern.param_names(),
            "Route registered"
        );

        self.routes.push(Route {
            method,
            pattern,
            handler: Arc::new(handler),
        });
        Ok(self)
    }

    pub fn get<H: Handler>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.register("GET", path, handler)
    }

    pub fn post<H: Handler>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.register("POST", path, handler)
    }

    pub fn put<H: Handler>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.register("PUT", path, handler)
    }

    pub fn delete<H: Handler>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.register("DELETE", path, handler)
    }

    pub fn patch<H: Handler>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.register("PATCH", path, handler)
    }

    /// Append every route of `other`, in its order, after the existing routes.
    ///
    /// No deduplication: an earlier overlapping route keeps priority.
    pub fn merge(&mut self, other: Router) -> &mut Self {
        tracing::debug!(
            existing = self.routes.len(),
            merged = other.routes.len(),
            "Routers merged"
        );
        self.routes.extend(other.routes);
        self
    }

    /// Registered routes in priority order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route whose method equals `method` and whose pattern matches
    /// the whole of `path`.
    pub fn find(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find_map(|route| {
                route
                    .pattern
                    .captures(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    /// Match `request` against the table and run the handler.
    ///
    /// `path` is the normalized path to match; the request's own URI is left
    /// as received. Handler errors and panics become a 500 response.
    pub async fn dispatch(&self, path: &str, request: Request<Body>) -> Dispatch {
        let method = request.method().as_str().to_string();

        let Some(RouteMatch { route, params }) = self.find(&method, path) else {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return Dispatch::NoMatch(request);
        };

        let handler = route.handler.clone();
        let outcome = AssertUnwindSafe(async move { handler.call(request, params).await })
            .catch_unwind()
            .await;

        let message = match outcome {
            Ok(Ok(response)) => return Dispatch::Response(response),
            Ok(Err(err)) => err.to_string(),
            Err(panic) => panic_message(panic.as_ref()),
        };

        let failure = HandlerFailure {
            method,
            route: route.path().to_string(),
            message,
        };
        tracing::error!(
            method = %failure.method,
            route = %failure.route,
            path = %path,
            error = %failure.message,
            "Error in route handler"
        );
        Dispatch::Response(failure.into_response())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
