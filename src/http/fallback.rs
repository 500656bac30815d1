//! Handling for requests no route matched.
//!
//! # Responsibilities
//! - Return `404 {"error":"Not Found"}` when no upstream is configured
//! - Otherwise forward the request unchanged to the upstream
//! - Map upstream connection errors to 502
//!
//! # Design Decisions
//! - Method, headers, body, path and query are forwarded as received
//! - Bodies stream through; nothing is buffered
//! - Upstream requests always go out as HTTP/1.1

use axum::{
    body::Body,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, Uri, Version,
    },
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::FallbackConfig;
use crate::http::request::request_id;
use crate::http::response;

/// The configured upstream could not be turned into a target URI.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("invalid fallback upstream `{url}`: {source}")]
    InvalidUri {
        url: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },

    #[error("fallback upstream `{0}` has no host")]
    MissingAuthority(String),
}

/// How the fallback resolved a request, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackOutcome {
    NotFound,
    Forwarded,
    UpstreamError,
}

impl FallbackOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackOutcome::NotFound => "not_found",
            FallbackOutcome::Forwarded => "forwarded",
            FallbackOutcome::UpstreamError => "upstream_error",
        }
    }
}

#[derive(Clone)]
struct Upstream {
    scheme: Scheme,
    authority: Authority,
    client: Client<HttpConnector, Body>,
}

/// Fallback shared by all request tasks.
#[derive(Clone, Default)]
pub struct Fallback {
    upstream: Option<Upstream>,
}

impl Fallback {
    /// 404 for everything unmatched.
    pub fn not_found() -> Self {
        Self::default()
    }

    pub fn from_config(config: &FallbackConfig) -> Result<Self, FallbackError> {
        let Some(url) = &config.upstream else {
            return Ok(Self::not_found());
        };

        let uri: Uri = url.parse().map_err(|source| FallbackError::InvalidUri {
            url: url.clone(),
            source,
        })?;
        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| FallbackError::MissingAuthority(url.clone()))?;
        let scheme = uri.scheme().cloned().unwrap_or(Scheme::HTTP);

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        tracing::info!(upstream = %url, "Unmatched requests forward to upstream");
        Ok(Self {
            upstream: Some(Upstream {
                scheme,
                authority,
                client,
            }),
        })
    }

    pub fn has_upstream(&self) -> bool {
        self.upstream.is_some()
    }

    /// Resolve an unmatched request.
    pub async fn handle(&self, request: Request<Body>) -> (Response, FallbackOutcome) {
        let Some(upstream) = &self.upstream else {
            return (response::not_found(), FallbackOutcome::NotFound);
        };

        let request_id = request_id(&request).to_string();
        let (mut parts, body) = request.into_parts();

        let mut uri_parts = parts.uri.clone().into_parts();
        uri_parts.scheme = Some(upstream.scheme.clone());
        uri_parts.authority = Some(upstream.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = match Uri::from_parts(uri_parts) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Could not build upstream URI");
                return (response::bad_gateway(), FallbackOutcome::UpstreamError);
            }
        };
        parts.version = Version::HTTP_11;

        tracing::debug!(
            request_id = %request_id,
            method = %parts.method,
            uri = %parts.uri,
            "Forwarding unmatched request"
        );

        match upstream.client.request(Request::from_parts(parts, body)).await {
            Ok(upstream_response) => {
                let (parts, body) = upstream_response.into_parts();
                (Response::from_parts(parts, Body::new(body)), FallbackOutcome::Forwarded)
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Upstream error");
                (response::bad_gateway(), FallbackOutcome::UpstreamError)
            }
        }
    }
}
