//! Upstream forwarding.
//!
//! # Responsibilities
//! - Work out the original destination of the request
//! - Perform exactly one request against it, streaming the body
//!
//! # Design Decisions
//! - No retries, load balancing or circuit breaking
//! - Absolute-form URIs are the original destination; origin-form URIs are
//!   joined onto the configured upstream base

use axum::{
    body::Body,
    http::{uri::PathAndQuery, Request, Response, Uri, Version},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

use crate::error::PipelineError;

/// Sends the (possibly augmented) request to its destination.
#[derive(Clone)]
pub struct UpstreamForwarder {
    client: Client<HttpConnector, Body>,
    upstream: Option<Url>,
}

impl UpstreamForwarder {
    pub fn new(upstream: Option<Url>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, upstream }
    }

    /// Resolve the URI the request is actually sent to.
    pub fn target_uri(&self, uri: &Uri) -> Result<Uri, PipelineError> {
        if uri.scheme().is_some() && uri.authority().is_some() {
            return Ok(uri.clone());
        }

        let base = self.upstream.as_ref().ok_or_else(|| {
            PipelineError::UpstreamUnreachable(format!("no upstream destination for {uri}"))
        })?;

        let host = base.host_str().ok_or_else(|| {
            PipelineError::UpstreamUnreachable(format!("upstream {base} has no host"))
        })?;
        let authority = match base.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let prefix = base.path().trim_end_matches('/');
        let suffix = uri.path_and_query().map(PathAndQuery::as_str).unwrap_or("/");

        Uri::builder()
            .scheme(base.scheme())
            .authority(authority)
            .path_and_query(format!("{prefix}{suffix}"))
            .build()
            .map_err(|e| PipelineError::UpstreamUnreachable(e.to_string()))
    }

    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Incoming>, PipelineError> {
        let (mut parts, body) = request.into_parts();
        parts.uri = self.target_uri(&parts.uri)?;
        // The pooled client speaks HTTP/1.1 to upstreams regardless of the caller's version.
        parts.version = Version::HTTP_11;

        tracing::debug!(uri = %parts.uri, method = %parts.method, "Forwarding to upstream");

        self.client
            .request(Request::from_parts(parts, body))
            .await
            .map_err(|e| PipelineError::UpstreamUnreachable(e.to_string()))
    }
}
