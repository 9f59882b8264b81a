//! The externally exposed request handler.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, Response},
    response::IntoResponse,
};

use crate::config::validation::validate_config;
use crate::config::{ConfigError, FailurePolicy, ProxyConfig};
use crate::error::PipelineError;
use crate::http::request::request_id;
use crate::identity::{Credential, IdentityResolver};
use crate::observability::metrics;
use crate::pipeline::{AugmentFailure, RequestAugmenter, ResponseRelay, UpstreamForwarder, USER_UUID};

/// Orchestrates identity augmentation, forwarding and relay for one request
/// at a time. Cloning is cheap; all clones share the same clients and endpoint.
#[derive(Clone)]
pub struct AugmentationPipeline {
    augmenter: RequestAugmenter,
    forwarder: UpstreamForwarder,
    relay: ResponseRelay,
    on_failure: FailurePolicy,
}

impl AugmentationPipeline {
    pub fn new(augmenter: RequestAugmenter, forwarder: UpstreamForwarder, on_failure: FailurePolicy) -> Self {
        Self {
            augmenter,
            forwarder,
            relay: ResponseRelay,
            on_failure,
        }
    }

    /// Build the pipeline and its HTTP clients from validated configuration.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let endpoint = Arc::new(config.endpoint()?);
        let client = IdentityResolver::build_client(config.identity.timeout())
            .map_err(ConfigError::Transport)?;
        let resolver = IdentityResolver::new(client, endpoint);
        let forwarder = UpstreamForwarder::new(config.upstream_url()?);

        Ok(Self::new(RequestAugmenter::new(resolver), forwarder, config.identity.on_failure))
    }

    /// Handle one inbound request. Failures become a `500` carrying the error text.
    pub async fn handle(&self, mut request: Request<Body>) -> Response<Body> {
        let start = Instant::now();
        let request_id = request_id(&request).to_string();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        tracing::debug!(request_id = %request_id, method = %method, path = %path, "Handling request");

        // A caller must never be able to choose its own claim.
        if request.headers_mut().remove(USER_UUID).is_some() {
            tracing::warn!(request_id = %request_id, "Dropped caller-supplied User-Uuid header");
        }

        let (outcome, result) = match Credential::from_headers(request.headers()) {
            None => {
                tracing::info!(
                    request_id = %request_id,
                    "Request has no bearer token and will be forwarded directly"
                );
                ("direct", self.forward_and_relay(request).await)
            }
            Some(credential) => {
                tracing::info!(
                    request_id = %request_id,
                    endpoint = %self.augmenter.resolver().endpoint().url(),
                    "Request has a bearer token, resolving User-Uuid"
                );
                match self.augmenter.augment(request, &credential).await {
                    Ok(augmented) => {
                        tracing::info!(
                            request_id = %request_id,
                            claim = %augmented.claim(),
                            "Forwarding request with User-Uuid"
                        );
                        ("augmented", self.forward_and_relay(augmented.into_request()).await)
                    }
                    Err(AugmentFailure { error, request }) => match self.on_failure {
                        FailurePolicy::Reject => {
                            tracing::error!(
                                request_id = %request_id,
                                kind = error.kind(),
                                error = %error,
                                "Identity resolution failed, rejecting request"
                            );
                            ("rejected", Err(error))
                        }
                        FailurePolicy::Forward => {
                            tracing::warn!(
                                request_id = %request_id,
                                kind = error.kind(),
                                error = %error,
                                "Identity resolution failed, forwarding without User-Uuid"
                            );
                            ("unaugmented", self.forward_and_relay(request).await)
                        }
                    },
                }
            }
        };

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                if !error.is_identity_failure() {
                    tracing::error!(
                        request_id = %request_id,
                        kind = error.kind(),
                        error = %error,
                        "Request failed"
                    );
                }
                error.into_response()
            }
        };

        let status = response.status();
        metrics::record_request(outcome, status.as_u16(), start);
        tracing::info!(
            request_id = %request_id,
            outcome,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        response
    }

    async fn forward_and_relay(&self, request: Request<Body>) -> Result<Response<Body>, PipelineError> {
        let upstream = self.forwarder.forward(request).await?;
        Ok(self.relay.relay(upstream))
    }
}
