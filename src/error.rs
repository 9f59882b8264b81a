//! Error taxonomy for the per-request pipeline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors that can occur while handling one proxied request.
///
/// Configuration problems are reported separately by
/// [`ConfigError`](crate::config::ConfigError) and never reach a request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The identity endpoint could not be reached or answered with a non-success status.
    #[error("identity service unavailable: {0}")]
    IdentityUnavailable(String),

    /// The identity response body did not have the expected shape.
    #[error("identity response malformed: {0}")]
    IdentityMalformed(String),

    /// The identity service answered with an empty result set.
    #[error("identity service returned no results")]
    IdentityEmpty,

    /// The upstream request failed at the transport level.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The upstream body could not be fully copied to the caller.
    #[error("relay body copy failed: {0}")]
    RelayIo(String),
}

impl PipelineError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::IdentityUnavailable(_) => "identity_unavailable",
            PipelineError::IdentityMalformed(_) => "identity_malformed",
            PipelineError::IdentityEmpty => "identity_empty",
            PipelineError::UpstreamUnreachable(_) => "upstream_unreachable",
            PipelineError::RelayIo(_) => "relay_io",
        }
    }

    /// True for failures produced while resolving the caller's identity.
    pub fn is_identity_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::IdentityUnavailable(_)
                | PipelineError::IdentityMalformed(_)
                | PipelineError::IdentityEmpty
        )
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
