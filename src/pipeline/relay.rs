//! Response relay from upstream to the caller.
//!
//! # Responsibilities
//! - Copy status and every header value (multi-valued headers preserved)
//! - Remove the claim header before anything leaves the boundary
//! - Stream the body through without buffering
//!
//! # Design Decisions
//! - Status and headers are fixed before the first body byte
//! - A body failure mid-stream is logged and ends the stream; bytes already
//!   sent cannot be retracted

use axum::{
    body::{Body, Bytes, HttpBody},
    http::{HeaderMap, Response},
    BoxError,
};
use futures_util::StreamExt;

use crate::error::PipelineError;
use crate::observability::metrics;
use crate::pipeline::USER_UUID;

/// Copies an upstream response onto the caller-facing response.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseRelay;

impl ResponseRelay {
    pub fn relay<B>(&self, upstream: Response<B>) -> Response<Body>
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = upstream.into_parts();

        let mut headers = HeaderMap::with_capacity(parts.headers.len());
        for (name, value) in parts.headers.iter() {
            headers.append(name.clone(), value.clone());
        }
        if headers.remove(USER_UUID).is_some() {
            tracing::debug!("Removed User-Uuid from upstream response headers");
        }

        let body = Body::new(body).into_data_stream().map(|chunk| {
            chunk.map_err(|e| {
                let err = PipelineError::RelayIo(e.to_string());
                metrics::record_relay_failure();
                tracing::error!(error = %err, "Upstream body failed mid-stream, terminating relay");
                err
            })
        });

        let mut response = Response::new(Body::from_stream(body));
        *response.status_mut() = parts.status;
        *response.headers_mut() = headers;
        response
    }
}
