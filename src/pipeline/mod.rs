//! Per-request identity augmentation pipeline.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → handler.rs (strip claim header, extract credential, decide)
//!     → augmenter.rs (resolve identity, set User-Uuid)   [credential present]
//!     → forwarder.rs (one request to the original destination)
//!     → relay.rs (status + headers + streamed body, User-Uuid removed)
//!     → caller
//! ```
//!
//! # Design Decisions
//! - Identity failures reject the request unless `forward` is configured
//! - No state is shared between requests beyond read-only `Arc`s
//! - Dropping the handler future cancels in-flight outbound calls

use axum::http::HeaderName;

pub mod augmenter;
pub mod forwarder;
pub mod handler;
pub mod relay;

pub use augmenter::{AugmentFailure, AugmentedRequest, RequestAugmenter};
pub use forwarder::UpstreamForwarder;
pub use handler::AugmentationPipeline;
pub use relay::ResponseRelay;

/// Header carrying the resolved claim to the upstream service.
pub const USER_UUID: HeaderName = HeaderName::from_static("user-uuid");
