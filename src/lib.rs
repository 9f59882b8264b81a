//! Identity-augmenting HTTP proxy library.
//!
//! Resolves a caller's `Authorization` credential into a `User-Uuid` claim,
//! forwards the request upstream with that claim and relays the response
//! back with the claim stripped.

pub mod config;
pub mod error;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;

pub use config::schema::ProxyConfig;
pub use error::PipelineError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{AugmentationPipeline, USER_UUID};
