//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all route)
//!     → request.rs (request ID assigned when absent)
//!     → pipeline::AugmentationPipeline::handle
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
