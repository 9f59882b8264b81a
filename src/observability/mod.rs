//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline and host produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID is a field on every per-request event
//! - Metric updates are no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
