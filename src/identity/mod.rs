//! Identity resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Authorization header
//!     → Credential (opaque, forwarded verbatim)
//!     → resolver.rs (one GET to the identity endpoint)
//!     → IdentityQueryResult (JSON body)
//!     → IdentityClaim (data.result[0].uuid)
//! ```
//!
//! # Design Decisions
//! - The identity service is trusted as-is; no token validation here
//! - No caching and no retries; every lookup is independent
//! - EndpointConfig is built once at startup and shared read-only

pub mod resolver;
pub mod types;

pub use resolver::IdentityResolver;
pub use types::{Credential, EndpointConfig, IdentityClaim, IdentityQueryResult, IdentityRecord};
