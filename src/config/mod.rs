//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON, or TOML by extension)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → EndpointConfig shared via Arc with every request handler
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - Every section except the identity `path` has defaults
//! - Validation separates syntactic (serde) from semantic checks
//! - Any configuration problem is fatal at startup, never per request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, parse_config, ConfigError, ConfigFormat, ConfigOverrides};
pub use schema::{
    FailurePolicy, IdentityConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, TimeoutConfig,
    UpstreamConfig, DEFAULT_CONFIG_PATH,
};
pub use validation::ValidationError;
