//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::loader::ConfigError;
use crate::config::validation::ValidationError;
use crate::identity::EndpointConfig;

/// Location the proxy reads its configuration from when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "/opt/krakend/plugins/kauth.json";

/// Root configuration for the identity proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
    /// Identity-service endpoint URL.
    pub path: String,

    /// Listener configuration (bind address).
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Where origin-form requests are sent.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Identity lookup behaviour.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Minimal configuration pointing at the given identity endpoint.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            listener: ListenerConfig::default(),
            upstream: UpstreamConfig::default(),
            identity: IdentityConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// Typed identity endpoint.
    pub fn endpoint(&self) -> Result<EndpointConfig, ConfigError> {
        let url = Url::parse(&self.path).map_err(|e| {
            ConfigError::Validation(vec![ValidationError::new("path", e.to_string())])
        })?;
        Ok(EndpointConfig::new(url))
    }

    /// Typed upstream base, if configured.
    pub fn upstream_url(&self) -> Result<Option<Url>, ConfigError> {
        self.upstream
            .address
            .as_deref()
            .map(|address| {
                Url::parse(address).map_err(|e| {
                    ConfigError::Validation(vec![ValidationError::new(
                        "upstream.address",
                        e.to_string(),
                    )])
                })
            })
            .transpose()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream destination for requests that arrive in origin form.
///
/// Absolute-form requests always go to the destination they name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL (e.g., "http://127.0.0.1:3000").
    pub address: Option<String>,
}

/// What to do when the caller presented a credential but no claim could be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Fail the request with a server error and never contact upstream.
    #[default]
    Reject,

    /// Log the failure and forward the request without `User-Uuid`.
    Forward,
}

/// Identity lookup configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Failure policy for identity resolution.
    pub on_failure: FailurePolicy,

    /// Transport timeout for identity calls in seconds (none by default).
    pub timeout_secs: Option<u64>,
}

impl IdentityConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
