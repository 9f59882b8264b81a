//! Identity data types shared by the resolver and the pipeline.

use std::fmt;

use axum::http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use url::Url;

use crate::error::PipelineError;

/// Validated identity-service endpoint.
///
/// Built once at startup from [`ProxyConfig`](crate::config::ProxyConfig)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    url: Url,
}

impl EndpointConfig {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// Bearer credential taken from the inbound `Authorization` header.
///
/// Kept as the raw header value so it reaches the identity service verbatim.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(HeaderValue);

impl Credential {
    /// Extract the credential from request headers.
    ///
    /// A missing or empty `Authorization` header yields `None`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(AUTHORIZATION)
            .filter(|value| !value.is_empty())
            .map(|value| Self(value.clone()))
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

/// Subject identifier resolved from the identity service.
///
/// Always non-empty and always usable as a header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaim {
    value: String,
    header: HeaderValue,
}

impl IdentityClaim {
    pub fn new(value: impl Into<String>) -> Result<Self, PipelineError> {
        let value = value.into();
        if value.is_empty() {
            return Err(PipelineError::IdentityMalformed("empty uuid".to_string()));
        }
        let header = HeaderValue::from_str(&value).map_err(|_| {
            PipelineError::IdentityMalformed(format!("uuid {value:?} is not a valid header value"))
        })?;
        Ok(Self { value, header })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

impl fmt::Display for IdentityClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Raw body returned by the identity service.
///
/// ```json
/// { "data": { "result": [ { "id": "...", "uuid": "..." } ] } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityQueryResult {
    #[serde(default)]
    pub data: Option<IdentityData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityData {
    #[serde(default)]
    pub result: Option<Vec<IdentityRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub uuid: Option<String>,
}

impl IdentityQueryResult {
    /// Records in response order. Absent `data` or `result` reads as empty.
    pub fn records(&self) -> &[IdentityRecord] {
        self.data
            .as_ref()
            .and_then(|data| data.result.as_deref())
            .unwrap_or_default()
    }

    /// Claim carried by the first record. Later records are ignored.
    pub fn into_claim(self) -> Result<IdentityClaim, PipelineError> {
        let first = self.records().first().ok_or(PipelineError::IdentityEmpty)?;
        match first.uuid.as_deref() {
            Some(uuid) => IdentityClaim::new(uuid),
            None => Err(PipelineError::IdentityMalformed(
                "first result record has no uuid".to_string(),
            )),
        }
    }
}
