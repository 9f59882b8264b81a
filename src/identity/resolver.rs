//! Identity lookup against the configured identity service.
//!
//! # Responsibilities
//! - Issue exactly one GET per credential
//! - Map transport, status and body failures onto the pipeline taxonomy
//! - Extract the claim from the first result record

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::error::PipelineError;
use crate::identity::types::{Credential, EndpointConfig, IdentityClaim, IdentityQueryResult};
use crate::observability::metrics;

/// Resolves a bearer credential into an [`IdentityClaim`].
#[derive(Clone)]
pub struct IdentityResolver {
    client: reqwest::Client,
    endpoint: Arc<EndpointConfig>,
}

impl IdentityResolver {
    pub fn new(client: reqwest::Client, endpoint: Arc<EndpointConfig>) -> Self {
        Self { client, endpoint }
    }

    /// Build the transport used for identity lookups.
    ///
    /// The resolver itself imposes no deadline; `timeout` is applied by the
    /// client to every call when set.
    pub fn build_client(timeout: Option<Duration>) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    pub async fn resolve(&self, credential: &Credential) -> Result<IdentityClaim, PipelineError> {
        let outcome = self.lookup(credential).await;
        metrics::record_identity_lookup(match &outcome {
            Ok(_) => "resolved",
            Err(e) => e.kind(),
        });
        outcome
    }

    async fn lookup(&self, credential: &Credential) -> Result<IdentityClaim, PipelineError> {
        let response = self
            .client
            .get(self.endpoint.url().clone())
            .header(AUTHORIZATION, credential.header_value().clone())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| PipelineError::IdentityUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::IdentityUnavailable(format!(
                "identity endpoint answered {status}"
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::IdentityUnavailable(e.to_string()))?;

        let result: IdentityQueryResult = serde_json::from_slice(&body)
            .map_err(|e| PipelineError::IdentityMalformed(e.to_string()))?;

        result.into_claim()
    }
}
