//! Request augmentation with the resolved identity claim.

use axum::http::Request;

use crate::error::PipelineError;
use crate::identity::{Credential, IdentityClaim, IdentityResolver};
use crate::pipeline::USER_UUID;

/// A request that carries the `User-Uuid` claim header.
#[derive(Debug)]
pub struct AugmentedRequest<B> {
    request: Request<B>,
    claim: IdentityClaim,
}

impl<B> AugmentedRequest<B> {
    pub fn claim(&self) -> &IdentityClaim {
        &self.claim
    }

    pub fn into_request(self) -> Request<B> {
        self.request
    }
}

/// Augmentation failed; the request is handed back untouched.
#[derive(Debug)]
pub struct AugmentFailure<B> {
    pub error: PipelineError,
    pub request: Request<B>,
}

/// Resolves the caller's identity and attaches it to the outbound request.
#[derive(Clone)]
pub struct RequestAugmenter {
    resolver: IdentityResolver,
}

impl RequestAugmenter {
    pub fn new(resolver: IdentityResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// The request is only modified once resolution has succeeded.
    pub async fn augment<B>(
        &self,
        mut request: Request<B>,
        credential: &Credential,
    ) -> Result<AugmentedRequest<B>, AugmentFailure<B>> {
        match self.resolver.resolve(credential).await {
            Ok(claim) => {
                request
                    .headers_mut()
                    .insert(USER_UUID, claim.header_value().clone());
                Ok(AugmentedRequest { request, claim })
            }
            Err(error) => Err(AugmentFailure { error, request }),
        }
    }
}
