//! Asynchronous versions of the provided handlers.
//!
//! The code issuing handler of the core crate does its work synchronously and is used as is.
use async_trait::async_trait;
use oxide_openid::authorize::{AuthorizeRequest, AuthorizeResponse};
use oxide_openid::context::Context;
use oxide_openid::error::Result;
use oxide_openid::handler::openid::{
    check_explicit_preconditions, is_explicit_openid_request, storage_failure, OIDC_PARAMETERS,
};
use oxide_openid::primitives::storage::StoredRequest;

use crate::authorize::AuthorizeHandler;
use crate::primitives::{OpenIdSessionStorage, PromptValidator};

/// Binds an OpenID Connect session to the code of the authorization code flow.
///
/// Applies, checks and persists exactly like its synchronous counterpart in
/// `oxide_openid::handler::openid`, but awaits its storage and validator.
pub struct OpenIdConnectExplicitHandler<S, P> {
    storage: S,
    validator: P,
}

impl<S: OpenIdSessionStorage, P: PromptValidator> OpenIdConnectExplicitHandler<S, P> {
    /// Create the handler from its session storage and prompt validator.
    pub fn new(storage: S, validator: P) -> Self {
        OpenIdConnectExplicitHandler { storage, validator }
    }
}

#[async_trait]
impl<S: OpenIdSessionStorage, P: PromptValidator> AuthorizeHandler for OpenIdConnectExplicitHandler<S, P> {
    fn name(&self) -> &str {
        "OpenIdConnectExplicitHandler"
    }

    async fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()> {
        if !is_explicit_openid_request(request) {
            return Ok(());
        }

        check_explicit_preconditions(request, response)?;
        self.validator.validate_prompt(ctx, request).await?;

        let stored = StoredRequest::sanitized(request, &OIDC_PARAMETERS);
        self.storage
            .create_openid_session(ctx, response.code(), stored)
            .await
            .map_err(storage_failure)
    }
}
