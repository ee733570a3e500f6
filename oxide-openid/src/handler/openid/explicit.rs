use crate::authorize::{AuthorizeHandler, AuthorizeRequest, AuthorizeResponse};
use crate::context::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::primitives::storage::{OpenIdSessionStorage, StoredRequest};

use super::validator::PromptValidator;

/// The raw parameters persisted with an OpenID Connect session. Everything else is dropped.
pub const OIDC_PARAMETERS: [&str; 6] = [
    "grant_type",
    "max_age",
    "prompt",
    "acr_values",
    "id_token_hint",
    "nonce",
];

/// Binds an OpenID Connect session to the code of the authorization code flow.
///
/// Applies when `openid` is among the granted scopes and the response type is exactly `code`.
/// Hybrid flows also request a code but are handled elsewhere. The handler neither issues the
/// code nor marks a response type as handled; it relies on a code issuing handler that ran before
/// it in the chain and only stores the session that the token endpoint later needs to mint the
/// identity token.
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

/// Checks whether the explicit OpenID Connect handler applies to a request.
pub fn is_explicit_openid_request(request: &AuthorizeRequest) -> bool {
    request.granted_scopes().contains("openid") && request.response_types().exactly_one("code")
}

/// The checks preceding the persistence of the session, in their fixed order.
///
/// Shared with the asynchronous handler; prompt validation and persistence are left to the
/// caller since they involve collaborators.
pub fn check_explicit_preconditions(request: &AuthorizeRequest, response: &AuthorizeResponse) -> Result<()> {
    if response.code().is_empty() {
        return Err(Error::new(ErrorKind::Misconfiguration).with_debug(
            "The authorization code has not been issued yet, indicating a broken code configuration.",
        ));
    }

    // Required for the code, implicit and hybrid flow alike:
    // https://openid.net/specs/openid-connect-core-1_0.html#AuthRequest
    match request.parameters().get("redirect_uri") {
        Some(uri) if !uri.is_empty() => Ok(()),
        _ => Err(Error::new(ErrorKind::InvalidRequest)
            .with_hint("The 'redirect_uri' parameter is required when using OpenID Connect 1.0.")),
    }
}

/// Wrap a storage failure so that its cause only reaches operators.
pub fn storage_failure<E>(err: E) -> Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    Error::new(ErrorKind::ServerError)
        .with_debug(err.to_string())
        .with_cause(err)
}

impl<S: OpenIdSessionStorage, P: PromptValidator> AuthorizeHandler for OpenIdConnectExplicitHandler<S, P> {
    fn name(&self) -> &str {
        "OpenIdConnectExplicitHandler"
    }

    fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()> {
        if !is_explicit_openid_request(request) {
            return Ok(());
        }

        check_explicit_preconditions(request, response)?;
        self.validator.validate_prompt(ctx, request)?;

        let stored = StoredRequest::sanitized(request, &OIDC_PARAMETERS);
        self.storage
            .create_openid_session(ctx, response.code(), stored)
            .map_err(storage_failure)
    }
}
