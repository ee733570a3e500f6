//! Issues authorization codes for the explicit (authorization code) grant.
use chrono::Utc;
use url::{Host, Url};

use crate::authorize::{AuthorizeHandler, AuthorizeRequest, AuthorizeResponse};
use crate::config::Config;
use crate::context::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::primitives::generator::CodeGenerator;
use crate::primitives::session::TokenKind;
use crate::primitives::storage::{AuthorizeCodeStorage, StoredRequest};

/// Raw parameters bound to an authorization code. Everything else is dropped.
const CODE_PARAMETERS: [&str; 7] = [
    "grant_type",
    "redirect_uri",
    "state",
    "scope",
    "nonce",
    "code_challenge",
    "code_challenge_method",
];

/// Issues the code of the authorization code grant.
///
/// Applies to requests for exactly the `code` response type. The handler generates a code, binds
/// a sanitized snapshot of the request to it in storage, and responds with the `code`, `state`
/// and `scope` parameters. It has to run before any handler binding further state to the code.
pub struct AuthorizeExplicitGrantHandler<G, S> {
    generator: G,
    storage: S,
    config: Config,
}

impl<G: CodeGenerator, S: AuthorizeCodeStorage> AuthorizeExplicitGrantHandler<G, S> {
    /// Create a handler issuing codes from `generator` into `storage`.
    pub fn new(config: &Config, generator: G, storage: S) -> Self {
        AuthorizeExplicitGrantHandler {
            generator,
            storage,
            config: config.clone(),
        }
    }

    fn issue(&self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse) -> Result<()> {
        let code = self.generator.generate().map_err(|err| {
            Error::new(ErrorKind::ServerError)
                .with_debug(err.to_string())
                .with_cause(err)
        })?;

        let expires_at = Utc::now() + self.config.authorize_code_lifespan();
        if let Some(session) = request.session_mut() {
            session.set_expires_at(TokenKind::AuthorizeCode, expires_at);
        }

        // A conflicting handler must fail before anything is persisted.
        response.set_code(code.clone())?;
        response.add_parameter("code", code.clone())?;
        if let Some(state) = request.state() {
            response.add_parameter("state", state)?;
        }
        response.add_parameter("scope", request.granted_scopes().to_string())?;

        let stored = StoredRequest::sanitized(request, &CODE_PARAMETERS);
        self.storage
            .create_authorize_code_session(ctx, &code, stored)
            .map_err(|err| {
                Error::new(ErrorKind::ServerError)
                    .with_debug(err.to_string())
                    .with_cause(err)
            })?;

        response.set_response_type_handled("code");
        Ok(())
    }
}

impl<G: CodeGenerator, S: AuthorizeCodeStorage> AuthorizeHandler for AuthorizeExplicitGrantHandler<G, S> {
    fn name(&self) -> &str {
        "AuthorizeExplicitGrantHandler"
    }

    fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()> {
        if !request.response_types().exactly_one("code") {
            return Ok(());
        }

        if let Some(redirect_uri) = request.parameters().get("redirect_uri") {
            check_redirect_uri(redirect_uri)?;
        }

        self.issue(ctx, request, response)
    }
}

/// Codes are not sent over plain http, except to loopback addresses.
fn check_redirect_uri(redirect_uri: &str) -> Result<()> {
    let url = Url::parse(redirect_uri).map_err(|err| {
        Error::new(ErrorKind::InvalidRequest)
            .with_hint("The 'redirect_uri' parameter is malformed.")
            .with_cause(err)
    })?;

    if is_secure(&url) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidRequest).with_hint(
            "Redirect URL is using an insecure protocol, http is only allowed for hosts with suffix 'localhost', for example: http://myapp.localhost/.",
        ))
    }
}

/// Custom schemes of native applications count as secure, only plain http is restricted.
pub(crate) fn is_secure(url: &Url) -> bool {
    url.scheme() != "http" || is_loopback(url)
}

/// If the url points at the machine of the user agent.
pub(crate) fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost" || domain.ends_with(".localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}
