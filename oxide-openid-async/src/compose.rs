//! Ready-made asynchronous handler chains.
use oxide_openid::config::Config;
use oxide_openid::handler::explicit::AuthorizeExplicitGrantHandler;
use oxide_openid::handler::openid::OpenIdRequestValidator;
use oxide_openid::primitives::generator::RandomGenerator;
use oxide_openid::primitives::storage::AuthorizeCodeStorage;

use crate::authorize::{AuthorizeFlow, HandlerList};
use crate::handler::OpenIdConnectExplicitHandler;
use crate::primitives::OpenIdSessionStorage;

/// A flow for the OpenID Connect authorization code flow.
///
/// Codes are issued synchronously into `codes`, the OpenID Connect session is awaited on
/// `sessions`.
pub fn openid_explicit<C, S>(config: &Config, codes: C, sessions: S) -> AuthorizeFlow<HandlerList>
where
    C: AuthorizeCodeStorage + 'static,
    S: OpenIdSessionStorage + 'static,
{
    let mut handlers = HandlerList::new();
    handlers.push(AuthorizeExplicitGrantHandler::new(
        config,
        RandomGenerator::new(config.authorize_code_length),
        codes,
    ));
    handlers.push(OpenIdConnectExplicitHandler::new(
        sessions,
        OpenIdRequestValidator::new(config),
    ));
    AuthorizeFlow::new(handlers)
}
