//! Ready-made handler chains.
//!
//! Assembling a chain by hand is easy to get wrong: the OpenID Connect handler only binds its
//! session to a code that an earlier handler issued. The functions here return chains whose order
//! is known to be correct.
use std::sync::Arc;

use crate::authorize::{AuthorizeFlow, HandlerList};
use crate::config::Config;
use crate::handler::explicit::AuthorizeExplicitGrantHandler;
use crate::handler::openid::{OpenIdConnectExplicitHandler, OpenIdRequestValidator};
use crate::primitives::generator::RandomGenerator;
use crate::primitives::storage::{AuthorizeCodeStorage, OpenIdSessionStorage};

/// The handlers of the OpenID Connect authorization code flow, in order.
///
/// Codes are drawn from the operating system's random source and both the code session and the
/// OpenID Connect session are persisted to `store`.
pub fn openid_explicit_handlers<S>(config: &Config, store: Arc<S>) -> HandlerList
where
    S: AuthorizeCodeStorage + OpenIdSessionStorage + 'static,
{
    let mut handlers = HandlerList::new();
    handlers.push(AuthorizeExplicitGrantHandler::new(
        config,
        RandomGenerator::new(config.authorize_code_length),
        store.clone(),
    ));
    handlers.push(OpenIdConnectExplicitHandler::new(
        store,
        OpenIdRequestValidator::new(config),
    ));
    handlers
}

/// A flow for the OpenID Connect authorization code flow.
///
/// Plain OAuth2 code requests, without the `openid` scope, are served by the same flow.
pub fn openid_explicit<S>(config: &Config, store: Arc<S>) -> AuthorizeFlow<HandlerList>
where
    S: AuthorizeCodeStorage + OpenIdSessionStorage + 'static,
{
    AuthorizeFlow::new(openid_explicit_handlers(config, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::storage::MemoryStore;

    #[test]
    fn issuer_runs_first() {
        let handlers = openid_explicit_handlers(&Config::default(), Arc::new(MemoryStore::new()));
        assert_eq!(
            format!("{:?}", handlers),
            r#"["AuthorizeExplicitGrantHandler", "OpenIdConnectExplicitHandler"]"#
        );
    }
}
