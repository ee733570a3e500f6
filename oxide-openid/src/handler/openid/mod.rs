//! Handlers of the OpenID Connect flows.
//!
//! Identity tokens themselves are minted at the token endpoint. At the authorization endpoint the
//! handlers of this module only validate the OpenID Connect specific parameters and remember
//! what is needed later, bound to the issued authorization code.

mod explicit;
mod validator;

pub use self::explicit::{
    check_explicit_preconditions, is_explicit_openid_request, storage_failure,
    OpenIdConnectExplicitHandler, OIDC_PARAMETERS,
};
pub use self::validator::{OpenIdRequestValidator, PromptValidator};
