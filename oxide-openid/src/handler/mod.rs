//! Handlers provided for the authorization endpoint.
//!
//! - [`AuthorizeExplicitGrantHandler`] issues the code of the authorization code grant.
//! - [`OpenIdConnectExplicitHandler`] binds an OpenID Connect session to that code.
//!
//! Other grant and flow variants (implicit, hybrid, PKCE, ..) are implemented against the same
//! [`AuthorizeHandler`] trait and can be added to a chain next to these.
//!
//! [`AuthorizeExplicitGrantHandler`]: explicit/struct.AuthorizeExplicitGrantHandler.html
//! [`OpenIdConnectExplicitHandler`]: openid/struct.OpenIdConnectExplicitHandler.html
//! [`AuthorizeHandler`]: ../authorize/trait.AuthorizeHandler.html

pub mod explicit;
pub mod openid;

pub use self::explicit::AuthorizeExplicitGrantHandler;
pub use self::openid::{OpenIdConnectExplicitHandler, OpenIdRequestValidator, PromptValidator};
