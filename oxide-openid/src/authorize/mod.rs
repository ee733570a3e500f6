//! The authorization endpoint: request and response carriers, the handler capability, and the
//! flow running the handler chain.
//!
//! A call goes through the following steps:
//!
//! 1. The caller parses the request, binds it to a registered client, negotiates the granted
//!    scope, and assembles an [`AuthorizeRequest`].
//! 2. [`AuthorizeFlow::produce_authorization_response`] attaches the session of the resource
//!    owner and runs every handler of its [`AuthorizeHandlers`] provider in order.
//! 3. The flow checks that the chain covered all requested response types and that the response
//!    mode is safe for them, then returns the [`AuthorizeResponse`].
//!
//! The caller then encodes the response parameters into the redirect according to the request's
//! response mode, or renders the returned error.
//!
//! [`AuthorizeRequest`]: struct.AuthorizeRequest.html
//! [`AuthorizeResponse`]: struct.AuthorizeResponse.html
//! [`AuthorizeHandlers`]: trait.AuthorizeHandlers.html
//! [`AuthorizeFlow::produce_authorization_response`]: struct.AuthorizeFlow.html#method.produce_authorization_response

mod flow;
mod handler;
mod request;
mod response;

#[cfg(test)]
mod tests;

pub use self::flow::{verify_response, AuthorizeFlow};
pub use self::handler::{AuthorizeHandler, AuthorizeHandlers, HandlerList};
pub use self::request::AuthorizeRequest;
pub use self::response::AuthorizeResponse;
