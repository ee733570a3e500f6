use std::sync::Arc;

use log::{debug, warn};

use super::{AuthorizeHandler, AuthorizeHandlers, AuthorizeRequest, AuthorizeResponse};
use crate::context::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::primitives::response_type::ResponseMode;
use crate::primitives::session::Session;

/// Runs authorization requests through an ordered chain of handlers.
///
/// The flow holds no per-call state and can be shared between concurrent calls. Within a call the
/// handlers run strictly one after another, each seeing what the previous ones added to the
/// response.
#[derive(Clone, Debug)]
pub struct AuthorizeFlow<H> {
    handlers: H,
}

impl<H: AuthorizeHandlers> AuthorizeFlow<H> {
    /// Create a flow running the handlers of a provider.
    pub fn new(handlers: H) -> Self {
        AuthorizeFlow { handlers }
    }

    /// The provider of handlers.
    pub fn handlers(&self) -> &H {
        &self.handlers
    }

    /// Produce the response to an authorization request.
    ///
    /// The session is attached to the request before any handler runs and stays attached after
    /// the call, where the caller can retrieve it with [`AuthorizeRequest::take_session`].
    ///
    /// The first handler to fail ends the call and its error is returned unchanged. After all
    /// handlers succeeded, the flow verifies that every requested response type was handled and
    /// that token carrying responses are not delivered in the query component.
    ///
    /// [`AuthorizeRequest::take_session`]: struct.AuthorizeRequest.html#method.take_session
    pub fn produce_authorization_response(
        &self, ctx: &Context, request: &mut AuthorizeRequest, session: Box<dyn Session>,
    ) -> Result<AuthorizeResponse> {
        let handlers = self.handlers.authorize_endpoint_handlers(ctx);
        debug!(
            "authorization request of client '{}' (trace {}): running {} handlers",
            request.client().client_id,
            ctx.trace_id().unwrap_or("-"),
            handlers.len(),
        );

        let result = run(handlers, ctx, request, session);

        match &result {
            Ok(response) => debug!(
                "authorization request of client '{}' (trace {}) handled with {} response parameters",
                request.client().client_id,
                ctx.trace_id().unwrap_or("-"),
                response.parameters().len(),
            ),
            Err(err) if err.kind().is_server_fault() => warn!(
                "authorization request of client '{}' (trace {}) failed: {} ({})",
                request.client().client_id,
                ctx.trace_id().unwrap_or("-"),
                err,
                err.debug().unwrap_or("no debug information"),
            ),
            Err(err) => debug!(
                "authorization request of client '{}' (trace {}) rejected: {}",
                request.client().client_id,
                ctx.trace_id().unwrap_or("-"),
                err,
            ),
        }

        result
    }
}

fn run(
    handlers: &[Arc<dyn AuthorizeHandler>], ctx: &Context, request: &mut AuthorizeRequest,
    session: Box<dyn Session>,
) -> Result<AuthorizeResponse> {
    let mut response = AuthorizeResponse::new();
    request.set_session(session);

    for handler in handlers {
        handler.handle(ctx, request, &mut response)?;
    }

    verify_response(request, &response)?;
    Ok(response)
}

/// The invariants checked after the chain completed.
///
/// Shared with the asynchronous flow so both enforce exactly the same rules.
pub fn verify_response(request: &AuthorizeRequest, response: &AuthorizeResponse) -> Result<()> {
    let types = request.response_types();
    let all_handled = !types.is_empty() && types.iter().all(|t| response.is_response_type_handled(t));
    if !all_handled {
        return Err(Error::new(ErrorKind::UnsupportedResponseType));
    }

    if request.default_response_mode() == ResponseMode::Fragment
        && request.response_mode() == ResponseMode::Query
    {
        return Err(
            Error::new(ErrorKind::UnsupportedResponseMode).with_hint(format!(
                "Insecure response_mode '{}' for the response_type '{}'.",
                request.response_mode(),
                types,
            )),
        );
    }

    Ok(())
}
