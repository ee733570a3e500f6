//! The authorization endpoint with asynchronous handlers.
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use oxide_openid::authorize::{verify_response, AuthorizeRequest, AuthorizeResponse};
use oxide_openid::context::Context;
use oxide_openid::error::Result;
use oxide_openid::primitives::session::Session;

/// A unit handling one grant type or response type variant at the authorization endpoint.
///
/// The contract is the one of `oxide_openid::AuthorizeHandler`. Every synchronous handler is
/// also an asynchronous one.
#[async_trait]
pub trait AuthorizeHandler: Send + Sync {
    /// A human readable identifier, for diagnostics only.
    fn name(&self) -> &str;

    /// Contribute to the response of a request, or reject the request.
    async fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()>;
}

#[async_trait]
impl<T> AuthorizeHandler for T
where
    T: oxide_openid::AuthorizeHandler + ?Sized,
{
    fn name(&self) -> &str {
        oxide_openid::AuthorizeHandler::name(self)
    }

    async fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()> {
        oxide_openid::AuthorizeHandler::handle(self, ctx, request, response)
    }
}

/// Provides the ordered handlers of the authorization endpoint.
pub trait AuthorizeHandlers: Send + Sync {
    /// The handlers to run for a call.
    fn authorize_endpoint_handlers(&self, ctx: &Context) -> &[Arc<dyn AuthorizeHandler>];
}

impl AuthorizeHandlers for Vec<Arc<dyn AuthorizeHandler>> {
    fn authorize_endpoint_handlers(&self, _: &Context) -> &[Arc<dyn AuthorizeHandler>] {
        self.as_slice()
    }
}

impl<'a, T: AuthorizeHandlers + ?Sized> AuthorizeHandlers for &'a T {
    fn authorize_endpoint_handlers(&self, ctx: &Context) -> &[Arc<dyn AuthorizeHandler>] {
        (**self).authorize_endpoint_handlers(ctx)
    }
}

impl<T: AuthorizeHandlers + ?Sized> AuthorizeHandlers for Arc<T> {
    fn authorize_endpoint_handlers(&self, ctx: &Context) -> &[Arc<dyn AuthorizeHandler>] {
        (**self).authorize_endpoint_handlers(ctx)
    }
}

/// An ordered list of asynchronous handlers.
#[derive(Clone, Default)]
pub struct HandlerList {
    handlers: Vec<Arc<dyn AuthorizeHandler>>,
}

impl HandlerList {
    /// Create an empty list.
    pub fn new() -> Self {
        HandlerList { handlers: vec![] }
    }

    /// Append a handler, it runs after all handlers pushed before.
    ///
    /// Accepts synchronous handlers of the core crate as well.
    pub fn push<H>(&mut self, handler: H)
    where
        H: AuthorizeHandler + 'static,
    {
        self.handlers.push(Arc::new(handler))
    }

    /// Append an already shared handler.
    pub fn push_shared(&mut self, handler: Arc<dyn AuthorizeHandler>) {
        self.handlers.push(handler)
    }

    /// Number of handlers in the list.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// If the list has no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl AuthorizeHandlers for HandlerList {
    fn authorize_endpoint_handlers(&self, _: &Context) -> &[Arc<dyn AuthorizeHandler>] {
        &self.handlers
    }
}

impl fmt::Debug for HandlerList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|handler| handler.name()))
            .finish()
    }
}

/// Runs authorization requests through an ordered chain of asynchronous handlers.
///
/// Handlers are awaited one after another, never concurrently.
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
    /// Behaves exactly like `oxide_openid::AuthorizeFlow::produce_authorization_response`.
    pub async fn produce_authorization_response(
        &self, ctx: &Context, request: &mut AuthorizeRequest, session: Box<dyn Session>,
    ) -> Result<AuthorizeResponse> {
        let handlers = self.handlers.authorize_endpoint_handlers(ctx);
        debug!(
            "authorization request of client '{}' (trace {}): running {} async handlers",
            request.client().client_id,
            ctx.trace_id().unwrap_or("-"),
            handlers.len(),
        );

        let result = run(handlers, ctx, request, session).await;

        match &result {
            Ok(_) => debug!(
                "authorization request of client '{}' (trace {}) handled",
                request.client().client_id,
                ctx.trace_id().unwrap_or("-"),
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

async fn run(
    handlers: &[Arc<dyn AuthorizeHandler>], ctx: &Context, request: &mut AuthorizeRequest,
    session: Box<dyn Session>,
) -> Result<AuthorizeResponse> {
    let mut response = AuthorizeResponse::new();
    request.set_session(session);

    for handler in handlers {
        handler.handle(ctx, request, &mut response).await?;
    }

    verify_response(request, &response)?;
    Ok(response)
}
