use std::fmt;
use std::sync::Arc;

use super::{AuthorizeRequest, AuthorizeResponse};
use crate::context::Context;
use crate::error::Result;

/// A unit handling one grant type or response type variant at the authorization endpoint.
///
/// Handlers are constructed once and shared by all calls, possibly concurrently. They must not
/// keep any reference to the request, the response, or the context after `handle` returned.
///
/// ## Contract
///
/// - Each handler decides from the request alone whether it applies. A handler that does not
///   apply returns `Ok(())` without touching the response. Not applying is never an error.
/// - Handlers only add to the response. They never clear or replace what an earlier handler set,
///   the [`AuthorizeResponse`] enforces this.
/// - Errors use the most specific kind. A fault of the client is never reported as a server error
///   and a broken configuration is never blamed on the client.
/// - A failing handler ends the call. It is not invoked again.
///
/// [`AuthorizeResponse`]: struct.AuthorizeResponse.html
pub trait AuthorizeHandler: Send + Sync {
    /// A human readable identifier, for diagnostics only.
    fn name(&self) -> &str;

    /// Contribute to the response of a request, or reject the request.
    fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()>;
}

impl<'a, T: AuthorizeHandler + ?Sized> AuthorizeHandler for &'a T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()> {
        (**self).handle(ctx, request, response)
    }
}

impl<T: AuthorizeHandler + ?Sized> AuthorizeHandler for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()> {
        (**self).handle(ctx, request, response)
    }
}

impl<T: AuthorizeHandler + ?Sized> AuthorizeHandler for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn handle(
        &self, ctx: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse,
    ) -> Result<()> {
        (**self).handle(ctx, request, response)
    }
}

/// Provides the ordered handlers of the authorization endpoint.
///
/// The order is defined by the provider alone, the flow runs the handlers exactly in the order
/// returned. Handlers issuing a credential must come before those binding state to it.
pub trait AuthorizeHandlers {
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

/// A simple ordered list of authorization endpoint handlers.
///
/// The owning representation is an `Arc` so that the same handler instance can be part of several
/// lists, for example of different endpoints.
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
