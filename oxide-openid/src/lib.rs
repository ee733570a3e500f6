//! # oxide-openid
//!
//! The authorization endpoint core of an OAuth2 / OpenID Connect server.
//!
//! ## About
//!
//! An authorization request that has already been parsed, bound to a registered client and
//! negotiated to a granted scope is turned into a protocol compliant response by running it
//! through an ordered chain of [`AuthorizeHandler`]s. Each handler is responsible for exactly one
//! grant type or response type variant and decides on its own whether it applies to a request.
//! Handlers communicate only through the [`AuthorizeResponse`] they accumulate into, in the order
//! in which they were configured.
//!
//! After the chain ran, the [`AuthorizeFlow`] enforces the invariants no single handler can: every
//! requested response type must have been handled by someone, and responses carrying tokens must
//! not be delivered in the query component of the redirect.
//!
//! ## Configuring a chain
//!
//! Handlers that issue a credential must come before handlers binding additional state to that
//! credential. The engine never reorders the list it is given. The [`compose`] module contains the
//! canonical chain for the OpenID Connect authorization code flow:
//!
//! ```
//! # use std::sync::Arc;
//! use oxide_openid::{compose, Config, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::new());
//! let flow = compose::openid_explicit(&Config::default(), store);
//! # let _ = flow;
//! ```
//!
//! Custom handlers implement [`AuthorizeHandler`] and can be mixed freely with the provided ones
//! in a [`HandlerList`]. Asynchronous backends are supported by the `oxide-openid-async` crate
//! which mirrors the traits of this crate.
//!
//! [`AuthorizeHandler`]: authorize/trait.AuthorizeHandler.html
//! [`AuthorizeResponse`]: authorize/struct.AuthorizeResponse.html
//! [`AuthorizeFlow`]: authorize/struct.AuthorizeFlow.html
//! [`HandlerList`]: authorize/struct.HandlerList.html
//! [`compose`]: compose/index.html
#![warn(missing_docs)]

pub mod authorize;
pub mod compose;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod primitives;

pub use crate::authorize::{
    AuthorizeFlow, AuthorizeHandler, AuthorizeHandlers, AuthorizeRequest, AuthorizeResponse,
    HandlerList,
};
pub use crate::config::Config;
pub use crate::context::Context;
pub use crate::error::{Error, ErrorKind};
pub use crate::primitives::storage::MemoryStore;
