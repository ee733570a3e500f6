//! Asynchronous companion of `oxide-openid`.
//!
//! Storage backends of an authorization server are usually databases reached over the network.
//! This crate mirrors the handler, storage and flow traits of `oxide-openid` with `async`
//! methods so that such backends do not block the executor.
//!
//! Every synchronous handler, storage and prompt validator is also an asynchronous one, so the
//! provided handlers and the `MemoryStore` of the core crate can be mixed freely with
//! asynchronous implementations in one chain. Requests, responses, errors and the final
//! verification of a response are shared with the core crate and behave identically.
//!
//! Wrappers such as `Arc<T>` are only storages through the synchronous traits. A backend that
//! exists only asynchronously is passed to its handler by value; make it a cheaply cloneable
//! handle over shared state when several handlers need it.
#![warn(missing_docs)]

pub mod authorize;
pub mod compose;
pub mod handler;
pub mod primitives;

#[cfg(test)]
mod tests;

pub use crate::authorize::{AuthorizeFlow, AuthorizeHandler, AuthorizeHandlers, HandlerList};
