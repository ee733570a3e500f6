//! A collection of primitives used by the handlers and collaborators of the authorization
//! endpoint.
//!
//! A primitive is the smallest independent unit of data or policy. The value types here
//! (`Scope`, `ResponseTypes`, `Parameters`) are what requests and responses are assembled from,
//! while the traits (`Session`, `CodeGenerator`, the storages) are the seams at which a server
//! plugs in its own backends. There is a simple, in-memory implementation for each of those.

use chrono::DateTime;
use chrono::Utc;

pub mod client;
pub mod generator;
pub mod parameters;
pub mod response_type;
pub mod scope;
pub mod session;
pub mod storage;

/// Point in time of requests, authentications and expiries.
pub type Time = DateTime<Utc>;

/// Commonly used primitives for handlers and callers.
pub mod prelude {
    pub use super::client::Client;
    pub use super::generator::{CodeGenerator, RandomGenerator};
    pub use super::parameters::Parameters;
    pub use super::response_type::{ResponseMode, ResponseTypes};
    pub use super::scope::Scope;
    pub use super::session::{DefaultSession, Session, TokenKind};
    pub use super::storage::{
        AuthorizeCodeStorage, MemoryStore, OpenIdSessionStorage, StorageError, StoredRequest,
    };
}
