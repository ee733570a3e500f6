//! Storage collaborators binding state to issued authorization codes.
//!
//! Both the code issuing handler and the OpenID Connect session handler persist a snapshot of
//! the request under the code they issued or observed. The token endpoint later looks the
//! snapshot up when the code is exchanged.
//!
//! Implementations are responsible for their own consistency: creating an entry must be atomic
//! with respect to its key, since handlers perform no locking of their own. Slow backends should
//! honor the [`Context`] they are handed.
//!
//! [`Context`]: ../../context/struct.Context.html
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::parameters::Parameters;
use super::scope::Scope;
use super::Time;
use crate::authorize::AuthorizeRequest;
use crate::context::{Context, ContextError};

/// A sanitized snapshot of an authorization request.
///
/// Only the parameters passing an explicit allow-list are retained, nothing else of the raw
/// request outlives the call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRequest {
    /// The client the request was made by.
    pub client_id: String,

    /// The scope granted within the request.
    pub granted_scopes: Scope,

    /// The authenticated resource owner, if the session had one.
    pub subject: Option<String>,

    /// When the request was registered.
    pub requested_at: Time,

    /// The allow-listed subset of the raw request parameters.
    pub parameters: Parameters,
}

impl StoredRequest {
    /// Snapshot a request, keeping only the `allowed` raw parameters.
    pub fn sanitized(request: &AuthorizeRequest, allowed: &[&str]) -> Self {
        StoredRequest {
            client_id: request.client().client_id.clone(),
            granted_scopes: request.granted_scopes().clone(),
            subject: request
                .session()
                .and_then(|session| session.subject())
                .map(str::to_string),
            requested_at: request.requested_at(),
            parameters: request.parameters().sanitize(allowed),
        }
    }
}

/// Failure of a storage backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No entry exists for the key.
    #[error("no entry exists for the given code")]
    NotFound,

    /// An entry already exists for the key.
    #[error("an entry already exists for the given code")]
    Conflict,

    /// The call ended before the backend could act.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Any other failure of the backend.
    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Persists OpenID Connect sessions keyed by authorization code.
pub trait OpenIdSessionStorage: Send + Sync {
    /// Bind a request snapshot to a code. Fails with `Conflict` if the code is already bound.
    fn create_openid_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> Result<(), StorageError>;

    /// Retrieve the snapshot bound to a code.
    fn get_openid_session(&self, ctx: &Context, code: &str) -> Result<StoredRequest, StorageError>;

    /// Remove the snapshot bound to a code.
    fn delete_openid_session(&self, ctx: &Context, code: &str) -> Result<(), StorageError>;
}

/// Persists authorization code sessions keyed by the code.
pub trait AuthorizeCodeStorage: Send + Sync {
    /// Bind a request snapshot to a freshly issued code.
    fn create_authorize_code_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> Result<(), StorageError>;

    /// Retrieve the snapshot bound to a code.
    fn get_authorize_code_session(&self, ctx: &Context, code: &str)
        -> Result<StoredRequest, StorageError>;

    /// Mark a code as used. It can not be retrieved afterwards.
    fn invalidate_authorize_code_session(&self, ctx: &Context, code: &str) -> Result<(), StorageError>;
}

/// An in-memory store for both kinds of sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    openid_sessions: Mutex<HashMap<String, StoredRequest>>,
    authorize_codes: Mutex<HashMap<String, StoredRequest>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock<'a>(
        map: &'a Mutex<HashMap<String, StoredRequest>>,
    ) -> Result<MutexGuard<'a, HashMap<String, StoredRequest>>, StorageError> {
        map.lock()
            .map_err(|_| StorageError::Backend("store lock poisoned".to_string()))
    }

    fn create(
        map: &Mutex<HashMap<String, StoredRequest>>, ctx: &Context, code: &str, request: StoredRequest,
    ) -> Result<(), StorageError> {
        ctx.check()?;
        let mut map = Self::lock(map)?;
        if map.contains_key(code) {
            return Err(StorageError::Conflict);
        }
        map.insert(code.to_string(), request);
        Ok(())
    }

    fn get(
        map: &Mutex<HashMap<String, StoredRequest>>, ctx: &Context, code: &str,
    ) -> Result<StoredRequest, StorageError> {
        ctx.check()?;
        Self::lock(map)?.get(code).cloned().ok_or(StorageError::NotFound)
    }

    fn remove(map: &Mutex<HashMap<String, StoredRequest>>, ctx: &Context, code: &str) -> Result<(), StorageError> {
        ctx.check()?;
        Self::lock(map)?
            .remove(code)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }
}

impl OpenIdSessionStorage for MemoryStore {
    fn create_openid_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> Result<(), StorageError> {
        Self::create(&self.openid_sessions, ctx, code, request)
    }

    fn get_openid_session(&self, ctx: &Context, code: &str) -> Result<StoredRequest, StorageError> {
        Self::get(&self.openid_sessions, ctx, code)
    }

    fn delete_openid_session(&self, ctx: &Context, code: &str) -> Result<(), StorageError> {
        Self::remove(&self.openid_sessions, ctx, code)
    }
}

impl AuthorizeCodeStorage for MemoryStore {
    fn create_authorize_code_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> Result<(), StorageError> {
        Self::create(&self.authorize_codes, ctx, code, request)
    }

    fn get_authorize_code_session(
        &self, ctx: &Context, code: &str,
    ) -> Result<StoredRequest, StorageError> {
        Self::get(&self.authorize_codes, ctx, code)
    }

    fn invalidate_authorize_code_session(&self, ctx: &Context, code: &str) -> Result<(), StorageError> {
        Self::remove(&self.authorize_codes, ctx, code)
    }
}

impl<T: OpenIdSessionStorage + ?Sized> OpenIdSessionStorage for Arc<T> {
    fn create_openid_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> Result<(), StorageError> {
        (**self).create_openid_session(ctx, code, request)
    }

    fn get_openid_session(&self, ctx: &Context, code: &str) -> Result<StoredRequest, StorageError> {
        (**self).get_openid_session(ctx, code)
    }

    fn delete_openid_session(&self, ctx: &Context, code: &str) -> Result<(), StorageError> {
        (**self).delete_openid_session(ctx, code)
    }
}

impl<T: AuthorizeCodeStorage + ?Sized> AuthorizeCodeStorage for Arc<T> {
    fn create_authorize_code_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> Result<(), StorageError> {
        (**self).create_authorize_code_session(ctx, code, request)
    }

    fn get_authorize_code_session(
        &self, ctx: &Context, code: &str,
    ) -> Result<StoredRequest, StorageError> {
        (**self).get_authorize_code_session(ctx, code)
    }

    fn invalidate_authorize_code_session(&self, ctx: &Context, code: &str) -> Result<(), StorageError> {
        (**self).invalidate_authorize_code_session(ctx, code)
    }
}
