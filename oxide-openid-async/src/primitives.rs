//! Async versions of the storage and validation traits.
use async_trait::async_trait;
use oxide_openid::authorize::AuthorizeRequest;
use oxide_openid::context::Context;
use oxide_openid::error::Result;
use oxide_openid::primitives::storage::{StorageError, StoredRequest};

/// Persists OpenID Connect sessions keyed by authorization code.
///
/// See `oxide_openid::primitives::storage::OpenIdSessionStorage` for the contract. Every
/// synchronous storage, including `Arc` wrapped ones, implements this trait. Asynchronous
/// implementations are used by value.
#[async_trait]
pub trait OpenIdSessionStorage: Send + Sync {
    /// Bind a request snapshot to a code. Fails with `Conflict` if the code is already bound.
    async fn create_openid_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> std::result::Result<(), StorageError>;

    /// Retrieve the snapshot bound to a code.
    async fn get_openid_session(
        &self, ctx: &Context, code: &str,
    ) -> std::result::Result<StoredRequest, StorageError>;

    /// Remove the snapshot bound to a code.
    async fn delete_openid_session(&self, ctx: &Context, code: &str) -> std::result::Result<(), StorageError>;
}

#[async_trait]
impl<T> OpenIdSessionStorage for T
where
    T: oxide_openid::primitives::storage::OpenIdSessionStorage + ?Sized,
{
    async fn create_openid_session(
        &self, ctx: &Context, code: &str, request: StoredRequest,
    ) -> std::result::Result<(), StorageError> {
        oxide_openid::primitives::storage::OpenIdSessionStorage::create_openid_session(self, ctx, code, request)
    }

    async fn get_openid_session(
        &self, ctx: &Context, code: &str,
    ) -> std::result::Result<StoredRequest, StorageError> {
        oxide_openid::primitives::storage::OpenIdSessionStorage::get_openid_session(self, ctx, code)
    }

    async fn delete_openid_session(&self, ctx: &Context, code: &str) -> std::result::Result<(), StorageError> {
        oxide_openid::primitives::storage::OpenIdSessionStorage::delete_openid_session(self, ctx, code)
    }
}

/// Validates the `prompt` and `max_age` semantics of an OpenID Connect request.
#[async_trait]
pub trait PromptValidator: Send + Sync {
    /// Check the request against the authentication state of its session.
    async fn validate_prompt(&self, ctx: &Context, request: &AuthorizeRequest) -> Result<()>;
}

#[async_trait]
impl<T> PromptValidator for T
where
    T: oxide_openid::handler::openid::PromptValidator + ?Sized,
{
    async fn validate_prompt(&self, ctx: &Context, request: &AuthorizeRequest) -> Result<()> {
        oxide_openid::handler::openid::PromptValidator::validate_prompt(self, ctx, request)
    }
}
