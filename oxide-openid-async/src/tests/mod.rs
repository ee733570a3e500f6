use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use oxide_openid::authorize::{AuthorizeRequest, AuthorizeResponse};
use oxide_openid::context::Context;
use oxide_openid::error::{Error, ErrorKind, Result};
use oxide_openid::primitives::prelude::*;

use crate::primitives::OpenIdSessionStorage as AsyncSessionStorage;


/// A storage that only exists asynchronously and yields before every operation.
///
/// Clones share the same sessions, the handle is passed to handlers by value.
#[derive(Clone, Debug, Default)]
struct YieldingStorage {
    sessions: Arc<Mutex<Vec<(String, StoredRequest)>>>,
    broken: bool,
}

impl YieldingStorage {
    fn broken() -> Self {
        YieldingStorage {
            sessions: Arc::default(),
            broken: true,
        }
    }

    fn created(&self) -> Vec<(String, StoredRequest)> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl AsyncSessionStorage for YieldingStorage {
    async fn create_openid_session(
        &self, _: &Context, code: &str, request: StoredRequest,
    ) -> std::result::Result<(), StorageError> {
        smol::future::yield_now().await;
        if self.broken {
            return Err(StorageError::Backend("replica set has no primary".to_string()));
        }
        self.sessions.lock().unwrap().push((code.to_string(), request));
        Ok(())
    }

    async fn get_openid_session(
        &self, _: &Context, code: &str,
    ) -> std::result::Result<StoredRequest, StorageError> {
        smol::future::yield_now().await;
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| key == code)
            .map(|(_, request)| request.clone())
            .ok_or(StorageError::NotFound)
    }

    async fn delete_openid_session(&self, _: &Context, code: &str) -> std::result::Result<(), StorageError> {
        smol::future::yield_now().await;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|(key, _)| key != code);
        if sessions.len() == before {
            Err(StorageError::NotFound)
        } else {
            Ok(())
        }
    }
}

/// A synchronous handler issuing the fixed code `abc123`.
struct CodeIssuer;

impl oxide_openid::AuthorizeHandler for CodeIssuer {
    fn name(&self) -> &str {
        "CodeIssuer"
    }

    fn handle(&self, _: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse) -> Result<()> {
        if !request.response_types().has("code") {
            return Ok(());
        }

        response.set_code("abc123")?;
        response.add_parameter("code", "abc123")?;
        response.set_response_type_handled("code");
        Ok(())
    }
}

/// An asynchronous handler that always fails.
struct Rejects(ErrorKind);

#[async_trait]
impl crate::AuthorizeHandler for Rejects {
    fn name(&self) -> &str {
        "Rejects"
    }

    async fn handle(&self, _: &Context, _: &mut AuthorizeRequest, _: &mut AuthorizeResponse) -> Result<()> {
        smol::future::yield_now().await;
        Err(Error::new(self.0))
    }
}

fn request(response_types: &str, scopes: &str, pairs: &[(&str, &str)]) -> AuthorizeRequest {
    AuthorizeRequest::new(
        Client::confidential("client"),
        response_types.parse().unwrap(),
        scopes.parse().unwrap(),
        pairs.iter().copied().collect(),
    )
    .unwrap()
}

fn session(minutes_ago: i64) -> Box<dyn Session> {
    let mut session = DefaultSession::authenticated("alice", Utc::now() - Duration::minutes(minutes_ago));
    session.requested_at = Some(Utc::now());
    Box::new(session)
}
