use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};

use super::*;
use crate::context::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::handler::openid::PromptValidator;
use crate::primitives::prelude::*;

/// Records every session it is asked to create.
#[derive(Debug, Default)]
struct RecordingStorage {
    created: Mutex<Vec<(String, StoredRequest)>>,
    fail_with: Option<StorageError>,
}

impl RecordingStorage {
    fn failing(err: StorageError) -> Self {
        RecordingStorage {
            created: Mutex::default(),
            fail_with: Some(err),
        }
    }

    fn created(&self) -> Vec<(String, StoredRequest)> {
        self.created.lock().unwrap().clone()
    }
}

impl OpenIdSessionStorage for RecordingStorage {
    fn create_openid_session(
        &self, _: &Context, code: &str, request: StoredRequest,
    ) -> std::result::Result<(), StorageError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.created.lock().unwrap().push((code.to_string(), request));
        Ok(())
    }

    fn get_openid_session(&self, _: &Context, code: &str) -> std::result::Result<StoredRequest, StorageError> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .find(|(key, _)| key == code)
            .map(|(_, request)| request.clone())
            .ok_or(StorageError::NotFound)
    }

    fn delete_openid_session(&self, _: &Context, _: &str) -> std::result::Result<(), StorageError> {
        Err(StorageError::Backend("recording storage does not delete".to_string()))
    }
}

/// Counts its invocations and answers with a fixed result.
#[derive(Debug, Default)]
struct CountingValidator {
    calls: Mutex<usize>,
    reject_with: Option<ErrorKind>,
}

impl CountingValidator {
    fn rejecting(kind: ErrorKind) -> Self {
        CountingValidator {
            calls: Mutex::new(0),
            reject_with: Some(kind),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl PromptValidator for CountingValidator {
    fn validate_prompt(&self, _: &Context, _: &AuthorizeRequest) -> Result<()> {
        *self.calls.lock().unwrap() += 1;
        match self.reject_with {
            Some(kind) => Err(Error::new(kind)),
            None => Ok(()),
        }
    }
}

/// Issues the fixed code `abc123` for any request containing the `code` response type.
struct CodeIssuer;

impl AuthorizeHandler for CodeIssuer {
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

/// Marks a response type handled without adding anything.
struct Marks(&'static str);

impl AuthorizeHandler for Marks {
    fn name(&self) -> &str {
        self.0
    }

    fn handle(&self, _: &Context, request: &mut AuthorizeRequest, response: &mut AuthorizeResponse) -> Result<()> {
        if request.response_types().has(self.0) {
            response.set_response_type_handled(self.0);
        }
        Ok(())
    }
}

/// Always fails with the given kind.
struct Rejects(ErrorKind);

impl AuthorizeHandler for Rejects {
    fn name(&self) -> &str {
        "Rejects"
    }

    fn handle(&self, _: &Context, _: &mut AuthorizeRequest, _: &mut AuthorizeResponse) -> Result<()> {
        Err(Error::new(self.0).with_debug("rejected by test handler"))
    }
}

/// Panics if it is ever invoked.
struct Unreachable;

impl AuthorizeHandler for Unreachable {
    fn name(&self) -> &str {
        "Unreachable"
    }

    fn handle(&self, _: &Context, _: &mut AuthorizeRequest, _: &mut AuthorizeResponse) -> Result<()> {
        panic!("Handler after a failing handler was invoked")
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

fn session() -> Box<dyn Session> {
    let mut session = DefaultSession::authenticated("alice", Utc::now() - Duration::minutes(5));
    session.requested_at = Some(Utc::now());
    Box::new(session)
}

fn flow(handlers: Vec<Arc<dyn AuthorizeHandler>>) -> AuthorizeFlow<Vec<Arc<dyn AuthorizeHandler>>> {
    AuthorizeFlow::new(handlers)
}

fn expect_kind<T: std::fmt::Debug>(result: Result<T>, kind: ErrorKind) -> Error {
    match result {
        Err(err) if err.kind() == kind => err,
        other => panic!("Expected {}: {:?}", kind, other),
    }
}

mod openid;
