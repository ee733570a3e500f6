use std::collections::BTreeSet;

use crate::error::{Error, ErrorKind, Result};
use crate::primitives::parameters::Parameters;

/// The response accumulated by the handler chain.
///
/// The accumulator is append-only: a handler can add parameters, header fields and handled
/// response types, and set the authorization code once. Any attempt to replace a value that an
/// earlier handler set within the same call fails with a `Misconfiguration` error since it means
/// two handlers that should never both apply were configured together.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizeResponse {
    headers: Parameters,
    parameters: Parameters,
    handled_types: BTreeSet<String>,
    code: String,
}

impl AuthorizeResponse {
    /// An empty response. Nothing is handled, no code is issued.
    pub fn new() -> Self {
        AuthorizeResponse::default()
    }

    /// Add a parameter delivered to the client.
    pub fn add_parameter<K, V>(&mut self, key: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        if self.parameters.contains_key(&key) {
            return Err(Self::overwrite("parameter", &key));
        }
        self.parameters.insert(key, value);
        Ok(())
    }

    /// Add a header field to the response.
    pub fn add_header<K, V>(&mut self, key: K, value: V) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let key = key.into();
        if self.headers.contains_key(&key) {
            return Err(Self::overwrite("header", &key));
        }
        self.headers.insert(key, value);
        Ok(())
    }

    /// Record the issued authorization code.
    pub fn set_code<C: Into<String>>(&mut self, code: C) -> Result<()> {
        if !self.code.is_empty() {
            return Err(Self::overwrite("authorization code", "code"));
        }
        self.code = code.into();
        Ok(())
    }

    /// Mark a response type as handled. Marking a type twice is allowed.
    pub fn set_response_type_handled<T: Into<String>>(&mut self, response_type: T) {
        self.handled_types.insert(response_type.into());
    }

    /// The parameters delivered to the client, in the order they were added.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The header fields of the response.
    pub fn headers(&self) -> &Parameters {
        &self.headers
    }

    /// The issued authorization code, empty if none was issued.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// If some handler took responsibility for the response type.
    pub fn is_response_type_handled(&self, response_type: &str) -> bool {
        self.handled_types.contains(response_type)
    }

    /// All handled response types.
    pub fn handled_types(&self) -> impl Iterator<Item = &str> {
        self.handled_types.iter().map(String::as_str)
    }

    fn overwrite(what: &str, key: &str) -> Error {
        Error::new(ErrorKind::Misconfiguration).with_debug(format!(
            "The {} '{}' was already set by an earlier handler, indicating conflicting handlers.",
            what, key
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let response = AuthorizeResponse::new();
        assert!(response.code().is_empty());
        assert!(response.parameters().is_empty());
        assert!(response.headers().is_empty());
        assert_eq!(response.handled_types().count(), 0);
    }

    #[test]
    fn parameters_are_append_only() {
        let mut response = AuthorizeResponse::new();
        response.add_parameter("state", "xyz").unwrap();
        let err = response.add_parameter("state", "abc").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Misconfiguration);
        assert_eq!(response.parameters().get("state"), Some("xyz"));

        response.add_header("Cache-Control", "no-store").unwrap();
        assert!(response.add_header("Cache-Control", "no-cache").is_err());
    }

    #[test]
    fn code_is_set_once() {
        let mut response = AuthorizeResponse::new();
        response.set_code("abc123").unwrap();
        assert!(response.set_code("def456").is_err());
        assert_eq!(response.code(), "abc123");
    }

    #[test]
    fn handled_types() {
        let mut response = AuthorizeResponse::new();
        response.set_response_type_handled("code");
        response.set_response_type_handled("code");
        assert!(response.is_response_type_handled("code"));
        assert!(!response.is_response_type_handled("id_token"));
        assert_eq!(response.handled_types().collect::<Vec<_>>(), vec!["code"]);
    }
}
