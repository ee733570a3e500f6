//! Errors defined in [rfc6749] and [OpenID Connect Core].
//!
//! Every error carries three layers of information. The [`ErrorKind`] is the formal, machine
//! readable classification that ends up in the `error` parameter of the response. The hint is a
//! human readable explanation that is safe to show to the client. The debug string and the
//! optional source are for operators only and are never part of the client-visible rendering.
//!
//! [rfc6749]: https://tools.ietf.org/html/rfc6749#section-4.1.2.1
//! [OpenID Connect Core]: https://openid.net/specs/openid-connect-core-1_0.html#AuthError
//! [`ErrorKind`]: enum.ErrorKind.html

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::vec;

/// Error codes returned from the authorization endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The request is missing a required parameter, includes an invalid parameter value, includes
    /// a parameter more than once, or is otherwise malformed.
    InvalidRequest,

    /// None of the configured handlers was able to handle one of the requested response types.
    UnsupportedResponseType,

    /// The requested response mode is not allowed for the requested response types.
    ///
    /// Token carrying responses must not be delivered in the query component where they would leak
    /// into server logs and referrer headers.
    UnsupportedResponseMode,

    /// The server is configured in a way that prevents it from fulfilling the request.
    ///
    /// This is never the fault of the client, for example a handler depending on an authorization
    /// code ran before the code was issued.
    Misconfiguration,

    /// The authorization server encountered an unexpected condition that prevented it from
    /// fulfilling the request. (This error code is needed because a 500 Internal Server Error HTTP
    /// status code cannot be returned to the client via an HTTP redirect.)
    ServerError,

    /// The authorization server requires end-user authentication.
    LoginRequired,

    /// The authorization server requires end-user consent.
    ConsentRequired,
}

impl ErrorKind {
    fn description(self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "invalid_request",
            ErrorKind::UnsupportedResponseType => "unsupported_response_type",
            ErrorKind::UnsupportedResponseMode => "unsupported_response_mode",
            ErrorKind::Misconfiguration => "misconfiguration",
            ErrorKind::ServerError => "server_error",
            ErrorKind::LoginRequired => "login_required",
            ErrorKind::ConsentRequired => "consent_required",
        }
    }

    fn default_hint(self) -> &'static str {
        match self {
            ErrorKind::InvalidRequest => "The request is missing a required parameter, includes an invalid parameter value, includes a parameter more than once, or is otherwise malformed.",
            ErrorKind::UnsupportedResponseType => "The authorization server does not support obtaining a token using this method.",
            ErrorKind::UnsupportedResponseMode => "The authorization server does not support obtaining a response using this response mode.",
            ErrorKind::Misconfiguration => "The request failed because of an internal error that is probably caused by misconfiguration.",
            ErrorKind::ServerError => "The authorization server encountered an unexpected condition that prevented it from fulfilling the request.",
            ErrorKind::LoginRequired => "The Authorization Server requires End-User authentication.",
            ErrorKind::ConsentRequired => "The Authorization Server requires End-User consent.",
        }
    }

    /// The http status code an error of this kind should be reported with when it is not
    /// redirected to the client.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Misconfiguration | ErrorKind::ServerError => 500,
            _ => 400,
        }
    }

    /// If the fault lies with the server and not with the client.
    pub fn is_server_fault(self) -> bool {
        self.status_code() >= 500
    }
}

impl AsRef<str> for ErrorKind {
    fn as_ref(&self) -> &str {
        self.description()
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// A structured error of the authorization endpoint.
///
/// Errors are constructed from their kind and then refined:
///
/// ```
/// # use oxide_openid::error::{Error, ErrorKind};
/// let error = Error::new(ErrorKind::InvalidRequest)
///     .with_hint("The 'redirect_uri' parameter is required.")
///     .with_debug("request form had no redirect_uri");
///
/// assert_eq!(error.kind(), ErrorKind::InvalidRequest);
/// // Debug information is never rendered for the client.
/// assert!(error.iter().all(|(_, value)| !value.contains("request form")));
/// ```
#[derive(Clone, Debug, thiserror::Error)]
#[error("{kind}: {hint}")]
pub struct Error {
    kind: ErrorKind,
    hint: Cow<'static, str>,
    debug: Option<String>,
    #[source]
    cause: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

/// Result type of all authorization endpoint operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Construct an error of some kind with its default description as hint.
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            hint: Cow::Borrowed(kind.default_hint()),
            debug: None,
            cause: None,
        }
    }

    /// Replace the client-visible explanation.
    pub fn with_hint<H: Into<Cow<'static, str>>>(mut self, hint: H) -> Self {
        self.hint = hint.into();
        self
    }

    /// Attach information only meant for operators.
    pub fn with_debug<D: Into<String>>(mut self, debug: D) -> Self {
        self.debug = Some(debug.into());
        self
    }

    /// Retain an underlying error as the source of this one.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Get the formal kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The explanation which may be relayed to the client.
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Operator facing details, if any.
    pub fn debug(&self) -> Option<&str> {
        self.debug.as_deref()
    }

    /// Iterate over the key value pairs that describe this error to the client.
    ///
    /// These pairs must be added to the detailed description of an error, for example as part of
    /// a form urlencoded query component in the `Location` header of a redirect. Neither the debug
    /// string nor the source are part of the output.
    pub fn iter(&self) -> <&Self as IntoIterator>::IntoIter {
        self.into_iter()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// The error as key-value pairs.
impl IntoIterator for &'_ Error {
    type Item = (&'static str, Cow<'static, str>);
    type IntoIter = vec::IntoIter<(&'static str, Cow<'static, str>)>;

    fn into_iter(self) -> Self::IntoIter {
        vec![
            ("error", Cow::Borrowed(self.kind.description())),
            ("error_description", self.hint.clone()),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection reset by peer")]
    struct Backend;

    #[test]
    fn kinds_render_rfc_names() {
        assert_eq!(ErrorKind::InvalidRequest.to_string(), "invalid_request");
        assert_eq!(ErrorKind::UnsupportedResponseMode.to_string(), "unsupported_response_mode");
        assert_eq!(ErrorKind::Misconfiguration.to_string(), "misconfiguration");
        assert_eq!(ErrorKind::LoginRequired.to_string(), "login_required");
    }

    #[test]
    fn server_faults() {
        assert!(ErrorKind::ServerError.is_server_fault());
        assert!(ErrorKind::Misconfiguration.is_server_fault());
        assert!(!ErrorKind::InvalidRequest.is_server_fault());
        assert_eq!(ErrorKind::UnsupportedResponseType.status_code(), 400);
    }

    #[test]
    fn cause_is_hidden_from_client() {
        let error = Error::new(ErrorKind::ServerError)
            .with_debug(Backend.to_string())
            .with_cause(Backend);

        assert_eq!(error.debug(), Some("connection reset by peer"));
        assert!(error.source().is_some());

        let pairs: Vec<_> = error.iter().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("error", Cow::Borrowed("server_error")));
        assert!(!pairs[1].1.contains("connection reset"));
    }

    #[test]
    fn default_hint() {
        let error = Error::new(ErrorKind::UnsupportedResponseType);
        assert_eq!(error.hint(), ErrorKind::UnsupportedResponseType.default_hint());
        assert!(error.debug().is_none());
    }
}
