//! The session of the resource owner attached to an authorization request.
use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Time;

/// Credentials whose lifetime a session tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// The authorization code returned from the authorization endpoint.
    AuthorizeCode,

    /// A bearer access token.
    AccessToken,

    /// A refresh token.
    RefreshToken,

    /// An OpenID Connect identity token.
    IdToken,
}

/// Session state supplied by the caller for the duration of one call.
///
/// The session is opaque to the engine. Handlers read the authentication state of the resource
/// owner from it and may record expiry times for the credentials they issue. It is persisted only
/// if a storage collaborator chooses to.
pub trait Session: fmt::Debug + Send + Sync {
    /// The authenticated resource owner, if any.
    fn subject(&self) -> Option<&str>;

    /// When the resource owner last authenticated.
    fn authenticated_at(&self) -> Option<Time>;

    /// When the authorization request was first registered.
    fn requested_at(&self) -> Option<Time>;

    /// The expiry recorded for a kind of credential.
    fn expires_at(&self, kind: TokenKind) -> Option<Time>;

    /// Record the expiry of a freshly issued credential.
    fn set_expires_at(&mut self, kind: TokenKind, at: Time);
}

/// A plain session storing exactly the information required by the provided handlers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultSession {
    /// The authenticated resource owner.
    pub subject: Option<String>,

    /// Time of the last authentication of the subject.
    pub authenticated_at: Option<DateTime<Utc>>,

    /// Time the authorization request was registered.
    pub requested_at: Option<DateTime<Utc>>,

    /// Expiry times of credentials issued within this session.
    #[serde(default)]
    pub expires_at: HashMap<TokenKind, DateTime<Utc>>,
}

impl DefaultSession {
    /// A session of a subject that authenticated at some time.
    pub fn authenticated<S: Into<String>>(subject: S, at: Time) -> Self {
        DefaultSession {
            subject: Some(subject.into()),
            authenticated_at: Some(at),
            requested_at: Some(at),
            expires_at: HashMap::new(),
        }
    }
}

impl Session for DefaultSession {
    fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    fn authenticated_at(&self) -> Option<Time> {
        self.authenticated_at
    }

    fn requested_at(&self) -> Option<Time> {
        self.requested_at
    }

    fn expires_at(&self, kind: TokenKind) -> Option<Time> {
        self.expires_at.get(&kind).copied()
    }

    fn set_expires_at(&mut self, kind: TokenKind, at: Time) {
        self.expires_at.insert(kind, at);
    }
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn subject(&self) -> Option<&str> {
        (**self).subject()
    }

    fn authenticated_at(&self) -> Option<Time> {
        (**self).authenticated_at()
    }

    fn requested_at(&self) -> Option<Time> {
        (**self).requested_at()
    }

    fn expires_at(&self, kind: TokenKind) -> Option<Time> {
        (**self).expires_at(kind)
    }

    fn set_expires_at(&mut self, kind: TokenKind, at: Time) {
        (**self).set_expires_at(kind, at)
    }
}
