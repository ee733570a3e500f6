//! The client on whose behalf an authorization request is processed.
use serde::{Deserialize, Serialize};

use super::response_type::ResponseMode;

/// The registered client of a request as far as the authorization endpoint cares.
///
/// Registration and lookup happen before the request reaches the handler chain. The client
/// recorded here is only the resolved reference the handlers may need for policy decisions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// The id under which the client is registered.
    pub client_id: String,

    /// Public clients can not keep a secret, for example native or browser applications.
    #[serde(default)]
    pub public: bool,

    /// Overrides the response mode derived from the response types, if set.
    #[serde(default)]
    pub default_response_mode: Option<ResponseMode>,
}

impl Client {
    /// A confidential client without response mode policy.
    pub fn confidential<S: Into<String>>(client_id: S) -> Self {
        Client {
            client_id: client_id.into(),
            public: false,
            default_response_mode: None,
        }
    }

    /// A public client without response mode policy.
    pub fn public<S: Into<String>>(client_id: S) -> Self {
        Client {
            client_id: client_id.into(),
            public: true,
            default_response_mode: None,
        }
    }
}
