//! Response types requested by a client and the modes in which responses are delivered.
use std::{fmt, str};

use serde::{Deserialize, Serialize};

/// The ordered list of response types of an authorization request.
///
/// Parsed from the space separated `response_type` parameter. Duplicates are dropped, the first
/// occurrence determines the position. Combinations such as `code id_token` are distinct from the
/// single `code` type, which is why handlers usually test with [`exactly_one`].
///
/// [`exactly_one`]: #method.exactly_one
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTypes {
    types: Vec<String>,
}

impl ResponseTypes {
    /// If `response_type` is part of the request.
    pub fn has(&self, response_type: &str) -> bool {
        self.types.iter().any(|t| t == response_type)
    }

    /// If exactly this single response type and nothing else was requested.
    pub fn exactly_one(&self, response_type: &str) -> bool {
        self.types.len() == 1 && self.types[0] == response_type
    }

    /// Number of distinct response types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// If no response type was requested at all.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The response types in request order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}

impl<S: Into<String>> std::iter::FromIterator<S> for ResponseTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut types: Vec<String> = Vec::new();
        for response_type in iter {
            let response_type = response_type.into();
            if response_type.is_empty() || types.contains(&response_type) {
                continue;
            }
            types.push(response_type);
        }
        ResponseTypes { types }
    }
}

impl str::FromStr for ResponseTypes {
    type Err = std::convert::Infallible;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Ok(string.split(' ').collect())
    }
}

impl fmt::Display for ResponseTypes {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.types.join(" "))
    }
}

/// How the parameters of a response are delivered to the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Encoded in the query component of the redirect uri.
    Query,

    /// Encoded in the fragment component, never sent to the client's server by the user agent.
    Fragment,

    /// Auto-submitted as an html form with method `POST`.
    FormPost,
}

impl ResponseMode {
    /// The mode a response for these types should use unless the client asks otherwise.
    ///
    /// Only the pure code flow (and the `none` type, which returns no credentials) delivers in
    /// the query. Everything returning a token does so in the fragment.
    pub fn default_for(response_types: &ResponseTypes) -> Self {
        if response_types.exactly_one("code") || response_types.exactly_one("none") {
            ResponseMode::Query
        } else {
            ResponseMode::Fragment
        }
    }

    /// The parameter value representing this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::Query => "query",
            ResponseMode::Fragment => "fragment",
            ResponseMode::FormPost => "form_post",
        }
    }
}

/// A `response_mode` parameter with an unknown value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown response mode '{0}'")]
pub struct ParseResponseModeErr(pub String);

impl str::FromStr for ResponseMode {
    type Err = ParseResponseModeErr;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "query" => Ok(ResponseMode::Query),
            "fragment" => Ok(ResponseMode::Fragment),
            "form_post" => Ok(ResponseMode::FormPost),
            other => Err(ParseResponseModeErr(other.to_string())),
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}
