//! Defines the Scope type and parsing/formatting according to the rfc.
use std::collections::BTreeSet;
use std::iter::FromIterator;
use std::{cmp, fmt, str};

use serde::{Deserialize, Serialize};

/// Scope granted to a client, a set of scope-tokens separated by spaces.
///
/// Scopes are interpreted as a conjunction of scope tokens.  This induces a partial ordering on
/// scopes where scope `A` is less or equal than scope `B` if all scope tokens of `A` are also
/// found in `B`.
///
/// The tokens are kept sorted so that formatting a scope is deterministic, which matters when it
/// is echoed back in the `scope` parameter of a response.
///
/// ```
/// # use oxide_openid::primitives::scope::Scope;
/// let granted = "openid profile".parse::<Scope>().unwrap();
/// assert!(granted.contains("openid"));
/// assert_eq!(granted.to_string(), "openid profile");
/// assert!("openid".parse::<Scope>().unwrap() <= granted);
/// ```
///
/// Scope-tokens are restricted to the following subset of ascii:
///   - The character '!'
///   - The character range '\x23' to '\x5b' which includes numbers and upper case letters
///   - The character range '\x5d' to '\x7e' which includes lower case letters
/// Individual scope-tokens are separated by spaces.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Scope {
    tokens: BTreeSet<String>,
}

impl Serialize for Scope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}

impl Scope {
    fn invalid_scope_char(ch: char) -> bool {
        match ch {
            '\x21' => false,
            ch if ('\x23'..='\x5b').contains(&ch) => false,
            ch if ('\x5d'..='\x7e').contains(&ch) => false,
            ' ' => false, // Space separator is a valid char
            _ => true,
        }
    }

    /// Check if a single scope token is part of this scope.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Determines if this scope has enough privileges to access some resource requiring the scope
    /// on the right side. This operation is equivalent to comparison via `>=`.
    pub fn privileged_to(&self, rhs: &Scope) -> bool {
        rhs <= self
    }

    /// If no token was granted at all.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Create an iterator over the individual scopes, in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(AsRef::as_ref)
    }
}

/// Error returned from parsing a scope as encoded in an authorization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseScopeErr {
    /// A character was encountered which is not allowed to appear in scope strings.
    #[error("Encountered invalid character in scope: {0}")]
    InvalidCharacter(char),
}

impl str::FromStr for Scope {
    type Err = ParseScopeErr;

    fn from_str(string: &str) -> Result<Scope, ParseScopeErr> {
        if let Some(ch) = string.chars().find(|&ch| Scope::invalid_scope_char(ch)) {
            return Err(ParseScopeErr::InvalidCharacter(ch));
        }
        let tokens = string.split(' ').filter(|s| !s.is_empty());
        Ok(Scope {
            tokens: tokens.map(str::to_string).collect(),
        })
    }
}

impl<S: Into<String>> FromIterator<S> for Scope {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Scope {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_tuple("Scope").field(&self.tokens).finish()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let output = self
            .tokens
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        fmt.write_str(&output)
    }
}

impl PartialOrd for Scope {
    fn partial_cmp(&self, rhs: &Self) -> Option<cmp::Ordering> {
        let intersect_count = self.tokens.intersection(&rhs.tokens).count();
        if intersect_count == self.tokens.len() && intersect_count == rhs.tokens.len() {
            Some(cmp::Ordering::Equal)
        } else if intersect_count == self.tokens.len() {
            Some(cmp::Ordering::Less)
        } else if intersect_count == rhs.tokens.len() {
            Some(cmp::Ordering::Greater)
        } else {
            None
        }
    }
}
