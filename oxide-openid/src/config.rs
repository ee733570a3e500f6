//! Tunables of the provided handlers.
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration shared by the handlers in [`compose`].
///
/// All fields have defaults, so a configuration file only needs to list what it changes:
///
/// ```
/// # use oxide_openid::Config;
/// let config = Config::from_json(r#"{ "authorize_code_lifespan": 300 }"#).unwrap();
/// assert_eq!(config.authorize_code_lifespan, 300);
/// assert_eq!(config.authorize_code_length, 32);
/// ```
///
/// [`compose`]: ../compose/index.html
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bytes of randomness in each authorization code.
    pub authorize_code_length: usize,

    /// Seconds an authorization code stays valid.
    pub authorize_code_lifespan: u64,

    /// Seconds of clock skew tolerated when checking the authentication time of a session.
    pub auth_time_leeway: u64,
}

/// A configuration that can not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration could not be parsed.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its valid range.
    #[error("invalid configuration value for '{field}': {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Codes with less entropy are guessable within their lifetime.
const MIN_CODE_LENGTH: usize = 16;
const MAX_CODE_LIFESPAN: u64 = 24 * 60 * 60;
const MAX_LEEWAY: u64 = 60 * 60;

impl Default for Config {
    fn default() -> Self {
        Config {
            authorize_code_length: 32,
            authorize_code_lifespan: 600,
            auth_time_leeway: 5,
        }
    }
}

impl Config {
    /// Parse and validate a configuration from json.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all values are within their valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.authorize_code_length < MIN_CODE_LENGTH {
            return Err(ConfigError::Invalid {
                field: "authorize_code_length",
                reason: "must be at least 16 bytes",
            });
        }

        if self.authorize_code_lifespan == 0 || self.authorize_code_lifespan > MAX_CODE_LIFESPAN {
            return Err(ConfigError::Invalid {
                field: "authorize_code_lifespan",
                reason: "must be positive and at most one day",
            });
        }

        if self.auth_time_leeway > MAX_LEEWAY {
            return Err(ConfigError::Invalid {
                field: "auth_time_leeway",
                reason: "must be at most one hour",
            });
        }

        Ok(())
    }

    /// The lifespan of authorization codes.
    pub fn authorize_code_lifespan(&self) -> Duration {
        Duration::seconds(self.authorize_code_lifespan.min(MAX_CODE_LIFESPAN) as i64)
    }

    /// The tolerated clock skew for authentication times.
    pub fn auth_time_leeway(&self) -> Duration {
        Duration::seconds(self.auth_time_leeway.min(MAX_LEEWAY) as i64)
    }
}
