use std::sync::Arc;

use chrono::{Duration, Utc};
use url::Url;

use crate::authorize::AuthorizeRequest;
use crate::config::Config;
use crate::context::Context;
use crate::error::{Error, ErrorKind, Result};
use crate::handler::explicit::is_secure;

/// Validates the `prompt` and `max_age` semantics of an OpenID Connect request.
pub trait PromptValidator: Send + Sync {
    /// Check the request against the authentication state of its session.
    fn validate_prompt(&self, ctx: &Context, request: &AuthorizeRequest) -> Result<()>;
}

impl<T: PromptValidator + ?Sized> PromptValidator for Arc<T> {
    fn validate_prompt(&self, ctx: &Context, request: &AuthorizeRequest) -> Result<()> {
        (**self).validate_prompt(ctx, request)
    }
}

impl<'a, T: PromptValidator + ?Sized> PromptValidator for &'a T {
    fn validate_prompt(&self, ctx: &Context, request: &AuthorizeRequest) -> Result<()> {
        (**self).validate_prompt(ctx, request)
    }
}

const AVAILABLE_PROMPTS: [&str; 4] = ["login", "none", "consent", "select_account"];

/// Larger values of `max_age` can not be represented as a duration.
const MAX_AGE_LIMIT: i64 = i64::MAX / 1_000;

/// The prompt validation of [OpenID Connect Core, section 3.1.2.1].
///
/// Verifies the requested prompt values against the authentication time recorded in the session
/// of the call:
///
/// - `none` may not be combined with other values and fails with `login_required` if the user
///   authenticated during this very request.
/// - `login` fails with `login_required` if the user did not authenticate after the request was
///   registered.
/// - `max_age` fails with `login_required` if the last authentication is too old.
///
/// Verifying an `id_token_hint` requires a signing strategy and is not done here.
///
/// [OpenID Connect Core, section 3.1.2.1]: https://openid.net/specs/openid-connect-core-1_0.html#AuthRequest
#[derive(Clone, Debug)]
pub struct OpenIdRequestValidator {
    leeway: Duration,
}

impl OpenIdRequestValidator {
    /// A validator tolerating the clock skew configured in `config`.
    pub fn new(config: &Config) -> Self {
        OpenIdRequestValidator {
            leeway: config.auth_time_leeway(),
        }
    }
}

impl Default for OpenIdRequestValidator {
    fn default() -> Self {
        OpenIdRequestValidator::new(&Config::default())
    }
}

impl PromptValidator for OpenIdRequestValidator {
    fn validate_prompt(&self, _: &Context, request: &AuthorizeRequest) -> Result<()> {
        let prompt: Vec<&str> = request
            .parameters()
            .get("prompt")
            .unwrap_or("")
            .split(' ')
            .filter(|value| !value.is_empty())
            .collect();

        if request.client().public && prompt.contains(&"none") && !redirects_securely(request) {
            return Err(Error::new(ErrorKind::ConsentRequired).with_hint(
                "OAuth 2.0 Client is marked public and redirect uri is not considered secure (https missing), but \"prompt=none\" was requested.",
            ));
        }

        if let Some(unknown) = prompt.iter().find(|value| !AVAILABLE_PROMPTS.contains(*value)) {
            return Err(Error::new(ErrorKind::InvalidRequest)
                .with_hint(format!("Used unknown value '{}' for prompt parameter", unknown)));
        }

        if prompt.contains(&"none") && prompt.len() > 1 {
            return Err(Error::new(ErrorKind::InvalidRequest).with_hint(
                "Parameter 'prompt' was set to 'none', but contains other values as well which is not allowed.",
            ));
        }

        let max_age = request
            .parameters()
            .get("max_age")
            .and_then(|age| age.parse::<i64>().ok())
            .filter(|&age| age > 0);

        let session = request.session().ok_or_else(|| {
            Error::new(ErrorKind::ServerError)
                .with_debug("Failed to validate OpenID Connect request because no session is attached.")
        })?;

        if session.subject().map_or(true, str::is_empty) {
            return Err(Error::new(ErrorKind::ServerError)
                .with_debug("Failed to validate OpenID Connect request because session subject is empty."));
        }

        let auth_time = session.authenticated_at();
        let requested_at = session.requested_at();

        if let Some(auth_time) = auth_time {
            if auth_time > Utc::now() + self.leeway {
                return Err(Error::new(ErrorKind::ServerError).with_debug(
                    "Failed to validate OpenID Connect request because authentication time is in the future.",
                ));
            }
        }

        if let Some(max_age) = max_age {
            let (auth_time, requested_at) = match (auth_time, requested_at) {
                (None, _) => return Err(missing_auth_time()),
                (_, None) => {
                    return Err(Error::new(ErrorKind::ServerError).with_debug(
                        "Failed to validate OpenID Connect request because requested_at is missing from session.",
                    ))
                }
                (Some(auth_time), Some(requested_at)) => (auth_time, requested_at),
            };

            let expired = auth_time
                .checked_add_signed(Duration::seconds(max_age.min(MAX_AGE_LIMIT)))
                .map_or(false, |valid_until| valid_until < requested_at);
            if expired {
                return Err(Error::new(ErrorKind::LoginRequired).with_hint(
                    "Failed to validate OpenID Connect request because authentication time does not satisfy max_age time.",
                ));
            }
        }

        if prompt.contains(&"none") {
            let auth_time = auth_time.ok_or_else(missing_auth_time)?;
            if requested_at.map_or(false, |requested_at| auth_time > requested_at) {
                return Err(Error::new(ErrorKind::LoginRequired).with_hint(
                    "Failed to validate OpenID Connect request because prompt was set to 'none' but auth_time happened after the authorization request was registered, indicating that the user was logged in during this request which is not allowed.",
                ));
            }
        }

        if prompt.contains(&"login") {
            let auth_time = auth_time.ok_or_else(missing_auth_time)?;
            if requested_at.map_or(false, |requested_at| auth_time < requested_at) {
                return Err(Error::new(ErrorKind::LoginRequired).with_hint(
                    "Failed to validate OpenID Connect request because prompt was set to 'login' but auth_time happened before the authorization request was registered, indicating that the user was not re-authenticated which is forbidden.",
                ));
            }
        }

        Ok(())
    }
}

fn missing_auth_time() -> Error {
    Error::new(ErrorKind::ServerError)
        .with_debug("Failed to validate OpenID Connect request because auth_time is missing from session.")
}

fn redirects_securely(request: &AuthorizeRequest) -> bool {
    request
        .parameters()
        .get("redirect_uri")
        .and_then(|uri| Url::parse(uri).ok())
        .map_or(false, |url| is_secure(&url))
}
