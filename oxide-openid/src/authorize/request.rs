use chrono::Utc;

use crate::error::{Error, ErrorKind, Result};
use crate::primitives::client::Client;
use crate::primitives::parameters::Parameters;
use crate::primitives::response_type::{ResponseMode, ResponseTypes};
use crate::primitives::scope::Scope;
use crate::primitives::session::Session;
use crate::primitives::Time;

/// A validated authorization request, ready to be run through the handler chain.
///
/// Granted scopes and response types are final once the request is constructed: handlers get
/// mutable access to the request only to reach the attached session, there is no way to alter
/// what was requested or granted.
#[derive(Debug)]
pub struct AuthorizeRequest {
    client: Client,
    response_types: ResponseTypes,
    granted_scopes: Scope,
    parameters: Parameters,
    default_response_mode: ResponseMode,
    response_mode: ResponseMode,
    requested_at: Time,
    session: Option<Box<dyn Session>>,
}

impl AuthorizeRequest {
    /// Assemble a request from its bound client, the requested response types, the scope the
    /// resource owner granted and the raw parameters of the request.
    ///
    /// The default response mode follows the client's policy if it has one, otherwise it is
    /// derived from the response types. The resolved mode is the `response_mode` parameter, or the
    /// default if the parameter is absent. An unknown `response_mode` is an invalid request.
    pub fn new(
        client: Client, response_types: ResponseTypes, granted_scopes: Scope, parameters: Parameters,
    ) -> Result<Self> {
        let default_response_mode = client
            .default_response_mode
            .unwrap_or_else(|| ResponseMode::default_for(&response_types));

        let response_mode = match parameters.get("response_mode") {
            None | Some("") => default_response_mode,
            Some(mode) => mode.parse::<ResponseMode>().map_err(|err| {
                Error::new(ErrorKind::InvalidRequest)
                    .with_hint(format!("The response_mode '{}' is not supported.", mode))
                    .with_cause(err)
            })?,
        };

        Ok(AuthorizeRequest {
            client,
            response_types,
            granted_scopes,
            parameters,
            default_response_mode,
            response_mode,
            requested_at: Utc::now(),
            session: None,
        })
    }

    /// Override the time the request was registered at.
    ///
    /// Useful when a request is resumed after an interaction with the resource owner, such as a
    /// login page, and should keep its original registration time.
    pub fn with_requested_at(mut self, requested_at: Time) -> Self {
        self.requested_at = requested_at;
        self
    }

    /// The client making the request.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The response types requested by the client.
    pub fn response_types(&self) -> &ResponseTypes {
        &self.response_types
    }

    /// The scope granted to the client.
    pub fn granted_scopes(&self) -> &Scope {
        &self.granted_scopes
    }

    /// The raw parameters of the request.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// The mode the client's policy or the response types call for.
    pub fn default_response_mode(&self) -> ResponseMode {
        self.default_response_mode
    }

    /// The mode the response will be delivered in.
    pub fn response_mode(&self) -> ResponseMode {
        self.response_mode
    }

    /// The `state` parameter, if the client sent one.
    pub fn state(&self) -> Option<&str> {
        self.parameters.get("state").filter(|state| !state.is_empty())
    }

    /// When the request was registered.
    pub fn requested_at(&self) -> Time {
        self.requested_at
    }

    /// Attach the session of the call, replacing any previous one.
    pub fn set_session(&mut self, session: Box<dyn Session>) {
        self.session = Some(session);
    }

    /// The session of the call, if one was attached.
    pub fn session(&self) -> Option<&dyn Session> {
        self.session.as_deref()
    }

    /// Mutable access to the session, for recording expiry of issued credentials.
    pub fn session_mut(&mut self) -> Option<&mut (dyn Session + 'static)> {
        self.session.as_deref_mut()
    }

    /// Detach the session, returning it to the caller.
    pub fn take_session(&mut self) -> Option<Box<dyn Session>> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(types: &str, parameters: Parameters) -> Result<AuthorizeRequest> {
        AuthorizeRequest::new(
            Client::confidential("client"),
            types.parse().unwrap(),
            "openid".parse().unwrap(),
            parameters,
        )
    }

    #[test]
    fn response_mode_defaults() {
        let code = request("code", Parameters::new()).unwrap();
        assert_eq!(code.default_response_mode(), ResponseMode::Query);
        assert_eq!(code.response_mode(), ResponseMode::Query);

        let hybrid = request("code id_token", Parameters::new()).unwrap();
        assert_eq!(hybrid.default_response_mode(), ResponseMode::Fragment);
        assert_eq!(hybrid.response_mode(), ResponseMode::Fragment);
    }

    #[test]
    fn explicit_response_mode() {
        let parameters = vec![("response_mode", "query")].into_iter().collect();
        let request = request("token", parameters).unwrap();
        assert_eq!(request.default_response_mode(), ResponseMode::Fragment);
        assert_eq!(request.response_mode(), ResponseMode::Query);
    }

    #[test]
    fn client_policy_overrides_default() {
        let mut client = Client::confidential("client");
        client.default_response_mode = Some(ResponseMode::FormPost);
        let request = AuthorizeRequest::new(
            client,
            "code".parse().unwrap(),
            Scope::default(),
            Parameters::new(),
        )
        .unwrap();
        assert_eq!(request.default_response_mode(), ResponseMode::FormPost);
        assert_eq!(request.response_mode(), ResponseMode::FormPost);
    }

    #[test]
    fn unknown_response_mode() {
        let parameters = vec![("response_mode", "web_message")].into_iter().collect();
        match request("code", parameters) {
            Err(ref err) if err.kind() == ErrorKind::InvalidRequest => (),
            other => panic!("Expected invalid request: {:?}", other),
        }
    }

    #[test]
    fn empty_state_is_absent() {
        let parameters = vec![("state", "")].into_iter().collect();
        assert_eq!(request("code", parameters).unwrap().state(), None);
    }
}
