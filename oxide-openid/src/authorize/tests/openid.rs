use std::error::Error as StdError;

use super::*;
use crate::handler::openid::OpenIdConnectExplicitHandler;

type Handler = OpenIdConnectExplicitHandler<Arc<RecordingStorage>, Arc<CountingValidator>>;

struct Setup {
    storage: Arc<RecordingStorage>,
    validator: Arc<CountingValidator>,
}

impl Setup {
    fn new() -> Self {
        Setup {
            storage: Arc::new(RecordingStorage::default()),
            validator: Arc::new(CountingValidator::default()),
        }
    }

    fn handler(&self) -> Handler {
        OpenIdConnectExplicitHandler::new(self.storage.clone(), self.validator.clone())
    }

    fn with_issuer(&self) -> AuthorizeFlow<Vec<Arc<dyn AuthorizeHandler>>> {
        flow(vec![Arc::new(CodeIssuer), Arc::new(self.handler())])
    }
}

#[test]
fn binds_session_to_code() {
    let setup = Setup::new();
    let mut request = request("code", "openid profile", &[("redirect_uri", "https://client/cb")]);
    let response = setup
        .with_issuer()
        .produce_authorization_response(&Context::background(), &mut request, session())
        .unwrap();

    assert_eq!(response.code(), "abc123");
    assert_eq!(response.parameters().get("code"), Some("abc123"));
    assert_eq!(setup.validator.calls(), 1);

    let created = setup.storage.created();
    assert_eq!(created.len(), 1);
    let (code, stored) = &created[0];
    assert_eq!(code, "abc123");
    assert!(stored.parameters.is_empty());
    assert_eq!(stored.client_id, "client");
    assert_eq!(stored.subject.as_deref(), Some("alice"));
    assert_eq!(stored.granted_scopes, "openid profile".parse::<Scope>().unwrap());
}

#[test]
fn code_not_issued() {
    let setup = Setup::new();
    let mut request = request("code", "openid profile", &[("redirect_uri", "https://client/cb")]);
    let err = expect_kind(
        flow(vec![Arc::new(setup.handler())]).produce_authorization_response(
            &Context::background(),
            &mut request,
            session(),
        ),
        ErrorKind::Misconfiguration,
    );
    assert!(err.debug().unwrap().contains("has not been issued"));
    assert!(setup.storage.created().is_empty());
    assert_eq!(setup.validator.calls(), 0);
}

#[test]
fn redirect_uri_required() {
    let setup = Setup::new();
    let ctx = Context::background();

    let mut missing = request("code", "openid", &[]);
    let err = expect_kind(
        setup.with_issuer().produce_authorization_response(&ctx, &mut missing, session()),
        ErrorKind::InvalidRequest,
    );
    assert_eq!(
        err.hint(),
        "The 'redirect_uri' parameter is required when using OpenID Connect 1.0."
    );

    let mut empty = request("code", "openid", &[("redirect_uri", "")]);
    expect_kind(
        setup.with_issuer().produce_authorization_response(&ctx, &mut empty, session()),
        ErrorKind::InvalidRequest,
    );

    assert!(setup.storage.created().is_empty());
    assert_eq!(setup.validator.calls(), 0);
}

#[test]
fn only_explicit_openid_requests() {
    let setup = Setup::new();
    let handler = setup.handler();
    let ctx = Context::background();

    let mut requests = vec![
        request("code", "profile", &[("redirect_uri", "https://client/cb")]),
        request("code id_token", "openid", &[("redirect_uri", "https://client/cb")]),
        request("id_token", "openid", &[]),
    ];

    for request in requests.iter_mut() {
        request.set_session(session());
        let mut response = AuthorizeResponse::new();
        response.set_code("abc123").unwrap();
        let before = response.clone();

        handler.handle(&ctx, request, &mut response).unwrap();
        assert_eq!(response, before);
    }

    assert!(setup.storage.created().is_empty());
    assert_eq!(setup.validator.calls(), 0);
}

#[test]
fn does_not_mark_handled() {
    let setup = Setup::new();
    let mut request = request("code", "openid", &[("redirect_uri", "https://client/cb")]);
    request.set_session(session());
    let mut response = AuthorizeResponse::new();
    response.set_code("abc123").unwrap();

    setup
        .handler()
        .handle(&Context::background(), &mut request, &mut response)
        .unwrap();
    assert!(!response.is_response_type_handled("code"));
    assert!(response.parameters().is_empty());
    assert_eq!(setup.storage.created().len(), 1);
}

#[test]
fn stores_sanitized_parameters() {
    let setup = Setup::new();
    let mut request = request(
        "code",
        "openid",
        &[
            ("redirect_uri", "https://client/cb"),
            ("nonce", "n-0S6_WzA2Mj"),
            ("state", "af0ifjsldkj"),
            ("client_secret", "hunter2"),
            ("prompt", "consent"),
            ("max_age", "3600"),
            ("acr_values", "urn:mace:incommon:iap:silver"),
            ("login_hint", "alice@example.com"),
        ],
    );
    setup
        .with_issuer()
        .produce_authorization_response(&Context::background(), &mut request, session())
        .unwrap();

    let created = setup.storage.created();
    let stored: Vec<_> = created[0].1.parameters.iter().collect();
    assert_eq!(
        stored,
        vec![
            ("nonce", "n-0S6_WzA2Mj"),
            ("prompt", "consent"),
            ("max_age", "3600"),
            ("acr_values", "urn:mace:incommon:iap:silver"),
        ]
    );
}

#[test]
fn prompt_rejection_propagates() {
    let setup = Setup {
        storage: Arc::new(RecordingStorage::default()),
        validator: Arc::new(CountingValidator::rejecting(ErrorKind::LoginRequired)),
    };
    let mut request = request("code", "openid", &[("redirect_uri", "https://client/cb")]);
    expect_kind(
        setup
            .with_issuer()
            .produce_authorization_response(&Context::background(), &mut request, session()),
        ErrorKind::LoginRequired,
    );
    assert_eq!(setup.validator.calls(), 1);
    assert!(setup.storage.created().is_empty());
}

#[test]
fn storage_failure_is_server_error() {
    let setup = Setup {
        storage: Arc::new(RecordingStorage::failing(StorageError::Backend(
            "connection refused by 10.0.0.7".to_string(),
        ))),
        validator: Arc::new(CountingValidator::default()),
    };
    let mut request = request("code", "openid", &[("redirect_uri", "https://client/cb")]);
    let err = expect_kind(
        setup
            .with_issuer()
            .produce_authorization_response(&Context::background(), &mut request, session()),
        ErrorKind::ServerError,
    );

    assert!(!err.hint().contains("10.0.0.7"));
    assert!(!err.iter().any(|(_, value)| value.contains("10.0.0.7")));
    assert!(err.debug().unwrap().contains("10.0.0.7"));
    assert!(err.source().is_some());
}
