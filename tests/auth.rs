mod common;

use cdfapi::{Client, ClientConfig, CredentialProvider, Error, OAuthClientCredentials};
use httpmock::prelude::*;
use serde_json::json;

fn credentials(server: &MockServer) -> OAuthClientCredentials {
    OAuthClientCredentials::new("my-client", "my-secret", "https://login.example/tenant", "westeurope-1")
        .unwrap()
        .with_token_url(server.url("/token"))
}

#[test]
fn token_is_cached_until_expiry() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::POST)
            .path("/token")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials&client_id=my-client&client_secret=my-secret&scope=https%3A%2F%2Fwesteurope-1.cognitedata.com%2F.default");
        then.status(200).json_body(json!({
            "access_token": "fresh-token",
            "token_type": "Bearer",
            "expires_in": 3599
        }));
    });

    let creds = credentials(&server);
    assert_eq!(creds.fetch_token().unwrap(), "fresh-token");
    assert_eq!(creds.fetch_token().unwrap(), "fresh-token");
    mock.assert_hits(1);
}

#[test]
fn short_lived_token_is_refetched() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(Method::POST).path("/token");
        then.status(200)
            .json_body(json!({"access_token": "short", "expires_in": 30}));
    });

    let creds = credentials(&server);
    creds.fetch_token().unwrap();
    creds.fetch_token().unwrap();
    mock.assert_hits(2);
}

#[test]
fn rejected_credentials_are_an_auth_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::POST).path("/token");
        then.status(401).json_body(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        }));
    });

    let err = credentials(&server).fetch_token().unwrap_err();
    match err {
        Error::Auth(msg) => {
            assert!(msg.contains("invalid_client"), "{msg}");
            assert!(msg.contains("401"), "{msg}");
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[test]
fn client_sends_acquired_token() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::POST).path("/token");
        then.status(200)
            .json_body(json!({"access_token": "issued-token", "expires_in": 3600}));
    });
    let api = server.mock(|when, then| {
        when.method(Method::GET)
            .path(common::path("/units"))
            .header("authorization", "Bearer issued-token");
        then.status(200).json_body(json!({"items": []}));
    });

    let config = ClientConfig::new(
        "test-client",
        "westeurope-1",
        common::PROJECT,
        credentials(&server),
    )
    .with_base_url(server.base_url());
    let client = Client::new(config).unwrap();
    let units = client.units().list().unwrap();

    api.assert();
    assert!(units.items.is_empty());
}

#[test]
fn client_construction_fails_without_token() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(Method::POST).path("/token");
        then.status(400).body("bad request");
    });

    let config = ClientConfig::new("app", "westeurope-1", "p", credentials(&server))
        .with_base_url(server.base_url());
    assert!(matches!(Client::new(config), Err(Error::Auth(_))));
}
