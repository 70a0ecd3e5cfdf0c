#![allow(dead_code)]

use cdfapi::{Client, ClientConfig, Token};
use httpmock::MockServer;

pub const PROJECT: &str = "test-project";

/// Client pointed at the mock server, authenticated with a fixed token.
pub fn client(server: &MockServer) -> Client {
    let config = ClientConfig::new("test-client", "test-cluster", PROJECT, Token::new("test-token"))
        .with_base_url(server.base_url());
    Client::new(config).unwrap()
}

pub fn path(suffix: &str) -> String {
    format!("/api/v1/projects/{}{}", PROJECT, suffix)
}
