//! Shared helpers for the integration tests.
#![allow(dead_code)]

pub mod fake_conduit;

use conduit_e2e_core::config::Config;
use url::Url;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer};

use fake_conduit::FakeConduit;

/// Starts a mock server backed by a fresh [`FakeConduit`].
///
/// Returns the server, which must stay alive for the test, and a config that
/// points at it.
pub async fn start_fake_conduit() -> (MockServer, Config) {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(FakeConduit::default())
        .mount(&server)
        .await;
    let mut config = Config::for_base_url(Url::parse(&server.uri()).unwrap());
    config.prefix = "e2e-".to_string();
    (server, config)
}
