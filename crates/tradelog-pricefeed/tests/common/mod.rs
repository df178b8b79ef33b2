/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for tradelog-pricefeed tests

use tradelog_pricefeed::{ClientConfig, FeedClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Build a feed client with both upstream base URLs pointed at the mock server
pub fn client_for(server: &MockServer) -> FeedClient {
    FeedClient::with_base_urls(ClientConfig::default(), &server.uri(), &server.uri())
        .expect("feed client should build against mock server")
}

/// Exchange listing body covering the fixture symbols used across tests
pub fn exchange_listing_body() -> &'static str {
    r#"[
        {"symbol":"BTCUSDT","price":"60000.00000000"},
        {"symbol":"ETHUSDT","price":"2400.12000000"},
        {"symbol":"SOLUSDT","price":"150.33000000"},
        {"symbol":"XYZUSDT","price":"0.00000000"}
    ]"#
}
