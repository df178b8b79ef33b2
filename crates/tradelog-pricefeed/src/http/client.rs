/*
[INPUT]:  HTTP configuration (base URLs, timeouts)
[OUTPUT]: Configured reqwest client ready for upstream price calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::http::error::{FeedError, Result};

/// Base URLs for the upstream price providers
/// Production exchange REST endpoint.
pub const EXCHANGE_BASE_URL: &str = "https://api.binance.com";
/// Production aggregator REST endpoint.
pub const AGGREGATOR_BASE_URL: &str = "https://lite-api.jup.ag";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Main HTTP client shared by both upstream price sources.
///
/// Every request is bounded by the configured timeout; a timed-out call
/// surfaces as a transport error for that source only.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http_client: Client,
    exchange_base_url: Url,
    aggregator_base_url: Url,
}

impl FeedClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_base_urls(config, EXCHANGE_BASE_URL, AGGREGATOR_BASE_URL)
    }

    /// Create a client pointing at explicit base URLs.
    ///
    /// Production callers usually go through `with_config`; tests point both
    /// URLs at a mock server.
    pub fn with_base_urls(
        config: ClientConfig,
        exchange_base_url: &str,
        aggregator_base_url: &str,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            exchange_base_url: Url::parse(exchange_base_url)?,
            aggregator_base_url: Url::parse(aggregator_base_url)?,
        })
    }

    /// Build full URL for exchange endpoints
    fn exchange_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.exchange_base_url.join(endpoint)?)
    }

    /// Build full URL for aggregator endpoints
    fn aggregator_url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.aggregator_base_url.join(endpoint)?)
    }

    /// Build request builder for exchange endpoints
    pub(crate) fn exchange_request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.exchange_url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Build request builder for aggregator endpoints
    pub(crate) fn aggregator_request(
        &self,
        method: Method,
        endpoint: &str,
    ) -> Result<RequestBuilder> {
        let url = self.aggregator_url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and deserialize the JSON body.
    ///
    /// Non-2xx statuses become `FeedError::Api` carrying the response body;
    /// bodies that fail to deserialize become `FeedError::Serialization`.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "upstream response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::api_error(status, body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
