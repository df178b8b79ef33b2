/*
[INPUT]:  None (the exchange offers no server-side symbol filtering)
[OUTPUT]: Full spot ticker listing as typed rows
[POS]:    HTTP layer - exchange price endpoint (no auth required)
[UPDATE]: When the exchange listing endpoint or response format changes
*/

use reqwest::Method;

use crate::http::{FeedClient, Result};
use crate::types::TickerPrice;

impl FeedClient {
    /// Fetch the exchange's full spot ticker listing.
    ///
    /// GET /api/v3/ticker/price
    ///
    /// The endpoint returns every tradable pair; callers filter client-side
    /// for the tickers they care about.
    pub async fn ticker_prices(&self) -> Result<Vec<TickerPrice>> {
        let builder = self.exchange_request(Method::GET, "/api/v3/ticker/price")?;
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, FeedClient, FeedError};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ticker_prices() {
        let server = MockServer::start().await;
        let mock_response = r#"[
            {"symbol":"BTCUSDT","price":"60000.00000000"},
            {"symbol":"ETHUSDT","price":"2400.12000000"},
            {"symbol":"XYZUSDT","price":"0.00000000"}
        ]"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(mock_response, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client =
            FeedClient::with_base_urls(ClientConfig::default(), &server.uri(), &server.uri())
                .expect("client init");

        let listing = client.ticker_prices().await.expect("ticker_prices failed");

        assert_eq!(listing.len(), 3);
        assert_eq!(listing[0].symbol, "BTCUSDT");
        assert_eq!(listing[0].price, Decimal::from_str("60000").unwrap());
        // Zero rows are delivered verbatim; filtering happens upstream of here.
        assert_eq!(listing[2].price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_ticker_prices_server_error() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let client =
            FeedClient::with_base_urls(ClientConfig::default(), &server.uri(), &server.uri())
                .expect("client init");

        let err = client.ticker_prices().await.expect_err("should fail");
        match err {
            FeedError::Api { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ticker_prices_malformed_body() {
        let server = MockServer::start().await;

        let _mock = Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_raw(r#"{"unexpected":"shape"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client =
            FeedClient::with_base_urls(ClientConfig::default(), &server.uri(), &server.uri())
                .expect("client init");

        let err = client.ticker_prices().await.expect_err("should fail");
        assert!(matches!(err, FeedError::Serialization(_)));
    }
}
