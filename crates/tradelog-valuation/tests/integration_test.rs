/*
[INPUT]:  Mock upstream price endpoints and YAML portfolio configuration
[OUTPUT]: End-to-end valuation totals through feed, cache, and engine
[POS]:    Integration test layer - full system verification
[UPDATE]: When adding new end-to-end scenarios
*/

use std::str::FromStr;

use rust_decimal::Decimal;
use tokio_test::assert_ok;
use tradelog_valuation::{AppConfig, PortfolioService, to_cents};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BONK_MINT: &str = "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263";

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("valid decimal")
}

fn portfolio_config(server_uri: &str, ttl_secs: u64) -> AppConfig {
    let raw = format!(
        r#"
pricing:
  ttl_secs: {ttl_secs}
  exchange_base_url: "{server_uri}"
  aggregator_base_url: "{server_uri}"
assets:
  - id: "xyz-token"
    ticker: "XYZUSDT"
holdings:
  - kind: crypto
    asset: "bitcoin"
    quantity: "2.5"
  - kind: crypto
    asset: "bonk"
    quantity: "1000000"
  - kind: crypto
    asset: "usd-coin"
    quantity: "500"
  - kind: crypto
    asset: "xyz-token"
    quantity: "10"
  - kind: crypto
    asset: "mystery-token"
    quantity: "5"
  - kind: fiat
    currency: "pln"
    balance: "16475"
  - kind: fiat
    currency: "usd"
    balance: "1000"
  - kind: external
    label: "brokerage"
    balance: "250.75"
"#
    );
    let config: AppConfig = serde_yaml::from_str(&raw).expect("config parses");
    config.validate().expect("config validates");
    config
}

async fn mount_healthy_upstreams(server: &MockServer, expected_calls: u64) {
    // XYZUSDT deliberately lists at zero; it must never become a price.
    let listing = r#"[
        {"symbol":"BTCUSDT","price":"60000.00000000"},
        {"symbol":"ETHUSDT","price":"2400.12000000"},
        {"symbol":"XYZUSDT","price":"0"}
    ]"#;

    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_raw(listing, "application/json"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;

    let aggregator_body = format!(r#"{{"data":{{"{BONK_MINT}":{{"price":"0.0000214"}}}}}}"#);
    Mock::given(method("GET"))
        .and(path("/price/v2"))
        .and(query_param("ids", BONK_MINT))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_raw(aggregator_body, "application/json"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_portfolio_flow_across_both_providers() {
    let server = MockServer::start().await;
    mount_healthy_upstreams(&server, 1).await;

    let config = portfolio_config(&server.uri(), 60);
    let service = assert_ok!(PortfolioService::from_config(&config));
    let holdings = config.to_holdings().expect("holdings parse");

    let valuation = service.value_portfolio(&holdings).await;

    // 2.5 * 60000 + 1000000 * 0.0000214 + 500 * 1.00 + 0 + 0
    //   + 16475 / 4.45 + 1000 + 250.75
    assert_eq!(valuation.total_cents(), dec("155474.40"));

    assert_eq!(to_cents(valuation.lines[0].value_usd), dec("150000.00"));
    assert_eq!(to_cents(valuation.lines[1].value_usd), dec("21.40"));
    assert_eq!(valuation.lines[2].value_usd, dec("500"));
    // Zero-listed and unmapped assets contribute nothing, without erroring.
    assert_eq!(valuation.lines[3].value_usd, Decimal::ZERO);
    assert_eq!(valuation.lines[4].value_usd, Decimal::ZERO);

    // A second valuation inside the TTL reuses the snapshot; the expect(1)
    // mocks fail verification if another upstream call happens.
    let again = service.value_portfolio(&holdings).await;
    assert_eq!(again.total_cents(), valuation.total_cents());
    server.verify().await;
}

#[tokio::test]
async fn upstream_outage_falls_back_to_the_last_snapshot() {
    let server = MockServer::start().await;
    mount_healthy_upstreams(&server, 1).await;

    // ttl 0: every valuation attempts a refresh.
    let config = portfolio_config(&server.uri(), 0);
    let service = assert_ok!(PortfolioService::from_config(&config));
    let holdings = config.to_holdings().expect("holdings parse");

    let healthy = service.value_portfolio(&holdings).await;
    assert_eq!(healthy.total_cents(), dec("155474.40"));

    // Drop the mocks; both upstreams now answer 404 and the refresh fails.
    // The usd-coin holding still resolves locally, but that must not shrink
    // the snapshot: the stored provider prices keep serving.
    server.reset().await;

    let degraded = service.value_portfolio(&holdings).await;
    assert_eq!(degraded.total_cents(), healthy.total_cents());
    assert_eq!(to_cents(degraded.lines[0].value_usd), dec("150000.00"));
    assert_eq!(degraded.lines[2].value_usd, dec("500"));
}

#[tokio::test]
async fn fiat_only_portfolio_needs_no_upstream() {
    // No mocks mounted at all: any request would fail loudly.
    let server = MockServer::start().await;

    let raw = format!(
        r#"
pricing:
  ttl_secs: 0
  exchange_base_url: "{uri}"
  aggregator_base_url: "{uri}"
holdings:
  - kind: fiat
    currency: "pln"
    balance: "4450"
  - kind: fiat
    currency: "usd"
    balance: "1000"
"#,
        uri = server.uri()
    );
    let config: AppConfig = serde_yaml::from_str(&raw).expect("config parses");
    let service = assert_ok!(PortfolioService::from_config(&config));
    let holdings = config.to_holdings().expect("holdings parse");

    let valuation = service.value_portfolio(&holdings).await;
    assert_eq!(valuation.total_cents(), dec("2000.00"));
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), 0);
}
