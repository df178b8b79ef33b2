/*
[INPUT]:  Native provider identifiers (exchange tickers or aggregator mints)
[OUTPUT]: Per-identifier USD prices from a single batched upstream call
[POS]:    Source layer - uniform async interface over price providers
[UPDATE]: When adding a new price provider or changing batch semantics
*/

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::http::{FeedClient, FeedError, Result};

/// A price provider that answers one batched request per refresh cycle.
///
/// Implementations key their result map by the provider's native identifier
/// (ticker or mint). Identifiers the provider does not know are simply left
/// out of the map; only transport or protocol problems surface as errors.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Short provider label used in logs.
    fn name(&self) -> &'static str;

    /// Fetch USD prices for the given native identifiers in one request.
    async fn fetch_batch(&self, native_ids: &[String]) -> Result<HashMap<String, Decimal>>;
}

/// Centralized-exchange source backed by the full spot ticker listing.
///
/// The exchange endpoint has no server-side filter, so every call downloads
/// the complete listing and keeps only the requested symbols.
pub struct ExchangeSource {
    client: FeedClient,
}

impl ExchangeSource {
    pub fn new(client: FeedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PriceSource for ExchangeSource {
    fn name(&self) -> &'static str {
        "exchange"
    }

    async fn fetch_batch(&self, native_ids: &[String]) -> Result<HashMap<String, Decimal>> {
        if native_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let wanted: HashSet<&str> = native_ids.iter().map(String::as_str).collect();
        let listing = self.client.ticker_prices().await?;

        Ok(listing
            .into_iter()
            .filter(|ticker| wanted.contains(ticker.symbol.as_str()))
            .map(|ticker| (ticker.symbol, ticker.price))
            .collect())
    }
}

/// On-chain aggregator source quoting tokens by mint address.
pub struct AggregatorSource {
    client: FeedClient,
}

impl AggregatorSource {
    pub fn new(client: FeedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PriceSource for AggregatorSource {
    fn name(&self) -> &'static str {
        "aggregator"
    }

    async fn fetch_batch(&self, native_ids: &[String]) -> Result<HashMap<String, Decimal>> {
        if native_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Repeated mints would bloat the query string without changing the
        // answer, so deduplicate while preserving request order.
        let mut seen = HashSet::new();
        let mints: Vec<String> = native_ids
            .iter()
            .filter(|mint| seen.insert(mint.as_str()))
            .cloned()
            .collect();

        let response = self.client.aggregator_prices(&mints).await?;

        let wanted: HashSet<&str> = native_ids.iter().map(String::as_str).collect();
        let mut prices = response.into_price_map();
        prices.retain(|mint, _| wanted.contains(mint.as_str()));
        Ok(prices)
    }
}

/// In-memory source with scriptable prices and failures.
///
/// Exported for downstream crates that need a deterministic provider in
/// tests without standing up a mock HTTP server.
pub struct StaticPriceSource {
    name: &'static str,
    prices: Mutex<HashMap<String, Decimal>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl StaticPriceSource {
    pub fn new(name: &'static str, prices: HashMap<String, Decimal>) -> Self {
        Self {
            name,
            prices: Mutex::new(prices),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty(name: &'static str) -> Self {
        Self::new(name, HashMap::new())
    }

    /// Replace or insert the price served for a native identifier.
    pub fn set_price(&self, native_id: &str, price: Decimal) {
        let mut prices = self.prices.lock().unwrap_or_else(|e| e.into_inner());
        prices.insert(native_id.to_string(), price);
    }

    /// Stop serving a native identifier entirely.
    pub fn remove_price(&self, native_id: &str) {
        let mut prices = self.prices.lock().unwrap_or_else(|e| e.into_inner());
        prices.remove(native_id);
    }

    /// Toggle whether subsequent fetches fail with a simulated outage.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetch_batch calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch_batch(&self, native_ids: &[String]) -> Result<HashMap<String, Decimal>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        // Yield once so concurrent callers genuinely interleave under test.
        tokio::task::yield_now().await;

        if self.failing.load(Ordering::SeqCst) {
            return Err(FeedError::Api {
                status: 503,
                body: format!("{} offline", self.name),
            });
        }

        let prices = self.prices.lock().unwrap_or_else(|e| e.into_inner());
        Ok(native_ids
            .iter()
            .filter_map(|id| prices.get(id).map(|price| (id.clone(), *price)))
            .collect())
    }
}
