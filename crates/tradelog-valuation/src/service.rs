/*
[INPUT]:  Validated application configuration and journal holdings
[OUTPUT]: Live portfolio valuations backed by the cached price feed
[POS]:    Service layer - composition of feed, cache, and engine
[UPDATE]: When wiring new providers or changing valuation entry points
*/

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use tradelog_pricefeed::{AggregatorSource, ClientConfig, ExchangeSource, FeedClient};

use crate::asset::{CanonicalAssetId, PriceEntry, PriceMap};
use crate::cache::PriceCache;
use crate::config::AppConfig;
use crate::registry::AssetRegistry;
use crate::resolver::PriceResolver;
use crate::valuation::{Holding, PortfolioValuation, ValuationEngine};

/// Portfolio valuation facade: one call values a set of holdings against
/// the freshest prices the cache will serve.
pub struct PortfolioService {
    cache: PriceCache,
    engine: ValuationEngine,
}

impl PortfolioService {
    /// Wire the full stack from configuration: HTTP client, provider
    /// sources, registry (builtin table plus config mappings), cache,
    /// and valuation engine.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client_config = ClientConfig {
            timeout: config.pricing.timeout(),
            connect_timeout: config.pricing.connect_timeout(),
        };
        let client = FeedClient::with_base_urls(
            client_config,
            &config.pricing.exchange_base_url,
            &config.pricing.aggregator_base_url,
        )
        .context("build feed client")?;

        let mut registry = AssetRegistry::with_defaults();
        for mapping in &config.assets {
            let (id, route) = mapping.route()?;
            registry.insert(id, route);
        }
        info!(routes = registry.len(), "asset registry ready");

        let resolver = PriceResolver::new(
            registry,
            Arc::new(ExchangeSource::new(client.clone())),
            Arc::new(AggregatorSource::new(client)),
        );
        let cache = PriceCache::new(resolver, config.pricing.ttl());
        let engine = ValuationEngine::new(config.pricing.pln_rate()?);

        Ok(Self { cache, engine })
    }

    /// Assemble from already-built parts.
    pub fn with_parts(cache: PriceCache, engine: ValuationEngine) -> Self {
        Self { cache, engine }
    }

    /// Current USD prices for raw identifiers, serving fresh cache entries
    /// or refreshing first. Blank identifiers are dropped; unresolvable ones
    /// are simply absent from the result.
    pub async fn live_prices(&self, raw_ids: &[String]) -> PriceMap {
        let assets: Vec<CanonicalAssetId> = raw_ids
            .iter()
            .filter_map(|raw| CanonicalAssetId::parse(raw))
            .collect();
        self.cache.get_prices(&assets).await
    }

    /// Value the given holdings. Crypto positions drive one cache lookup;
    /// fiat and external balances never touch the price feed.
    pub async fn value_portfolio(&self, holdings: &[Holding]) -> PortfolioValuation {
        let assets: Vec<CanonicalAssetId> = holdings
            .iter()
            .filter_map(|holding| match holding {
                Holding::Crypto { asset, .. } => Some(asset.clone()),
                _ => None,
            })
            .collect();

        let prices = self.cache.get_prices(&assets).await;
        self.engine.value_portfolio(holdings, &prices)
    }

    /// Current cached prices, for display alongside a valuation.
    pub async fn price_snapshot(&self) -> Vec<PriceEntry> {
        self.cache.snapshot().await
    }
}
