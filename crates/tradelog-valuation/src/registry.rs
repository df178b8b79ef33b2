/*
[INPUT]:  Canonical asset identifiers
[OUTPUT]: Provider routes (exchange ticker, aggregator mint, or stable peg)
[POS]:    Domain layer - identifier to provider mapping
[UPDATE]: When adding builtin assets or changing route precedence
*/

use std::collections::HashMap;

use crate::asset::CanonicalAssetId;

/// How a canonical asset gets its USD price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRoute {
    /// Pegged 1:1 to USD; resolved locally, never fetched.
    Stable,
    /// Priced from the exchange spot listing under this ticker.
    Exchange { ticker: String },
    /// Priced from the on-chain aggregator under this mint address.
    Aggregator { mint: String },
}

/// Canonical id to provider route table.
///
/// Ships with a builtin table covering the journal's usual assets; config
/// mappings are layered on top and replace builtin entries with the same id.
/// Identifiers without a route are simply unpriceable this cycle.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    routes: HashMap<CanonicalAssetId, ProviderRoute>,
}

const BUILTIN_TICKERS: &[(&str, &str)] = &[
    ("bitcoin", "BTCUSDT"),
    ("ethereum", "ETHUSDT"),
    ("solana", "SOLUSDT"),
    ("binancecoin", "BNBUSDT"),
    ("ripple", "XRPUSDT"),
    ("cardano", "ADAUSDT"),
    ("dogecoin", "DOGEUSDT"),
    ("polkadot", "DOTUSDT"),
    ("avalanche-2", "AVAXUSDT"),
    ("chainlink", "LINKUSDT"),
    ("litecoin", "LTCUSDT"),
    ("sui", "SUIUSDT"),
];

const BUILTIN_MINTS: &[(&str, &str)] = &[
    ("bonk", "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263"),
    ("jupiter", "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN"),
    ("raydium", "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R"),
    ("jito", "jtojtomepa8beP8AuQc6eXt5FriJwfFMwQx2v2f9mCL"),
    ("pyth-network", "HZ1JovNiVvGrGNiiYvEozEVgZ58xaU3RKwX8eACQBCt3"),
    ("render", "rndrizKT3MK1iimdxRdWabcF7Zg7AR5T4nud4EkHBof"),
    ("wrapped-solana", "So11111111111111111111111111111111111111112"),
    ("dogwifcoin", "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm"),
];

const BUILTIN_STABLES: &[&str] = &["usd-coin", "tether", "dai", "usds"];

impl AssetRegistry {
    /// Empty registry; every lookup misses until routes are inserted.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Registry preloaded with the builtin route table.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for (id, ticker) in BUILTIN_TICKERS {
            registry.insert_raw(id, ProviderRoute::Exchange {
                ticker: (*ticker).to_string(),
            });
        }
        for (id, mint) in BUILTIN_MINTS {
            registry.insert_raw(id, ProviderRoute::Aggregator {
                mint: (*mint).to_string(),
            });
        }
        for id in BUILTIN_STABLES {
            registry.insert_raw(id, ProviderRoute::Stable);
        }

        registry
    }

    fn insert_raw(&mut self, id: &str, route: ProviderRoute) {
        // Builtin ids are static lowercase strings; parse cannot miss.
        if let Some(id) = CanonicalAssetId::parse(id) {
            self.routes.insert(id, route);
        }
    }

    /// Insert or replace the route for an id. Later writes win, which is how
    /// config mappings override builtin entries.
    pub fn insert(&mut self, id: CanonicalAssetId, route: ProviderRoute) {
        self.routes.insert(id, route);
    }

    pub fn route(&self, id: &CanonicalAssetId) -> Option<&ProviderRoute> {
        self.routes.get(id)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for AssetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
