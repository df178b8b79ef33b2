/*
[INPUT]:  Canonical asset identifiers needing USD prices
[OUTPUT]: Merged price map from all providers, or an exhaustion error
[POS]:    Domain layer - multi-source price resolution
[UPDATE]: When adding providers or changing merge and filter rules
*/

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use tradelog_pricefeed::PriceSource;

use crate::asset::{CanonicalAssetId, PriceMap};
use crate::registry::{AssetRegistry, ProviderRoute};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Every route either failed or produced nothing. The caller should fall
    /// back to whatever snapshot it already has.
    #[error("no prices resolved for any of the {requested} requested assets")]
    Exhausted { requested: usize },
}

/// Resolves canonical ids to USD prices across both providers.
///
/// Each refresh partitions the request by registry route, issues at most one
/// batched call per provider (concurrently), and merges the answers back into
/// canonical space. A provider failure drops only that provider's partition;
/// the other partitions still resolve.
pub struct PriceResolver {
    registry: AssetRegistry,
    exchange: Arc<dyn PriceSource>,
    aggregator: Arc<dyn PriceSource>,
}

impl PriceResolver {
    pub fn new(
        registry: AssetRegistry,
        exchange: Arc<dyn PriceSource>,
        aggregator: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            registry,
            exchange,
            aggregator,
        }
    }

    /// Resolve USD prices for `ids` in one refresh cycle.
    ///
    /// Stablecoins answer locally at 1.00 and never touch the network.
    /// Identifiers without a registry route are reported once per cycle and
    /// left out of the result. Prices that are not strictly positive are
    /// discarded before they can enter canonical space.
    ///
    /// `Err(Exhausted)` means the cycle was a total failure: every batch
    /// sent upstream came back as an error (stablecoins resolving locally do
    /// not soften this), or a non-empty request yielded nothing at all.
    /// Partial results are a success.
    pub async fn resolve(&self, ids: &[CanonicalAssetId]) -> Result<PriceMap, ResolveError> {
        if ids.is_empty() {
            return Ok(PriceMap::new());
        }

        let mut seen = HashSet::new();
        let unique: Vec<&CanonicalAssetId> = ids.iter().filter(|id| seen.insert(*id)).collect();

        let mut resolved = PriceMap::new();
        let mut exchange_batch: Vec<String> = Vec::new();
        let mut ticker_owners: HashMap<String, Vec<CanonicalAssetId>> = HashMap::new();
        let mut aggregator_batch: Vec<String> = Vec::new();
        let mut mint_owners: HashMap<String, Vec<CanonicalAssetId>> = HashMap::new();
        let mut unmapped: Vec<&str> = Vec::new();

        for id in &unique {
            match self.registry.route(id) {
                Some(ProviderRoute::Stable) => {
                    resolved.insert((*id).clone(), Decimal::ONE);
                }
                Some(ProviderRoute::Exchange { ticker }) => {
                    let owners = ticker_owners.entry(ticker.clone()).or_default();
                    if owners.is_empty() {
                        exchange_batch.push(ticker.clone());
                    }
                    owners.push((*id).clone());
                }
                Some(ProviderRoute::Aggregator { mint }) => {
                    let owners = mint_owners.entry(mint.clone()).or_default();
                    if owners.is_empty() {
                        aggregator_batch.push(mint.clone());
                    }
                    owners.push((*id).clone());
                }
                None => unmapped.push(id.as_str()),
            }
        }

        if !unmapped.is_empty() {
            warn!(
                assets = %unmapped.join(", "),
                count = unmapped.len(),
                "no provider route for some assets; they will value to zero"
            );
        }

        let (exchange_fetched, aggregator_fetched) = tokio::join!(
            self.fetch_logged(self.exchange.as_ref(), &exchange_batch),
            self.fetch_logged(self.aggregator.as_ref(), &aggregator_batch),
        );

        // Empty batches come back Ok-empty from fetch_logged, so `None` here
        // always means a batch was sent and its provider failed. Every sent
        // batch failing is a total failure even when stablecoins resolved
        // locally; the cache keeps its previous snapshot in that case.
        let sent_any = !exchange_batch.is_empty() || !aggregator_batch.is_empty();
        let every_sent_failed = (exchange_batch.is_empty() || exchange_fetched.is_none())
            && (aggregator_batch.is_empty() || aggregator_fetched.is_none());
        if sent_any && every_sent_failed {
            return Err(ResolveError::Exhausted {
                requested: unique.len(),
            });
        }

        merge_fetched(&mut resolved, exchange_fetched, &ticker_owners, "exchange");
        merge_fetched(&mut resolved, aggregator_fetched, &mint_owners, "aggregator");

        if resolved.is_empty() {
            return Err(ResolveError::Exhausted {
                requested: unique.len(),
            });
        }

        Ok(resolved)
    }

    /// Run one provider batch, absorbing its failure into a warning.
    async fn fetch_logged(
        &self,
        source: &dyn PriceSource,
        batch: &[String],
    ) -> Option<HashMap<String, Decimal>> {
        if batch.is_empty() {
            return Some(HashMap::new());
        }

        match source.fetch_batch(batch).await {
            Ok(prices) => Some(prices),
            Err(err) => {
                warn!(
                    source = source.name(),
                    batch_len = batch.len(),
                    error = %err,
                    "price source failed; continuing without it"
                );
                None
            }
        }
    }
}

/// Fold one provider's answers back into canonical space, dropping prices
/// that are not strictly positive.
fn merge_fetched(
    resolved: &mut PriceMap,
    fetched: Option<HashMap<String, Decimal>>,
    owners: &HashMap<String, Vec<CanonicalAssetId>>,
    source_name: &str,
) {
    let Some(fetched) = fetched else {
        return;
    };

    for (native_id, price) in fetched {
        if price <= Decimal::ZERO {
            warn!(
                source = source_name,
                %native_id,
                %price,
                "discarding non-positive price"
            );
            continue;
        }
        if let Some(ids) = owners.get(&native_id) {
            for id in ids {
                resolved.insert(id.clone(), price);
            }
        }
    }
}
