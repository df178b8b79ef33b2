/*
[INPUT]:  Canonical asset identifiers from valuation requests
[OUTPUT]: Cached USD price snapshots refreshed on a shared TTL clock
[POS]:    Domain layer - price snapshot cache
[UPDATE]: When changing freshness rules or snapshot replacement
*/

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::asset::{CanonicalAssetId, PriceEntry, PriceMap};
use crate::resolver::PriceResolver;

#[derive(Default)]
struct CacheState {
    entries: HashMap<CanonicalAssetId, PriceEntry>,
    last_refresh_at: Option<Instant>,
}

/// Shared price snapshot with a single freshness clock.
///
/// The whole snapshot is either fresh or stale; there is no per-asset age.
/// A stale request triggers one resolver pass and replaces the snapshot
/// wholesale on success. When the resolver comes back empty-handed the
/// previous snapshot keeps serving, so a provider outage degrades prices
/// to "last known" instead of an error.
///
/// `get_prices` never fails: the worst case is an empty map, and only when
/// no snapshot has ever been taken.
pub struct PriceCache {
    resolver: PriceResolver,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl PriceCache {
    /// A `ttl` of zero refreshes on every request.
    pub fn new(resolver: PriceResolver, ttl: Duration) -> Self {
        Self {
            resolver,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current USD prices for `ids`, refreshing first when the snapshot has
    /// expired. Identifiers the snapshot cannot answer are simply absent.
    ///
    /// The state lock is held across the refresh, so concurrent callers wait
    /// for the one in-flight fetch instead of racing their own.
    pub async fn get_prices(&self, ids: &[CanonicalAssetId]) -> PriceMap {
        if ids.is_empty() {
            return PriceMap::new();
        }

        let mut state = self.state.lock().await;

        if self.is_stale(&state) {
            match self.resolver.resolve(ids).await {
                Ok(fresh) => {
                    let fetched_at = Utc::now();
                    state.entries = fresh
                        .into_iter()
                        .map(|(asset, price)| {
                            (asset.clone(), PriceEntry {
                                asset,
                                price,
                                fetched_at,
                            })
                        })
                        .collect();
                    state.last_refresh_at = Some(Instant::now());
                    info!(assets = state.entries.len(), "price snapshot refreshed");
                }
                Err(err) => {
                    // Clock stays unstamped so the next request tries again.
                    warn!(error = %err, "price refresh failed; serving previous snapshot");
                }
            }
        }

        ids.iter()
            .filter_map(|id| state.entries.get(id).map(|entry| (id.clone(), entry.price)))
            .collect()
    }

    /// Force the next request to refresh while keeping the current entries
    /// around as the fallback snapshot.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.last_refresh_at = None;
        debug!("price cache invalidated");
    }

    /// Clone of the current snapshot, ordered by asset id.
    pub async fn snapshot(&self) -> Vec<PriceEntry> {
        let state = self.state.lock().await;
        let mut entries: Vec<PriceEntry> = state.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.asset.cmp(&b.asset));
        entries
    }

    fn is_stale(&self, state: &CacheState) -> bool {
        match state.last_refresh_at {
            None => true,
            Some(refreshed_at) => refreshed_at.elapsed() >= self.ttl,
        }
    }
}
