/*
[INPUT]:  Raw asset identifier strings from config and journal entries
[OUTPUT]: Normalized canonical identifiers and priced snapshot entries
[POS]:    Domain layer - identifier and price primitives
[UPDATE]: When identifier normalization or snapshot metadata changes
*/

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical asset identifier: trimmed, lowercased, never empty.
///
/// Registry lookups, cache keys, and valuation joins all use this form, so
/// "Bitcoin", " BITCOIN " and "bitcoin" name the same asset everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalAssetId(String);

impl CanonicalAssetId {
    /// Normalize a raw identifier. Returns `None` when nothing remains
    /// after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalAssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CanonicalAssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CanonicalAssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom("asset identifier must be non-empty"))
    }
}

/// USD prices keyed by canonical identifier, as handed to the valuation
/// engine. Absence of a key means the asset could not be priced this cycle.
pub type PriceMap = HashMap<CanonicalAssetId, Decimal>;

/// One cached price with the moment it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub asset: CanonicalAssetId,
    pub price: Decimal,
    pub fetched_at: DateTime<Utc>,
}

impl PriceEntry {
    pub fn new(asset: CanonicalAssetId, price: Decimal) -> Self {
        Self {
            asset,
            price,
            fetched_at: Utc::now(),
        }
    }
}
