/*
[INPUT]:  Upstream API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - wire types for both upstream price providers
[UPDATE]: When an upstream schema changes or new payload fields are needed
*/

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the exchange's full spot ticker listing.
///
/// The exchange serializes prices as decimal strings; a row that fails to
/// parse fails the whole listing, which the caller treats as a provider
/// failure for this refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

/// Aggregator response: an object keyed by mint address.
///
/// Mints unknown to the aggregator come back as `null` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorPriceResponse {
    pub data: HashMap<String, Option<AggregatorPriceEntry>>,
}

/// Per-mint payload inside the aggregator response.
///
/// The aggregator is loose about the `price` field: strings and raw numbers
/// both occur in the wild, and garbage values ("NaN", objects) are mapped to
/// `None` rather than failing the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorPriceEntry {
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient_decimal_opt",
        serialize_with = "serde_helpers::serialize_decimal_opt"
    )]
    pub price: Option<Decimal>,
}

impl AggregatorPriceResponse {
    /// Flatten to a mint → price map, skipping null and unparseable entries.
    pub fn into_price_map(self) -> HashMap<String, Decimal> {
        self.data
            .into_iter()
            .filter_map(|(mint, entry)| Some((mint, entry?.price?)))
            .collect()
    }
}

mod serde_helpers {
    use super::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use std::str::FromStr;

    /// Accept a decimal as a JSON string or number; anything else (null,
    /// garbage strings, nested values) quietly becomes `None`.
    pub fn lenient_decimal_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let parsed = match &value {
            Value::String(raw) => Decimal::from_str(raw.trim()).ok(),
            Value::Number(num) => Decimal::from_str(&num.to_string()).ok(),
            _ => None,
        };

        Ok(parsed)
    }

    pub fn serialize_decimal_opt<S>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(decimal) => serializer.serialize_str(&decimal.to_string()),
            None => serializer.serialize_none(),
        }
    }
}
