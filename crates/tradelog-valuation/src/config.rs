/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed pricing, asset mapping, and holdings configuration
[POS]:    Configuration layer - journal setup
[UPDATE]: When adding new configuration options
*/

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, anyhow, bail, ensure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradelog_pricefeed::{AGGREGATOR_BASE_URL, EXCHANGE_BASE_URL};

use crate::asset::CanonicalAssetId;
use crate::registry::ProviderRoute;
use crate::valuation::{FiatCurrency, Holding};

/// Top-level configuration for the valuation run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Pricing and cache tuning
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Extra asset mappings layered over the builtin registry
    #[serde(default)]
    pub assets: Vec<AssetMappingConfig>,
    /// Journal positions to value
    pub holdings: Vec<HoldingConfig>,
}

/// Pricing, cache, and upstream endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    /// Seconds a snapshot stays fresh; 0 refreshes on every request
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Overall request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Exchange REST base URL
    #[serde(default = "default_exchange_base_url")]
    pub exchange_base_url: String,
    /// Aggregator REST base URL
    #[serde(default = "default_aggregator_base_url")]
    pub aggregator_base_url: String,
    /// Fixed PLN per USD divisor, e.g. "4.45"
    #[serde(default = "default_pln_usd_rate")]
    pub pln_usd_rate: String,
}

/// One asset mapping: a canonical id plus exactly one provider route
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssetMappingConfig {
    /// Canonical identifier, e.g. "bitcoin"
    pub id: String,
    /// Exchange ticker, e.g. "BTCUSDT"
    #[serde(default)]
    pub ticker: Option<String>,
    /// Aggregator mint address
    #[serde(default)]
    pub mint: Option<String>,
    /// USD stablecoin pegged at 1.00
    #[serde(default)]
    pub stable: bool,
}

/// One journal position as written in the config file.
///
/// Amounts are strings so they never take a float detour on the way to
/// `Decimal`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HoldingConfig {
    Fiat {
        /// "usd" or "pln"
        currency: String,
        balance: String,
    },
    Crypto {
        asset: String,
        quantity: String,
    },
    External {
        #[serde(default)]
        label: Option<String>,
        balance: String,
    },
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            exchange_base_url: default_exchange_base_url(),
            aggregator_base_url: default_aggregator_base_url(),
            pln_usd_rate: default_pln_usd_rate(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_exchange_base_url() -> String {
    EXCHANGE_BASE_URL.to_string()
}

fn default_aggregator_base_url() -> String {
    AGGREGATOR_BASE_URL.to_string()
}

fn default_pln_usd_rate() -> String {
    "4.45".to_string()
}

impl PricingConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Parse and validate the PLN per USD divisor.
    pub fn pln_rate(&self) -> anyhow::Result<Decimal> {
        let rate = Decimal::from_str(self.pln_usd_rate.trim())
            .with_context(|| format!("pln_usd_rate {:?} is not a decimal", self.pln_usd_rate))?;
        ensure!(rate > Decimal::ZERO, "pln_usd_rate must be positive, got {rate}");
        Ok(rate)
    }
}

impl AssetMappingConfig {
    /// Resolve this mapping to a canonical id and its single provider route.
    pub fn route(&self) -> anyhow::Result<(CanonicalAssetId, ProviderRoute)> {
        let id = CanonicalAssetId::parse(&self.id)
            .ok_or_else(|| anyhow!("asset mapping id {:?} is blank", self.id))?;

        let route = match (&self.ticker, &self.mint, self.stable) {
            (Some(ticker), None, false) => {
                let ticker = ticker.trim();
                ensure!(!ticker.is_empty(), "asset mapping {:?} has a blank ticker", self.id);
                ProviderRoute::Exchange {
                    ticker: ticker.to_string(),
                }
            }
            (None, Some(mint), false) => {
                let mint = mint.trim();
                ensure!(!mint.is_empty(), "asset mapping {:?} has a blank mint", self.id);
                ProviderRoute::Aggregator {
                    mint: mint.to_string(),
                }
            }
            (None, None, true) => ProviderRoute::Stable,
            (None, None, false) => {
                bail!("asset mapping {:?} needs one of ticker, mint, or stable", self.id)
            }
            _ => bail!(
                "asset mapping {:?} sets more than one of ticker, mint, stable",
                self.id
            ),
        };

        Ok((id, route))
    }
}

impl HoldingConfig {
    /// Convert to a domain holding, parsing amounts and identifiers.
    pub fn to_holding(&self) -> anyhow::Result<Holding> {
        match self {
            Self::Fiat { currency, balance } => {
                let currency = currency
                    .parse::<FiatCurrency>()
                    .map_err(|_| anyhow!("unsupported fiat currency {currency:?}"))?;
                Ok(Holding::Fiat {
                    currency,
                    balance: parse_amount(balance, "balance")?,
                })
            }
            Self::Crypto { asset, quantity } => {
                let asset = CanonicalAssetId::parse(asset)
                    .ok_or_else(|| anyhow!("crypto holding asset is blank"))?;
                Ok(Holding::Crypto {
                    asset,
                    quantity: parse_amount(quantity, "quantity")?,
                })
            }
            Self::External { label, balance } => Ok(Holding::External {
                label: label.clone(),
                balance: parse_amount(balance, "balance")?,
            }),
        }
    }
}

fn parse_amount(raw: &str, field: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw.trim()).with_context(|| format!("{field} {raw:?} is not a decimal"))
}

impl AppConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a working service.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.pricing.pln_rate().context("pricing")?;
        for mapping in &self.assets {
            mapping.route()?;
        }
        for (index, holding) in self.holdings.iter().enumerate() {
            holding
                .to_holding()
                .with_context(|| format!("holdings[{index}]"))?;
        }
        Ok(())
    }

    /// Parse every configured holding into its domain form.
    pub fn to_holdings(&self) -> anyhow::Result<Vec<Holding>> {
        self.holdings
            .iter()
            .enumerate()
            .map(|(index, holding)| {
                holding
                    .to_holding()
                    .with_context(|| format!("holdings[{index}]"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document_parses_with_defaults() {
        let raw = r#"
pricing:
  ttl_secs: 30
assets:
  - id: "my-token"
    ticker: "MYTUSDT"
  - id: "onchain-token"
    mint: "Mint1111111111111111111111111111111111111111"
  - id: "my-stable"
    stable: true
holdings:
  - kind: crypto
    asset: "Bitcoin"
    quantity: "2.5"
  - kind: fiat
    currency: "pln"
    balance: "16475"
  - kind: external
    label: "brokerage"
    balance: "250.75"
"#;

        let config: AppConfig = serde_yaml::from_str(raw).expect("config parses");
        config.validate().expect("config validates");

        assert_eq!(config.pricing.ttl_secs, 30);
        assert_eq!(config.pricing.timeout_secs, 10);
        assert_eq!(config.pricing.exchange_base_url, EXCHANGE_BASE_URL);
        assert_eq!(config.pricing.pln_rate().unwrap(), Decimal::from_str("4.45").unwrap());

        let holdings = config.to_holdings().expect("holdings convert");
        assert_eq!(holdings.len(), 3);
        assert!(matches!(
            &holdings[0],
            Holding::Crypto { asset, .. } if asset.as_str() == "bitcoin"
        ));
    }

    #[test]
    fn mapping_with_two_routes_is_rejected() {
        let mapping = AssetMappingConfig {
            id: "confused".to_string(),
            ticker: Some("CONUSDT".to_string()),
            mint: Some("Mint".to_string()),
            stable: false,
        };
        assert!(mapping.route().is_err());
    }

    #[test]
    fn mapping_without_route_is_rejected() {
        let mapping = AssetMappingConfig {
            id: "floating".to_string(),
            ticker: None,
            mint: None,
            stable: false,
        };
        assert!(mapping.route().is_err());
    }

    #[test]
    fn stable_mapping_resolves() {
        let mapping = AssetMappingConfig {
            id: " My-Stable ".to_string(),
            ticker: None,
            mint: None,
            stable: true,
        };
        let (id, route) = mapping.route().expect("route resolves");
        assert_eq!(id.as_str(), "my-stable");
        assert_eq!(route, ProviderRoute::Stable);
    }

    #[test]
    fn unsupported_currency_fails_validation() {
        let raw = r#"
holdings:
  - kind: fiat
    currency: "eur"
    balance: "100"
"#;
        let config: AppConfig = serde_yaml::from_str(raw).expect("config parses");
        assert!(config.validate().is_err());
    }

    #[test]
    fn garbage_amount_fails_validation() {
        let raw = r#"
holdings:
  - kind: crypto
    asset: "bitcoin"
    quantity: "two and a half"
"#;
        let config: AppConfig = serde_yaml::from_str(raw).expect("config parses");
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_rate_fails_validation() {
        let raw = r#"
pricing:
  pln_usd_rate: "0"
holdings: []
"#;
        let config: AppConfig = serde_yaml::from_str(raw).expect("config parses");
        assert!(config.validate().is_err());
    }
}
