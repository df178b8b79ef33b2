/*
[INPUT]:  Journal holdings and a resolved price map
[OUTPUT]: Per-holding USD values and an unrounded portfolio total
[POS]:    Domain layer - pure valuation arithmetic
[UPDATE]: When adding holding kinds or changing conversion rules
*/

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::asset::{CanonicalAssetId, PriceMap};

const CENT_PLACES: u32 = 2;

/// Fiat denominations the journal understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiatCurrency {
    Usd,
    Pln,
}

impl std::str::FromStr for FiatCurrency {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Self::Usd),
            "pln" => Ok(Self::Pln),
            _ => Err(()),
        }
    }
}

impl fmt::Display for FiatCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usd => f.write_str("USD"),
            Self::Pln => f.write_str("PLN"),
        }
    }
}

/// One journal position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Holding {
    /// Cash balance in a supported fiat currency.
    Fiat {
        currency: FiatCurrency,
        balance: Decimal,
    },
    /// Token position valued at quantity times the live USD price.
    Crypto {
        asset: CanonicalAssetId,
        quantity: Decimal,
    },
    /// Already-in-USD balance held elsewhere (broker, savings account).
    /// Carried into the total verbatim.
    External {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        balance: Decimal,
    },
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fiat { currency, balance } => write!(f, "{currency} {balance}"),
            Self::Crypto { asset, quantity } => write!(f, "{asset} x {quantity}"),
            Self::External { label: Some(label), balance } => {
                write!(f, "external ({label}) {balance}")
            }
            Self::External { label: None, balance } => write!(f, "external {balance}"),
        }
    }
}

/// Value assigned to a single holding this cycle, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingValue {
    pub holding: Holding,
    pub value_usd: Decimal,
}

/// Full portfolio valuation. Values stay unrounded; callers round with
/// [`to_cents`] when presenting them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioValuation {
    pub lines: Vec<HoldingValue>,
    pub total_usd: Decimal,
}

impl PortfolioValuation {
    pub fn total_cents(&self) -> Decimal {
        to_cents(self.total_usd)
    }
}

/// Round to whole cents for display. Midpoints round away from zero, so
/// 1.005 shows as 1.01.
pub fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Pure valuation rules over holdings and an already-resolved price map.
///
/// No IO happens here: a crypto asset missing from the map values to zero
/// and is the resolver's problem to report, not this type's.
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    pln_usd_rate: Decimal,
}

impl ValuationEngine {
    /// `pln_usd_rate` is the fixed PLN-per-USD divisor; it must be
    /// positive. `PricingConfig::pln_rate` enforces this for configured
    /// rates, and debug builds assert it here for direct construction.
    pub fn new(pln_usd_rate: Decimal) -> Self {
        debug_assert!(
            pln_usd_rate > Decimal::ZERO,
            "pln_usd_rate must be positive, got {pln_usd_rate}"
        );
        Self { pln_usd_rate }
    }

    pub fn value_holding(&self, holding: &Holding, prices: &PriceMap) -> Decimal {
        match holding {
            Holding::Fiat {
                currency: FiatCurrency::Usd,
                balance,
            } => *balance,
            Holding::Fiat {
                currency: FiatCurrency::Pln,
                balance,
            } => balance / self.pln_usd_rate,
            Holding::Crypto { asset, quantity } => prices
                .get(asset)
                .map(|price| quantity * price)
                .unwrap_or(Decimal::ZERO),
            Holding::External { balance, .. } => *balance,
        }
    }

    pub fn value_portfolio(&self, holdings: &[Holding], prices: &PriceMap) -> PortfolioValuation {
        let mut lines = Vec::with_capacity(holdings.len());
        let mut total_usd = Decimal::ZERO;

        for holding in holdings {
            let value_usd = self.value_holding(holding, prices);
            total_usd += value_usd;
            lines.push(HoldingValue {
                holding: holding.clone(),
                value_usd,
            });
        }

        PortfolioValuation { lines, total_usd }
    }
}
