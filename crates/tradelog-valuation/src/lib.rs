/*
[INPUT]:  Public API exports for the tradelog-valuation crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod asset;
pub mod cache;
pub mod config;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod valuation;

// Re-export main types for convenience
pub use asset::{CanonicalAssetId, PriceEntry, PriceMap};
pub use cache::PriceCache;
pub use config::{AppConfig, AssetMappingConfig, HoldingConfig, PricingConfig};
pub use registry::{AssetRegistry, ProviderRoute};
pub use resolver::{PriceResolver, ResolveError};
pub use service::PortfolioService;
pub use valuation::{
    FiatCurrency, Holding, HoldingValue, PortfolioValuation, ValuationEngine, to_cents,
};
