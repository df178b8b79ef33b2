/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public price feed crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod source;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    AGGREGATOR_BASE_URL,
    EXCHANGE_BASE_URL,
    ClientConfig,
    FeedClient,
    FeedError,
    Result,
};

// Re-export the provider seam
pub use source::{
    AggregatorSource,
    ExchangeSource,
    PriceSource,
    StaticPriceSource,
};

// Re-export all types
pub use types::*;
