/*
[INPUT]:  HTTP client configuration and upstream price endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod aggregator;
pub mod client;
pub mod error;
pub mod exchange;

pub use error::{FeedError, Result};

pub use client::{AGGREGATOR_BASE_URL, EXCHANGE_BASE_URL, ClientConfig, FeedClient};
