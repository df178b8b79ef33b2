/*
[INPUT]:  Mint addresses to quote, comma-joined into the ids query parameter
[OUTPUT]: Per-mint USD price entries keyed by mint address
[POS]:    HTTP layer - aggregator price endpoint (no auth required)
[UPDATE]: When the aggregator price API version or response format changes
*/

use reqwest::Method;

use crate::http::{FeedClient, Result};
use crate::types::AggregatorPriceResponse;

impl FeedClient {
    /// Fetch USD prices for a batch of mints from the aggregator.
    ///
    /// GET /price/v2?ids={mint,mint,...}
    ///
    /// Unknown mints come back as null entries rather than errors, so a
    /// single bad id never spoils the rest of the batch.
    pub async fn aggregator_prices(&self, mints: &[String]) -> Result<AggregatorPriceResponse> {
        let endpoint = format!("/price/v2?ids={}", mints.join(","));
        let builder = self.aggregator_request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }
}
