// provider/traits.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use marketlens_common::data::types::PriceSeries;

use super::ProviderError;

/// Main price-source interface that all provider implementations must follow
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Fetch daily OHLCV history for one symbol over an inclusive date range.
    ///
    /// An empty range is a valid response; callers decide whether that is
    /// an error for their computation.
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError>;
}
