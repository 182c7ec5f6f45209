// =================================================================
// provider/yahoo.rs - Yahoo Finance Provider Implementation
// =================================================================

use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use marketlens_common::data::types::PriceSeries;
use tracing::{debug, info, warn};

use super::{
    errors::ProviderError,
    traits::PriceProvider,
    types::ChartResponse,
    utils::{convert_chart_to_series, validate_symbol},
};

// Constants
const YAHOO_API_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = "Mozilla/5.0 (compatible; marketlens/0.1)";

/// Price provider backed by the Yahoo Finance v8 chart API
pub struct YahooProvider {
    api_url: String,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a provider against the public Yahoo endpoint.
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_API_URL.to_string(), DEFAULT_TIMEOUT)
    }

    /// Create a provider against a custom endpoint, for alternate mirrors
    /// and tests.
    pub fn with_base_url(api_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self { api_url, client }
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.api_url, symbol)
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ProviderError> {
        let symbol = validate_symbol(symbol)?;

        if end < start {
            return Err(ProviderError::InvalidSymbol(format!(
                "Date range for {} is inverted: {} after {}",
                symbol, start, end
            )));
        }

        // Inclusive range: period2 is midnight after the last requested day
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = (end + chrono::Days::new(1))
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();

        debug!("Fetching {} daily bars: {} to {}", symbol, start, end);

        let response = self
            .client
            .get(self.chart_url(&symbol))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::UnknownSymbol(symbol));
        }
        if !response.status().is_success() {
            return Err(ProviderError::Api(format!(
                "Chart request for {} failed with status {}",
                symbol,
                response.status()
            )));
        }

        let payload: ChartResponse = response.json().await?;

        if let Some(err) = payload.chart.error {
            warn!("Provider error for {}: {} ({})", symbol, err.description, err.code);
            return if err.code.eq_ignore_ascii_case("not found") {
                Err(ProviderError::UnknownSymbol(symbol))
            } else {
                Err(ProviderError::Api(err.description))
            };
        }

        let result = payload
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .ok_or_else(|| {
                ProviderError::Parse(format!("Empty chart result for {}", symbol))
            })?;

        let series = convert_chart_to_series(&result)?;
        info!("Fetched {} bars for {}", series.len(), symbol);

        Ok(series)
    }
}
