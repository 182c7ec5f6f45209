use std::sync::Arc;

use chrono::NaiveDate;
use marketlens_common::data::cache::{CacheConfig, SeriesCache, SeriesKey};
use marketlens_common::data::types::PriceSeries;
use tracing::{debug, info};

use super::errors::ServiceError;
use super::types::{AnalysisReport, AnalysisRequest};
use crate::analysis::signal::Position;
use crate::analysis::{
    compute_metrics, compute_returns, compute_signal, return_correlation, AnalysisError,
    SignalPoint, SignalSeries,
};
use crate::provider::PriceProvider;

/// Analysis service that coordinates the price provider, the series cache,
/// and the pure signal/return computations.
///
/// One request triggers at most two fetches (security and benchmark);
/// everything after the fetch is a synchronous in-memory transform.
pub struct AnalysisService {
    /// Price source implementation
    provider: Arc<dyn PriceProvider>,
    /// Memoized fetches keyed by (symbol, date range)
    cache: SeriesCache,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn PriceProvider>, cache_config: CacheConfig) -> Self {
        Self {
            provider,
            cache: SeriesCache::new(cache_config),
        }
    }

    /// Fetch a series through the cache.
    async fn series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ServiceError> {
        let key = SeriesKey::new(symbol, start, end);

        if let Some(series) = self.cache.get(&key).await {
            debug!("Cache hit for {} {}..{}", symbol, start, end);
            return Ok(series);
        }

        let series = self.provider.fetch_daily(symbol, start, end).await?;
        self.cache.insert(key, series.clone()).await;
        Ok(series)
    }

    /// Run one full analysis: fetch both series, compute the signal, the
    /// strategy/baseline/benchmark curves, metrics, and the correlation.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisReport, ServiceError> {
        info!(
            "Analyzing {} vs {} ({} to {})",
            request.symbol, request.benchmark, request.start, request.end
        );

        let prices = self
            .series(&request.symbol, request.start, request.end)
            .await?;
        if prices.is_empty() {
            return Err(AnalysisError::InsufficientData(format!(
                "no price data for {} between {} and {}",
                request.symbol, request.start, request.end
            ))
            .into());
        }

        let benchmark_prices = self
            .series(&request.benchmark, request.start, request.end)
            .await?;
        if benchmark_prices.is_empty() {
            return Err(AnalysisError::InsufficientData(format!(
                "no price data for benchmark {} between {} and {}",
                request.benchmark, request.start, request.end
            ))
            .into());
        }

        let signals = compute_signal(&prices, &request.strategy)?;
        let (strategy_returns, baseline_returns) = compute_returns(&prices, &signals)?;

        // Benchmark contributes its buy-and-hold curve only
        let benchmark_hold = always_long(&benchmark_prices);
        let (_, benchmark_returns) = compute_returns(&benchmark_prices, &benchmark_hold)?;

        let report = AnalysisReport {
            strategy_metrics: compute_metrics(&strategy_returns),
            baseline_metrics: compute_metrics(&baseline_returns),
            benchmark_metrics: compute_metrics(&benchmark_returns),
            benchmark_correlation: return_correlation(&prices, &benchmark_prices),
            symbol: request.symbol,
            benchmark: request.benchmark,
            strategy: request.strategy,
            signals,
            strategy_returns,
            baseline_returns,
            benchmark_returns,
        };

        info!(
            "Analysis complete for {}: strategy {:.2}% vs baseline {:.2}% vs benchmark {:.2}%",
            report.symbol,
            report.strategy_metrics.total_return * 100.0,
            report.baseline_metrics.total_return * 100.0,
            report.benchmark_metrics.total_return * 100.0,
        );

        Ok(report)
    }

    pub async fn cache_stats(&self) -> marketlens_common::data::cache::CacheStats {
        self.cache.stats().await
    }
}

fn always_long(prices: &PriceSeries) -> SignalSeries {
    SignalSeries::new(
        prices
            .iter()
            .map(|p| SignalPoint {
                date: p.date,
                position: Position::Long,
            })
            .collect(),
    )
}
