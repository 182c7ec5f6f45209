use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::{PerformanceMetrics, ReturnSeries, SignalSeries, StrategyConfig};

/// One analysis request: one symbol, one date range, one strategy choice,
/// one benchmark to compare against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub benchmark: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub strategy: StrategyConfig,
}

/// Everything the comparison renderer needs: the signal series, the
/// strategy and buy-and-hold curves for the security, the benchmark's own
/// buy-and-hold curve, and headline metrics for each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub benchmark: String,
    pub strategy: StrategyConfig,

    pub signals: SignalSeries,
    pub strategy_returns: ReturnSeries,
    pub baseline_returns: ReturnSeries,
    pub benchmark_returns: ReturnSeries,

    pub strategy_metrics: PerformanceMetrics,
    pub baseline_metrics: PerformanceMetrics,
    pub benchmark_metrics: PerformanceMetrics,

    /// Return correlation between the security and the benchmark
    pub benchmark_correlation: f64,
}
