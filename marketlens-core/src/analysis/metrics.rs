// =================================================================
// analysis/metrics.rs - Performance Metrics
// =================================================================

use marketlens_common::data::types::PriceSeries;
use serde::{Deserialize, Serialize};

use super::returns::ReturnSeries;

/// Trading periods per year used for annualization of daily series
pub const PERIODS_PER_YEAR: f64 = 252.0;

/// Summary statistics over one return curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Final compounded return
    pub total_return: f64,
    /// Standard deviation of per-period returns, annualized
    pub annualized_volatility: f64,
    /// Mean over standard deviation, annualized; 0 when volatility is 0
    pub sharpe_ratio: f64,
    /// Worst peak-to-trough decline of the compounded curve (<= 0)
    pub max_drawdown: f64,
    /// Share of periods with a positive return
    pub win_rate: f64,
    /// Periods with a non-zero return (the strategy was in the market)
    pub active_periods: usize,
}

impl PerformanceMetrics {
    fn zeroed() -> Self {
        Self {
            total_return: 0.0,
            annualized_volatility: 0.0,
            sharpe_ratio: 0.0,
            max_drawdown: 0.0,
            win_rate: 0.0,
            active_periods: 0,
        }
    }
}

/// Summarize a return curve into its headline performance metrics.
pub fn compute_metrics(returns: &ReturnSeries) -> PerformanceMetrics {
    let period_returns = returns.period_returns();
    if period_returns.is_empty() {
        return PerformanceMetrics::zeroed();
    }

    let n = period_returns.len() as f64;
    let mean = period_returns.iter().sum::<f64>() / n;
    let variance = period_returns
        .iter()
        .map(|r| (r - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    let annualized_volatility = std_dev * PERIODS_PER_YEAR.sqrt();
    let sharpe_ratio = if std_dev > 0.0 {
        mean / std_dev * PERIODS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    let winning = period_returns.iter().filter(|r| **r > 0.0).count();
    let active_periods = period_returns.iter().filter(|r| **r != 0.0).count();

    PerformanceMetrics {
        total_return: returns.total_return(),
        annualized_volatility,
        sharpe_ratio,
        max_drawdown: max_drawdown(&period_returns),
        win_rate: winning as f64 / n,
        active_periods,
    }
}

/// Worst decline of the compounded index from its running peak.
fn max_drawdown(period_returns: &[f64]) -> f64 {
    let mut index = 1.0_f64;
    let mut peak = 1.0_f64;
    let mut worst = 0.0_f64;

    for r in period_returns {
        index *= 1.0 + r;
        if index > peak {
            peak = index;
        }
        let drawdown = (index - peak) / peak;
        if drawdown < worst {
            worst = drawdown;
        }
    }

    worst
}

/// Pearson correlation of per-period returns between two price series.
///
/// The series are inner-joined by date first, so mismatched calendars
/// (different exchanges, missing sessions) only contribute their overlap.
/// Returns 0.0 when fewer than two overlapping return observations exist.
pub fn return_correlation(a: &PriceSeries, b: &PriceSeries) -> f64 {
    let mut joined: Vec<(f64, f64)> = Vec::new();
    let mut ai = a.iter().peekable();
    let mut bi = b.iter().peekable();

    while let (Some(pa), Some(pb)) = (ai.peek(), bi.peek()) {
        if pa.date < pb.date {
            ai.next();
        } else if pb.date < pa.date {
            bi.next();
        } else {
            joined.push((pa.close, pb.close));
            ai.next();
            bi.next();
        }
    }

    if joined.len() < 3 {
        // fewer than 2 return observations
        return 0.0;
    }

    let returns: Vec<(f64, f64)> = joined
        .windows(2)
        .map(|w| (w[1].0 / w[0].0 - 1.0, w[1].1 / w[0].1 - 1.0))
        .collect();

    let n = returns.len() as f64;
    let mean_a = returns.iter().map(|(ra, _)| ra).sum::<f64>() / n;
    let mean_b = returns.iter().map(|(_, rb)| rb).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (ra, rb) in &returns {
        let da = ra - mean_a;
        let db = rb - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return 0.0;
    }

    cov / (var_a.sqrt() * var_b.sqrt())
}
