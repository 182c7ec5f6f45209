// =================================================================
// analysis/returns.rs - Return Aggregator
// =================================================================

use chrono::NaiveDate;
use marketlens_common::data::types::PriceSeries;
use serde::{Deserialize, Serialize};

use super::errors::AnalysisError;
use super::signal::SignalSeries;

/// One dated return observation on a compounded curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    /// Return earned over this single period
    pub period_return: f64,
    /// Compounded return since the first date, starting at 0.0
    pub cumulative_return: f64,
}

/// Cumulative-return curve, same length as the price series it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries {
    points: Vec<ReturnPoint>,
}

impl ReturnSeries {
    pub fn new(points: Vec<ReturnPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ReturnPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReturnPoint> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<&ReturnPoint> {
        self.points.last()
    }

    /// Per-period returns, excluding the zero placeholder at the first date.
    pub fn period_returns(&self) -> Vec<f64> {
        self.points.iter().skip(1).map(|p| p.period_return).collect()
    }

    /// Final compounded return, 0.0 for a single-point series.
    pub fn total_return(&self) -> f64 {
        self.points.last().map(|p| p.cumulative_return).unwrap_or(0.0)
    }
}

/// Aggregate a position series and its aligned price series into
/// cumulative-return curves for the strategy and a buy-and-hold baseline.
///
/// The position taken at the end of period i-1 earns the raw return of
/// period i. The lag is what keeps period i's own move from leaking into
/// the decision that earns it (look-ahead bias).
pub fn compute_returns(
    prices: &PriceSeries,
    signals: &SignalSeries,
) -> Result<(ReturnSeries, ReturnSeries), AnalysisError> {
    if prices.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "price series is empty".to_string(),
        ));
    }
    if prices.len() != signals.len() {
        return Err(AnalysisError::Alignment(format!(
            "length mismatch: {} prices vs {} signals",
            prices.len(),
            signals.len()
        )));
    }
    for (i, (pp, sp)) in prices.iter().zip(signals.iter()).enumerate() {
        if pp.date != sp.date {
            return Err(AnalysisError::Alignment(format!(
                "date mismatch at index {}: price {} vs signal {}",
                i, pp.date, sp.date
            )));
        }
    }

    let closes = prices.closes();
    let signal_points = signals.points();

    let mut strategy_points = Vec::with_capacity(prices.len());
    let mut baseline_points = Vec::with_capacity(prices.len());
    let mut strategy_index = 1.0_f64;
    let mut baseline_index = 1.0_f64;

    for (i, pp) in prices.iter().enumerate() {
        let (raw_return, strategy_return) = if i == 0 {
            (0.0, 0.0)
        } else {
            let raw = closes[i] / closes[i - 1] - 1.0;
            (raw, signal_points[i - 1].position.weight() * raw)
        };

        strategy_index *= 1.0 + strategy_return;
        baseline_index *= 1.0 + raw_return;

        strategy_points.push(ReturnPoint {
            date: pp.date,
            period_return: strategy_return,
            cumulative_return: strategy_index - 1.0,
        });
        baseline_points.push(ReturnPoint {
            date: pp.date,
            period_return: raw_return,
            cumulative_return: baseline_index - 1.0,
        });
    }

    Ok((
        ReturnSeries::new(strategy_points),
        ReturnSeries::new(baseline_points),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::signal::{
        compute_momentum_signal, Position, SignalPoint, SignalSeries,
    };
    use marketlens_common::data::types::{PricePoint, PriceSeries};

    fn series(closes: &[f64]) -> PriceSeries {
        let start: NaiveDate = "2024-01-01".parse().unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect();
        PriceSeries::new(points).unwrap()
    }

    fn signals_for(prices: &PriceSeries, positions: &[Position]) -> SignalSeries {
        let points = prices
            .iter()
            .zip(positions.iter())
            .map(|(p, &position)| SignalPoint {
                date: p.date,
                position,
            })
            .collect();
        SignalSeries::new(points)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn concrete_momentum_scenario() {
        // prices [100, 110, 99, 120], momentum lookback 1:
        // signal = [flat, long, flat, long]; the long taken on day1 eats
        // day2's -10%, the flat on day2 skips day3's +21.2%.
        let prices = series(&[100.0, 110.0, 99.0, 120.0]);
        let signals = compute_momentum_signal(&prices, 1, 0.0).unwrap();
        let (strategy, baseline) = compute_returns(&prices, &signals).unwrap();

        assert_close(strategy.points()[2].period_return, -0.1);
        assert_close(strategy.points()[3].period_return, 0.0);
        assert_close(strategy.total_return(), -0.1);
        assert_close(baseline.total_return(), 120.0 / 100.0 - 1.0);
    }

    #[test]
    fn both_curves_start_at_zero_and_match_input_length() {
        let prices = series(&[100.0, 101.0, 102.0]);
        let signals = signals_for(&prices, &[Position::Long, Position::Long, Position::Long]);
        let (strategy, baseline) = compute_returns(&prices, &signals).unwrap();

        assert_eq!(strategy.len(), prices.len());
        assert_eq!(baseline.len(), prices.len());
        assert_close(strategy.points()[0].cumulative_return, 0.0);
        assert_close(baseline.points()[0].cumulative_return, 0.0);
    }

    #[test]
    fn all_flat_signals_earn_nothing() {
        let prices = series(&[100.0, 120.0, 80.0, 150.0]);
        let signals = signals_for(&prices, &[Position::Flat; 4]);
        let (strategy, _) = compute_returns(&prices, &signals).unwrap();

        for point in strategy.iter() {
            assert_close(point.cumulative_return, 0.0);
        }
    }

    #[test]
    fn always_long_degenerates_to_baseline() {
        let prices = series(&[100.0, 120.0, 80.0, 150.0]);
        let signals = signals_for(&prices, &[Position::Long; 4]);
        let (strategy, baseline) = compute_returns(&prices, &signals).unwrap();

        assert_eq!(strategy, baseline);
    }

    #[test]
    fn short_position_inverts_the_period_return() {
        let prices = series(&[100.0, 110.0]);
        let signals = signals_for(&prices, &[Position::Short, Position::Flat]);
        let (strategy, _) = compute_returns(&prices, &signals).unwrap();

        assert_close(strategy.points()[1].period_return, -0.1);
    }

    #[test]
    fn changing_a_position_only_moves_the_next_period() {
        // Lag invariant: position[i] never changes strategy return at i,
        // only at i+1.
        let prices = series(&[100.0, 110.0, 99.0, 120.0]);
        let base = signals_for(
            &prices,
            &[Position::Flat, Position::Flat, Position::Flat, Position::Flat],
        );
        let flipped = signals_for(
            &prices,
            &[Position::Flat, Position::Long, Position::Flat, Position::Flat],
        );

        let (base_returns, _) = compute_returns(&prices, &base).unwrap();
        let (flipped_returns, _) = compute_returns(&prices, &flipped).unwrap();

        assert_close(
            flipped_returns.points()[1].period_return,
            base_returns.points()[1].period_return,
        );
        assert_close(flipped_returns.points()[2].period_return, -0.1);
        assert_close(base_returns.points()[2].period_return, 0.0);
    }

    #[test]
    fn empty_series_is_an_error() {
        let result = compute_returns(&PriceSeries::empty(), &SignalSeries::new(Vec::new()));
        assert!(matches!(result, Err(AnalysisError::InsufficientData(_))));
    }

    #[test]
    fn length_mismatch_fails_loudly() {
        let prices = series(&[100.0, 101.0, 102.0]);
        let signals = signals_for(&series(&[100.0, 101.0]), &[Position::Flat, Position::Flat]);

        assert!(matches!(
            compute_returns(&prices, &signals),
            Err(AnalysisError::Alignment(_))
        ));
    }

    #[test]
    fn date_mismatch_fails_loudly() {
        let prices = series(&[100.0, 101.0]);
        let shifted: NaiveDate = "2024-02-01".parse().unwrap();
        let signals = SignalSeries::new(vec![
            SignalPoint {
                date: prices.points()[0].date,
                position: Position::Flat,
            },
            SignalPoint {
                date: shifted,
                position: Position::Flat,
            },
        ]);

        assert!(matches!(
            compute_returns(&prices, &signals),
            Err(AnalysisError::Alignment(_))
        ));
    }

    #[test]
    fn single_point_series_yields_flat_curves() {
        let prices = series(&[100.0]);
        let signals = signals_for(&prices, &[Position::Long]);
        let (strategy, baseline) = compute_returns(&prices, &signals).unwrap();

        assert_eq!(strategy.len(), 1);
        assert_close(strategy.total_return(), 0.0);
        assert_close(baseline.total_return(), 0.0);
        assert!(strategy.period_returns().is_empty());
    }
}
