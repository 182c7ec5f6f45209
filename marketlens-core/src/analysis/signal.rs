// =================================================================
// analysis/signal.rs - Signal Engine
// =================================================================

use std::str::FromStr;

use chrono::NaiveDate;
use marketlens_common::data::types::PriceSeries;
use serde::{Deserialize, Serialize};

use super::errors::AnalysisError;

/// Default momentum lookback in trading days (~one quarter)
pub const DEFAULT_MOMENTUM_LOOKBACK: usize = 60;
/// Default value moving-average window in trading days (~one year)
pub const DEFAULT_VALUE_MA_WINDOW: usize = 252;

/// Position taken at the end of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Long,
    Flat,
    Short,
}

impl Position {
    /// Exposure weight used by the return aggregator.
    pub fn weight(self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Flat => 0.0,
            Position::Short => -1.0,
        }
    }
}

/// One dated position, derived from prices and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub position: Position,
}

/// Position series aligned 1:1 by date with the price series that
/// produced it. The return aggregator depends on that alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalSeries {
    points: Vec<SignalPoint>,
}

impl SignalSeries {
    pub fn new(points: Vec<SignalPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SignalPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignalPoint> {
        self.points.iter()
    }
}

/// Strategy name as it appears on the CLI and API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Momentum,
    Value,
}

impl FromStr for StrategyKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "momentum" => Ok(StrategyKind::Momentum),
            "value" => Ok(StrategyKind::Value),
            other => Err(AnalysisError::InvalidParameter(format!(
                "unrecognized strategy: {}",
                other
            ))),
        }
    }
}

/// Closed set of strategy variants behind one dispatch function.
///
/// There are exactly two strategies and no plugin requirement, so this is
/// an enum rather than a trait-object hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum StrategyConfig {
    Momentum {
        /// Trailing-return window, in periods
        lookback: usize,
        /// Minimum trailing return to go long
        #[serde(default)]
        threshold: f64,
    },
    Value {
        /// Trailing moving-average window, in periods
        ma_window: usize,
        /// Cheap/expensive band around the moving average
        #[serde(default)]
        threshold: f64,
        /// Take a short position when the security looks expensive
        #[serde(default)]
        short_when_expensive: bool,
    },
}

impl StrategyConfig {
    /// Config for a strategy kind with explicit or default parameters.
    pub fn from_parts(kind: StrategyKind, window: Option<usize>, threshold: Option<f64>) -> Self {
        match kind {
            StrategyKind::Momentum => StrategyConfig::Momentum {
                lookback: window.unwrap_or(DEFAULT_MOMENTUM_LOOKBACK),
                threshold: threshold.unwrap_or(0.0),
            },
            StrategyKind::Value => StrategyConfig::Value {
                ma_window: window.unwrap_or(DEFAULT_VALUE_MA_WINDOW),
                threshold: threshold.unwrap_or(0.0),
                short_when_expensive: false,
            },
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyConfig::Momentum { .. } => StrategyKind::Momentum,
            StrategyConfig::Value { .. } => StrategyKind::Value,
        }
    }
}

/// Strategy description for the frontend strategy picker
#[derive(Debug, Clone, Serialize)]
pub struct StrategyInfo {
    pub id: StrategyKind,
    pub name: String,
    pub description: String,
    pub default_window: usize,
}

/// List the available strategies with their default parameters.
pub fn list_strategies() -> Vec<StrategyInfo> {
    vec![
        StrategyInfo {
            id: StrategyKind::Momentum,
            name: "Momentum".to_string(),
            description: "Long when the trailing return over the lookback window is positive"
                .to_string(),
            default_window: DEFAULT_MOMENTUM_LOOKBACK,
        },
        StrategyInfo {
            id: StrategyKind::Value,
            name: "Value".to_string(),
            description:
                "Long when price trades below its trailing moving average (cheapness proxy)"
                    .to_string(),
            default_window: DEFAULT_VALUE_MA_WINDOW,
        },
    ]
}

/// Map a price series to a position series under the named strategy.
pub fn compute_signal(
    prices: &PriceSeries,
    config: &StrategyConfig,
) -> Result<SignalSeries, AnalysisError> {
    match *config {
        StrategyConfig::Momentum {
            lookback,
            threshold,
        } => compute_momentum_signal(prices, lookback, threshold),
        StrategyConfig::Value {
            ma_window,
            threshold,
            short_when_expensive,
        } => compute_value_signal(prices, ma_window, threshold, short_when_expensive),
    }
}

/// Momentum: long when the trailing `lookback`-period return exceeds
/// `threshold`, flat otherwise. Points with insufficient history are flat
/// by definition, not an error.
pub fn compute_momentum_signal(
    prices: &PriceSeries,
    lookback: usize,
    threshold: f64,
) -> Result<SignalSeries, AnalysisError> {
    if lookback == 0 {
        return Err(AnalysisError::InvalidParameter(
            "lookback must be positive".to_string(),
        ));
    }
    if prices.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "price series is empty".to_string(),
        ));
    }

    let closes = prices.closes();
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let position = if i >= lookback {
                let trailing_return = closes[i] / closes[i - lookback] - 1.0;
                if trailing_return > threshold {
                    Position::Long
                } else {
                    Position::Flat
                }
            } else {
                Position::Flat
            };
            SignalPoint {
                date: p.date,
                position,
            }
        })
        .collect();

    Ok(SignalSeries::new(points))
}

/// Value: cheapness proxy against the security's own history. Long when
/// the close trades below `(1 - threshold)` times its trailing
/// `ma_window`-period average, short on the expensive side when enabled,
/// flat otherwise.
///
/// The moving average stands in for fundamental data that a bare price
/// series cannot supply, which is why every knob is configuration.
pub fn compute_value_signal(
    prices: &PriceSeries,
    ma_window: usize,
    threshold: f64,
    short_when_expensive: bool,
) -> Result<SignalSeries, AnalysisError> {
    if ma_window == 0 {
        return Err(AnalysisError::InvalidParameter(
            "ma_window must be positive".to_string(),
        ));
    }
    if prices.is_empty() {
        return Err(AnalysisError::InsufficientData(
            "price series is empty".to_string(),
        ));
    }

    let closes = prices.closes();
    let mut rolling_sum = 0.0;
    let mut points = Vec::with_capacity(prices.len());

    for (i, p) in prices.iter().enumerate() {
        rolling_sum += closes[i];
        if i >= ma_window {
            rolling_sum -= closes[i - ma_window];
        }

        // Window is complete once ma_window points are in the sum
        let position = if i + 1 >= ma_window {
            let ma = rolling_sum / ma_window as f64;
            if closes[i] < ma * (1.0 - threshold) {
                Position::Long
            } else if short_when_expensive && closes[i] > ma * (1.0 + threshold) {
                Position::Short
            } else {
                Position::Flat
            }
        } else {
            Position::Flat
        };

        points.push(SignalPoint {
            date: p.date,
            position,
        });
    }

    Ok(SignalSeries::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketlens_common::data::types::PricePoint;

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

    fn positions(signals: &SignalSeries) -> Vec<Position> {
        signals.iter().map(|s| s.position).collect()
    }

    #[test]
    fn momentum_concrete_scenario() {
        // prices 100 -> 110 -> 99 -> 120, lookback 1:
        // day0 insufficient history, day1 +10%, day2 -10%, day3 +21.2%
        let prices = series(&[100.0, 110.0, 99.0, 120.0]);
        let signals = compute_momentum_signal(&prices, 1, 0.0).unwrap();

        assert_eq!(
            positions(&signals),
            vec![
                Position::Flat,
                Position::Long,
                Position::Flat,
                Position::Long
            ]
        );
    }

    #[test]
    fn momentum_dates_align_with_prices() {
        let prices = series(&[100.0, 110.0, 99.0]);
        let signals = compute_momentum_signal(&prices, 1, 0.0).unwrap();

        assert_eq!(signals.len(), prices.len());
        for (sp, pp) in signals.iter().zip(prices.iter()) {
            assert_eq!(sp.date, pp.date);
        }
    }

    #[test]
    fn momentum_all_flat_when_lookback_exceeds_length() {
        let prices = series(&[100.0, 101.0, 102.0]);
        let signals = compute_momentum_signal(&prices, 10, 0.0).unwrap();

        assert!(signals.iter().all(|s| s.position == Position::Flat));
    }

    #[test]
    fn momentum_threshold_raises_the_bar() {
        // +10% then -10%: only the first move clears a 5% threshold
        let prices = series(&[100.0, 110.0, 99.0]);
        let signals = compute_momentum_signal(&prices, 1, 0.05).unwrap();

        assert_eq!(
            positions(&signals),
            vec![Position::Flat, Position::Long, Position::Flat]
        );
    }

    #[test]
    fn momentum_is_deterministic() {
        let prices = series(&[100.0, 105.0, 103.0, 108.0, 101.0]);
        let first = compute_momentum_signal(&prices, 2, 0.0).unwrap();
        let second = compute_momentum_signal(&prices, 2, 0.0).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn momentum_rejects_zero_lookback() {
        let prices = series(&[100.0, 101.0]);
        assert!(matches!(
            compute_momentum_signal(&prices, 0, 0.0),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn momentum_rejects_empty_series() {
        let prices = PriceSeries::empty();
        assert!(matches!(
            compute_momentum_signal(&prices, 5, 0.0),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn value_goes_long_below_moving_average() {
        // MA(2) at index 2 over [110, 90] = 100; close 90 is cheap
        let prices = series(&[100.0, 110.0, 90.0]);
        let signals = compute_value_signal(&prices, 2, 0.0, false).unwrap();

        assert_eq!(
            positions(&signals),
            vec![Position::Flat, Position::Flat, Position::Long]
        );
    }

    #[test]
    fn value_flat_above_moving_average_by_default() {
        // Rising prices sit above their trailing average: expensive
        let prices = series(&[100.0, 110.0, 120.0]);
        let signals = compute_value_signal(&prices, 2, 0.0, false).unwrap();

        assert!(signals.iter().all(|s| s.position == Position::Flat));
    }

    #[test]
    fn value_shorts_expensive_side_when_enabled() {
        let prices = series(&[100.0, 110.0, 120.0]);
        let signals = compute_value_signal(&prices, 2, 0.0, true).unwrap();

        assert_eq!(
            positions(&signals),
            vec![Position::Flat, Position::Short, Position::Short]
        );
    }

    #[test]
    fn value_threshold_widens_the_flat_band() {
        // close 90 vs MA 100 is only 10% cheap; 15% band keeps it flat
        let prices = series(&[100.0, 110.0, 90.0]);
        let signals = compute_value_signal(&prices, 2, 0.15, false).unwrap();

        assert_eq!(signals.points()[2].position, Position::Flat);
    }

    #[test]
    fn value_rejects_zero_window() {
        let prices = series(&[100.0]);
        assert!(matches!(
            compute_value_signal(&prices, 0, 0.0, false),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn value_rejects_empty_series() {
        assert!(matches!(
            compute_value_signal(&PriceSeries::empty(), 5, 0.0, false),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn dispatch_matches_direct_calls() {
        let prices = series(&[100.0, 110.0, 99.0, 120.0]);

        let via_dispatch = compute_signal(
            &prices,
            &StrategyConfig::Momentum {
                lookback: 1,
                threshold: 0.0,
            },
        )
        .unwrap();
        let direct = compute_momentum_signal(&prices, 1, 0.0).unwrap();

        assert_eq!(via_dispatch, direct);
    }

    #[test]
    fn strategy_kind_parses_known_names() {
        assert_eq!("momentum".parse::<StrategyKind>().unwrap(), StrategyKind::Momentum);
        assert_eq!("Value".parse::<StrategyKind>().unwrap(), StrategyKind::Value);
        assert!(matches!(
            "carry".parse::<StrategyKind>(),
            Err(AnalysisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn strategies_are_listed_with_defaults() {
        let strategies = list_strategies();
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].default_window, DEFAULT_MOMENTUM_LOOKBACK);
        assert_eq!(strategies[1].default_window, DEFAULT_VALUE_MA_WINDOW);
    }
}
