// =================================================================
// data/types.rs - Shared Price Data Model
// =================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a price series violates its ordering invariant
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("series out of order: {current} follows {previous}")]
    OutOfOrder {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("duplicate date in series: {0}")]
    DuplicateDate(NaiveDate),
}

/// One daily price observation. Immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Ordered daily price history: strictly increasing dates, no duplicates.
///
/// The invariant is enforced at construction so downstream consumers
/// (signal engine, return aggregator) can rely on positional alignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from already-sorted points, validating the date order.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, DataError> {
        for pair in points.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(DataError::DuplicateDate(pair[1].date));
            }
            if pair[1].date < pair[0].date {
                return Err(DataError::OutOfOrder {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }
        Ok(Self { points })
    }

    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Closing prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(date: &str, close: f64) -> PricePoint {
        let date = date.parse().unwrap();
        PricePoint {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn accepts_strictly_increasing_dates() {
        let series = PriceSeries::new(vec![
            point("2024-01-02", 100.0),
            point("2024-01-03", 101.0),
            point("2024-01-04", 99.5),
        ])
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![100.0, 101.0, 99.5]);
    }

    #[test]
    fn rejects_duplicate_dates() {
        let result = PriceSeries::new(vec![
            point("2024-01-02", 100.0),
            point("2024-01-02", 101.0),
        ]);

        assert!(matches!(result, Err(DataError::DuplicateDate(_))));
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let result = PriceSeries::new(vec![
            point("2024-01-03", 100.0),
            point("2024-01-02", 101.0),
        ]);

        assert!(matches!(result, Err(DataError::OutOfOrder { .. })));
    }

    #[test]
    fn empty_series_is_valid() {
        let series = PriceSeries::new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.first().is_none());
    }
}
