// =================================================================
// provider/types.rs - Data Structures
// =================================================================

use serde::Deserialize;

/// Top-level envelope of the Yahoo Finance v8 chart endpoint
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// Error object Yahoo returns in place of a result
#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

/// One symbol's chart payload: parallel arrays indexed by bar
#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Unix timestamps (seconds), one per bar; absent when the range is empty
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Vec<QuoteBlock>,
}

/// OHLCV arrays aligned with `timestamp`. Individual bars can be null
/// (halted sessions, partial data), hence the inner Options.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}
