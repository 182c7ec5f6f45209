// =================================================================
// provider/utils.rs - Utility Functions
// =================================================================

use chrono::DateTime;
use marketlens_common::data::types::{PricePoint, PriceSeries};
use tracing::debug;

use super::types::ChartResult;
use super::ProviderError;

/// Validate symbol format before issuing a request.
///
/// Yahoo symbols allow exchange suffixes (RELIANCE.NS), index carets
/// (^GSPC), share-class dashes (BRK-B) and ampersands (M&M.NS).
pub fn validate_symbol(symbol: &str) -> Result<String, ProviderError> {
    let symbol = symbol.trim().to_uppercase();

    if symbol.is_empty() {
        return Err(ProviderError::InvalidSymbol(
            "Symbol cannot be empty".to_string(),
        ));
    }

    if !symbol
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '&' | '='))
    {
        return Err(ProviderError::InvalidSymbol(format!(
            "Symbol '{}' contains invalid characters",
            symbol
        )));
    }

    if symbol.len() > 20 {
        return Err(ProviderError::InvalidSymbol(format!(
            "Symbol '{}' has invalid length",
            symbol
        )));
    }

    Ok(symbol)
}

/// Convert one chart result into a clean price series.
///
/// Bars missing any field, with a non-positive close, or with zero volume
/// are dropped rather than failing the whole series. Bars are sorted by
/// date before validation; a duplicate date is a provider bug and surfaces
/// as a parse error.
pub fn convert_chart_to_series(result: &ChartResult) -> Result<PriceSeries, ProviderError> {
    let timestamps = match &result.timestamp {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Ok(PriceSeries::empty()),
    };

    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| ProviderError::Parse("Chart result has no quote block".to_string()))?;

    let mut points = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, &ts) in timestamps.iter().enumerate() {
        let bar = (
            quote.open.get(i).copied().flatten(),
            quote.high.get(i).copied().flatten(),
            quote.low.get(i).copied().flatten(),
            quote.close.get(i).copied().flatten(),
            quote.volume.get(i).copied().flatten(),
        );

        let (open, high, low, close, volume) = match bar {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => {
                skipped += 1;
                continue;
            }
        };

        if close <= 0.0 || volume == 0 {
            skipped += 1;
            continue;
        }

        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| ProviderError::Parse(format!("Invalid timestamp {}", ts)))?
            .date_naive();

        points.push(PricePoint {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    if skipped > 0 {
        debug!("Dropped {} incomplete or invalid bars", skipped);
    }

    points.sort_by_key(|p| p.date);

    PriceSeries::new(points).map_err(|e| ProviderError::Parse(e.to_string()))
}
