pub mod cache;
pub mod types;

// Re-export main interfaces for easy access
pub use cache::{CacheConfig, CacheStats, SeriesCache, SeriesKey};
pub use types::{DataError, PricePoint, PriceSeries};
