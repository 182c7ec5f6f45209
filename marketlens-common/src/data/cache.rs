// =================================================================
// data/cache.rs - TTL Series Cache
// =================================================================

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::debug;

use super::types::PriceSeries;

/// Cache key: one fetched range of one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeriesKey {
    pub fn new(symbol: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            start,
            end,
        }
    }
}

/// Cache tuning parameters
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a fetched series stays valid
    pub ttl: Duration,
    /// Maximum number of cached series before the oldest is evicted
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(15 * 60),
            max_entries: 64,
        }
    }
}

/// Cache usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Entry {
    series: PriceSeries,
    inserted_at: Instant,
}

struct Inner {
    entries: HashMap<SeriesKey, Entry>,
    stats: CacheStats,
}

/// Memoization of fetched price series keyed by (symbol, date range).
///
/// Entries expire after the configured TTL; at capacity the oldest entry
/// is evicted first. Replaces the ambient per-session dict the reference
/// data layer used with an explicit, bounded policy.
pub struct SeriesCache {
    inner: Mutex<Inner>,
    config: CacheConfig,
}

impl SeriesCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                stats: CacheStats::default(),
            }),
            config,
        }
    }

    /// Look up a series, dropping it if its TTL has elapsed.
    pub async fn get(&self, key: &SeriesKey) -> Option<PriceSeries> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let expired = match inner.entries.get(key) {
            Some(entry) => entry.inserted_at.elapsed() >= self.config.ttl,
            None => {
                inner.stats.misses += 1;
                return None;
            }
        };

        if expired {
            inner.entries.remove(key);
            inner.stats.misses += 1;
            debug!("Cache entry expired for {:?}", key);
            return None;
        }

        inner.stats.hits += 1;
        inner.entries.get(key).map(|e| e.series.clone())
    }

    /// Insert a freshly fetched series, evicting the oldest entry at capacity.
    pub async fn insert(&self, key: SeriesKey, series: PriceSeries) {
        let mut inner = self.inner.lock().await;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.config.max_entries {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone());

            if let Some(oldest) = oldest {
                inner.entries.remove(&oldest);
                inner.stats.evictions += 1;
                debug!("Evicted cache entry for {:?}", oldest);
            }
        }

        inner.entries.insert(
            key,
            Entry {
                series,
                inserted_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.entries.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats
    }

    /// Drop every cached series, keeping the counters.
    pub async fn clear(&self) {
        self.inner.lock().await.entries.clear();
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
