use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::MatchResult;
use crate::models::LabelMatching;

/// In-process cache for the ranked match list
///
/// The list depends on every GP and LP row, so any registration write
/// clears the whole cache rather than individual keys. Each clear bumps a
/// generation; a list computed under an older generation is never stored.
pub struct MatchCache {
    cache: moka::future::Cache<String, Arc<MatchResult>>,
    generation: AtomicU64,
}

impl MatchCache {
    /// Create a new match cache
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            cache,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<MatchResult>> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            tracing::trace!("Match cache hit: {}", key);
        } else {
            tracing::trace!("Match cache miss: {}", key);
        }
        hit
    }

    /// Take before reading the rows a list is computed from
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store a list computed from rows read at `generation`
    ///
    /// Returns false, and leaves nothing cached, if a write invalidated the
    /// cache since then.
    pub async fn set(&self, key: &str, value: Arc<MatchResult>, generation: u64) -> bool {
        if self.generation() != generation {
            tracing::debug!("Discarded stale match list for {}", key);
            return false;
        }

        self.cache.insert(key.to_string(), value).await;

        // An invalidation that raced the insert may have run before it landed
        if self.generation() != generation {
            self.cache.invalidate(key).await;
            tracing::debug!("Discarded stale match list for {}", key);
            return false;
        }

        tracing::trace!("Match cache set: {}", key);
        true
    }

    /// Drop every cached list
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.invalidate_all();
        tracing::debug!("Match cache invalidated");
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for the full match list
    pub fn matches(mode: LabelMatching) -> String {
        let mode = match mode {
            LabelMatching::Substring => "substring",
            LabelMatching::Taxonomy => "taxonomy",
        };
        format!("matches:{}", mode)
    }
}
