//! TTL cache of loaded dictionaries keyed by `(language, namespace)`

use crate::tree::NamespaceTree;
use parking_lot::Mutex;
use polyglot_common::LanguagePair;
use polyglot_config::CacheOptions;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached dictionary with its load time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The dictionary.
    pub data: Arc<NamespaceTree>,
    /// When it was stored.
    pub loaded_at: Instant,
    /// How long it stays valid.
    pub ttl: Duration,
}

impl CacheEntry {
    fn new(data: Arc<NamespaceTree>, ttl: Duration) -> Self {
        Self {
            data,
            loaded_at: Instant::now(),
            ttl,
        }
    }

    /// An entry whose age has reached its TTL is expired; a zero TTL
    /// expires immediately.
    pub fn is_expired(&self) -> bool {
        self.loaded_at.elapsed() >= self.ttl
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries currently stored, expired ones included until touched.
    pub size: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing or an expired entry.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

#[derive(Debug, Default)]
struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheMetrics {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Dictionary cache with one TTL for every entry.
///
/// Expired entries are evicted lazily, on the lookup that finds them.
#[derive(Debug)]
pub struct CacheStore {
    entries: Mutex<HashMap<LanguagePair, CacheEntry>>,
    ttl: Duration,
    max_entries: Option<usize>,
    metrics: CacheMetrics,
}

impl CacheStore {
    /// Creates a store with the given TTL and no size bound.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: None,
            metrics: CacheMetrics::default(),
        }
    }

    /// Creates a store from configuration.
    pub fn from_options(options: &CacheOptions) -> Self {
        Self {
            max_entries: options.max_entries,
            ..Self::new(options.ttl())
        }
    }

    /// TTL applied to every entry.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached dictionary, counting a hit; an absent or expired
    /// entry counts a miss and expired entries are evicted.
    pub fn get(&self, language: &str, namespace: &str) -> Option<Arc<NamespaceTree>> {
        let pair = LanguagePair::new(language, namespace);
        let mut entries = self.entries.lock();

        match entries.get(&pair) {
            Some(entry) if !entry.is_expired() => {
                self.metrics.record_hit();
                Some(Arc::clone(&entry.data))
            }
            Some(_) => {
                debug!("Cache entry expired for {}", pair);
                entries.remove(&pair);
                self.metrics.record_miss();
                None
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Stores a dictionary, replacing any previous entry for the pair.
    /// With a bound of zero nothing is stored.
    pub fn put(&self, language: &str, namespace: &str, data: Arc<NamespaceTree>) {
        let pair = LanguagePair::new(language, namespace);
        if self.max_entries == Some(0) {
            debug!("Cache holds no entries, not caching {}", pair);
            return;
        }
        let mut entries = self.entries.lock();

        if let Some(limit) = self.max_entries {
            while entries.len() >= limit && !entries.contains_key(&pair) {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.loaded_at)
                    .map(|(key, _)| key.clone());
                match oldest {
                    Some(key) => {
                        debug!("Evicting {} to stay within {} entries", key, limit);
                        entries.remove(&key);
                    }
                    None => break,
                }
            }
        }

        debug!("Caching dictionary for {}", pair);
        entries.insert(pair, CacheEntry::new(data, self.ttl));
    }

    /// Drops one entry without touching the counters.
    pub fn invalidate(&self, language: &str, namespace: &str) -> bool {
        self.entries
            .lock()
            .remove(&LanguagePair::new(language, namespace))
            .is_some()
    }

    /// Removes every entry and resets the counters.
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.metrics.reset();
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.lock().len(),
            hits: self.metrics.hits.load(Ordering::Relaxed),
            misses: self.metrics.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::from_options(&CacheOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Arc<NamespaceTree> {
        Arc::new(
            NamespaceTree::from_json(serde_json::json!({ "welcome": "Welcome" })).unwrap(),
        )
    }

    #[test]
    fn test_default_ttl_is_one_day() {
        assert_eq!(CacheStore::default().ttl(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_cache_basic_operations() {
        let cache = CacheStore::default();

        // Test miss
        assert!(cache.get("en", "common").is_none());

        // Test put and hit
        cache.put("en", "common", tree());
        let hit = cache.get("en", "common").unwrap();
        assert_eq!(hit.lookup("welcome"), Some("Welcome"));

        assert_eq!(
            cache.stats(),
            CacheStats {
                size: 1,
                hits: 1,
                misses: 1
            }
        );
    }

    #[test]
    fn test_zero_ttl_expires_on_next_get() {
        let cache = CacheStore::new(Duration::ZERO);
        cache.put("en", "common", tree());
        assert_eq!(cache.stats().size, 1);

        assert!(cache.get("en", "common").is_none());
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.size, 0);
    }

    #[test]
    fn test_clear_resets_counters() {
        let cache = CacheStore::default();
        cache.put("en", "common", tree());
        cache.get("en", "common");
        cache.get("ko", "common");

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
        assert!(cache.get("en", "common").is_none());
    }

    #[test]
    fn test_invalidate_keeps_counters() {
        let cache = CacheStore::default();
        cache.put("en", "common", tree());
        cache.get("en", "common");

        assert!(cache.invalidate("en", "common"));
        assert!(!cache.invalidate("en", "common"));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_max_entries_evicts_oldest() {
        let cache = CacheStore::from_options(&CacheOptions {
            max_entries: Some(2),
            ..CacheOptions::default()
        });
        cache.put("en", "common", tree());
        std::thread::sleep(Duration::from_millis(2));
        cache.put("en", "auth", tree());
        std::thread::sleep(Duration::from_millis(2));
        cache.put("ko", "common", tree());

        assert_eq!(cache.stats().size, 2);
        assert!(cache.get("en", "common").is_none());
        assert!(cache.get("en", "auth").is_some());
        assert!(cache.get("ko", "common").is_some());
    }

    #[test]
    fn test_zero_max_entries_stores_nothing() {
        let cache = CacheStore::from_options(&CacheOptions {
            max_entries: Some(0),
            ..CacheOptions::default()
        });
        cache.put("en", "common", tree());

        assert_eq!(cache.stats().size, 0);
        assert!(cache.get("en", "common").is_none());
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            size: 0,
            hits: 3,
            misses: 1,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert!(CacheStats::default().hit_rate().abs() < f64::EPSILON);
    }
}
