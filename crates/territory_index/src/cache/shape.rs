/// Bounded, time-limited cache for a single query shape
use super::entry::CacheEntry;
use super::stats::ShapeStatistics;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::trace;

/// Cache map for one query shape.
///
/// Reads are lock-free apart from the map's shard locks. Inserts, clears and
/// sweeps are serialised through `gate` so the entry bound holds under
/// concurrent fills and so a clear can never interleave with a half-checked
/// fill.
#[derive(Debug)]
pub struct ShapeCache<K, V>
where
    K: Eq + Hash,
{
    name: &'static str,
    entries: DashMap<K, CacheEntry<V>>,
    gate: Mutex<()>,
    max_entries: usize,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

impl<K, V> ShapeCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an empty cache. A `max_entries` of zero is treated as one.
    pub fn new(name: &'static str, max_entries: usize, ttl: Duration) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            gate: Mutex::new(()),
            max_entries: max_entries.max(1),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Returns the cached value for `key` if present and still fresh.
    ///
    /// An expired entry counts as a miss and is dropped on the spot. Every
    /// lookup emits exactly one trace line.
    pub fn get(&self, key: &K) -> Option<V> {
        let lookup = self
            .entries
            .get(key)
            .map(|entry| (!entry.is_expired(self.ttl)).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!("🎯 {} cache hit", self.name);
                Some(value)
            }
            Some(None) => {
                let ttl = self.ttl;
                if self.entries.remove_if(key, |_, entry| entry.is_expired(ttl)).is_some() {
                    self.expirations.fetch_add(1, Ordering::Relaxed);
                }
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!("⌛ {} cache entry expired", self.name);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!("💨 {} cache miss", self.name);
                None
            }
        }
    }

    /// Stores `value` under `key`, making room first if the cache is full.
    pub fn insert(&self, key: K, value: V) {
        self.insert_unless(key, value, || false);
    }

    /// Stores `value` unless `is_stale` reports true once the gate is held.
    ///
    /// Returns whether the value was stored.
    pub(crate) fn insert_unless(&self, key: K, value: V, is_stale: impl FnOnce() -> bool) -> bool {
        let _gate = self.lock_gate();
        if is_stale() {
            return false;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.purge_expired_locked();
            if self.entries.len() >= self.max_entries {
                self.evict_oldest_locked();
            }
        }

        self.entries.insert(key, CacheEntry::new(value));
        true
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let _gate = self.lock_gate();
        self.entries.clear();
    }

    /// Drops expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let _gate = self.lock_gate();
        self.purge_expired_locked()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> ShapeStatistics {
        ShapeStatistics {
            name: self.name.to_string(),
            entries: self.entries.len(),
            max_entries: self.max_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
        }
    }

    fn lock_gate(&self) -> MutexGuard<'_, ()> {
        // The gate guards no data, so a poisoned lock is still usable.
        self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn purge_expired_locked(&self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            self.expirations.fetch_add(purged as u64, Ordering::Relaxed);
            trace!("🧹 Purged {} expired {} cache entries", purged, self.name);
        }
        purged
    }

    /// Evicts the oldest quarter of the entries (at least one).
    fn evict_oldest_locked(&self) {
        let mut stamped: Vec<(K, Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().created_at))
            .collect();
        stamped.sort_unstable_by_key(|(_, created_at)| *created_at);

        let count = (stamped.len() / 4).max(1);
        for (key, _) in stamped.into_iter().take(count) {
            self.entries.remove(&key);
        }

        self.evictions.fetch_add(count as u64, Ordering::Relaxed);
        trace!("🗑️ Evicted {} oldest {} cache entries", count, self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_hit_and_miss() {
        let cache: ShapeCache<u32, String> = ShapeCache::new("test", 10, Duration::from_secs(60));
        assert_eq!(cache.get(&1), None);
        cache.insert(1, "one".to_string());
        assert_eq!(cache.get(&1), Some("one".to_string()));

        let stats = cache.statistics();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_expired_entries_are_evicted_on_read() {
        let cache: ShapeCache<u32, u32> = ShapeCache::new("test", 10, Duration::from_millis(20));
        cache.insert(7, 49);
        thread::sleep(Duration::from_millis(60));

        assert_eq!(cache.get(&7), None);
        assert!(cache.is_empty());
        assert_eq!(cache.statistics().expirations, 1);
    }

    #[test]
    fn test_full_cache_evicts_oldest_quarter() {
        let cache: ShapeCache<u32, u32> = ShapeCache::new("test", 8, Duration::from_secs(60));
        for key in 0..8 {
            cache.insert(key, key);
            // distinct timestamps so "oldest" is well defined
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(cache.len(), 8);

        cache.insert(100, 100);
        assert_eq!(cache.len(), 7);
        assert_eq!(cache.get(&0), None);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(2));
        assert_eq!(cache.get(&100), Some(100));
        assert_eq!(cache.statistics().evictions, 2);
    }

    #[test]
    fn test_full_cache_prefers_purging_expired() {
        let cache: ShapeCache<u32, u32> = ShapeCache::new("test", 4, Duration::from_millis(30));
        for key in 0..4 {
            cache.insert(key, key);
        }
        thread::sleep(Duration::from_millis(60));

        cache.insert(10, 10);
        assert_eq!(cache.len(), 1);
        let stats = cache.statistics();
        assert_eq!(stats.expirations, 4);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_overwriting_a_key_does_not_evict() {
        let cache: ShapeCache<u32, u32> = ShapeCache::new("test", 2, Duration::from_secs(60));
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.insert(2, 20);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), Some(1));
        assert_eq!(cache.get(&2), Some(20));
    }

    #[test]
    fn test_stale_fill_is_rejected() {
        let cache: ShapeCache<u32, u32> = ShapeCache::new("test", 2, Duration::from_secs(60));
        assert!(!cache.insert_unless(1, 1, || true));
        assert!(cache.is_empty());
        assert!(cache.insert_unless(1, 1, || false));
    }

    #[test]
    fn test_bound_holds_under_concurrent_inserts() {
        let cache: Arc<ShapeCache<u32, u32>> =
            Arc::new(ShapeCache::new("test", 50, Duration::from_secs(60)));

        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500u32 {
                        cache.insert(t * 1_000 + i, i);
                        assert!(cache.len() <= 50);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 50);
    }
}
