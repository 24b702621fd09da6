use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

/// Counters for the structural cache, see [`crate::TypeEngine::cache_stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub capacity: usize,
    pub len: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded LRU map shared by every node an engine builds.
///
/// The lock is only held for the map operation itself. Callers compute values outside of it, so
/// two threads racing on the same key both do the work and the later insert wins.
pub(crate) struct StructuralCache<K, V> {
    capacity: usize,
    lru: Option<Mutex<LruCache<K, V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K: Hash + Eq, V: Clone> StructuralCache<K, V> {
    /// A capacity of `0` disables caching: every lookup misses and inserts are dropped.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            lru: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.lru.is_some()
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        let lru = self.lru.as_ref()?;
        let value = lru.lock().get(key).cloned();
        let counter = if value.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        value
    }

    pub(crate) fn insert(&self, key: K, value: V) {
        let Some(lru) = &self.lru else {
            return;
        };

        let evicted = {
            let mut lru = lru.lock();
            let evicts = lru.len() == lru.cap().get() && !lru.contains(&key);
            lru.put(key, value);
            evicts
        };
        if evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(
                target: "nova.typegraph.cache",
                capacity = self.capacity,
                "evicted least recently used type"
            );
        }
    }

    pub(crate) fn clear(&self) {
        if let Some(lru) = &self.lru {
            lru.lock().clear();
        }
    }

    pub(crate) fn stats(&self) -> CacheStats {
        CacheStats {
            capacity: self.capacity,
            len: self.lru.as_ref().map_or(0, |lru| lru.lock().len()),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
