//! # Least Recently Used (LRU) Cache
//!
//! Recency-only baseline for the policy comparison. Shares the lookup/fetch
//! contract of [`ArcCache`](crate::policy::arc::ArcCache) but keeps a single
//! ordered list.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                              │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<K, SlotId> (index into the list's arena)          │   │
//!   │   │                                                              │   │
//!   │   │  ┌─────────┬───────────────────────────────────────────┐     │   │
//!   │   │  │   Key   │  SlotId                                   │     │   │
//!   │   │  ├─────────┼───────────────────────────────────────────┤     │   │
//!   │   │  │  page_1 │  ───────────────────────────────────────┐ │     │   │
//!   │   │  │  page_2 │  ─────────────────────────────────┐     │ │     │   │
//!   │   │  │  page_3 │  ───────────────────────────┐     │     │ │     │   │
//!   │   │  └─────────┴─────────────────────────────┼─────┼─────┼─┘     │   │
//!   │   └──────────────────────────────────────────┼─────┼─────┼───────┘   │
//!   │                                              │     │     │           │
//!   │   ┌──────────────────────────────────────────┼─────┼─────┼───────┐   │
//!   │   │  IntrusiveList<Entry<K, V>> (LRU order)  ▼     ▼     ▼       │   │
//!   │   │                                                              │   │
//!   │   │  head ──► ┌──────┐ ◄──► ┌──────┐ ◄──► ┌──────┐ ◄── tail      │   │
//!   │   │    (MRU)  │ k, v │      │ k, v │      │ k, v │   (LRU)       │   │
//!   │   │           └──────┘      └──────┘      └──────┘               │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lookup Flow
//!
//! ```text
//!   lookup_update(D) on a full cache:
//!
//!   Before:
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail    (capacity = 3)
//!
//!   1. D not indexed → page = fetch(D)
//!   2. Evict [C] from tail
//!   3. Push [D] at head
//!
//!   After:
//!     head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//!
//!   lookup_update(B): hit, [B] moves to head, no fetch.
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lru::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! assert!(!cache.lookup_update(1u64, |k| k * 2));
//! assert!(!cache.lookup_update(2u64, |k| k * 2));
//! assert!(cache.lookup_update(1u64, |k| k * 2));
//! assert!(!cache.lookup_update(3u64, |k| k * 2)); // evicts 2
//!
//! assert_eq!(cache.keys_mru().copied().collect::<Vec<_>>(), vec![3, 1]);
//! assert_eq!(cache.hits(), 1);
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::{IntrusiveList, SlotId};
use crate::error::ConfigError;
use crate::policy::MAX_INITIAL_RESERVE;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder, MetricsSnapshotProvider,
};
use crate::traits::{HitCounter, ReadOnlyCache};

struct Entry<K, V> {
    key: K,
    page: V,
}

/// Fixed-capacity LRU cache that materializes pages through a fetch closure.
pub struct LruCache<K, V> {
    list: IntrusiveList<Entry<K, V>>,
    index: FxHashMap<K, SlotId>,
    capacity: usize,
    hits: u64,
    requests: u64,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        let reserve = capacity.min(MAX_INITIAL_RESERVE);
        Ok(Self {
            list: IntrusiveList::with_capacity(reserve),
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            capacity,
            hits: 0,
            requests: 0,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        })
    }

    /// References `key`; returns `true` on a hit.
    ///
    /// On a miss the LRU entry is evicted if the cache is full and the page
    /// from `fetch` is stored at the MRU position.
    pub fn lookup_update<F>(&mut self, key: K, fetch: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        match self.try_lookup_update(key, |k| Ok::<V, std::convert::Infallible>(fetch(k))) {
            Ok(hit) => hit,
            Err(never) => match never {},
        }
    }

    /// Fallible form of [`lookup_update`](Self::lookup_update).
    ///
    /// A failing `fetch` leaves order, contents and counters unchanged.
    pub fn try_lookup_update<F, E>(&mut self, key: K, fetch: F) -> Result<bool, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        if let Some(&id) = self.index.get(&key) {
            if self.list.move_to_front(id) {
                self.requests += 1;
                self.hits += 1;
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_lookup_hit();
                    self.metrics.record_move_to_front();
                }
                return Ok(true);
            }
            debug_assert!(false, "LRU index entry points at a freed node");
            self.index.remove(&key);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_fetch_call();
        let page = match fetch(&key) {
            Ok(page) => page,
            Err(err) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_fetch_failure();
                return Err(err);
            },
        };

        self.requests += 1;
        #[cfg(feature = "metrics")]
        self.metrics.record_lookup_miss();

        if self.list.len() >= self.capacity {
            self.evict_lru();
        }
        let id = self.list.push_front(Entry {
            key: key.clone(),
            page,
        });
        self.index.insert(key, id);
        Ok(false)
    }

    /// Returns the page of `key` and marks it most recently used.
    ///
    /// Not counted as a request.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        if !self.list.move_to_front(id) {
            return None;
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_move_to_front();
        self.list.get(id).map(|entry| &entry.page)
    }

    /// Returns the page of `key` without touching recency order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_call();

        let id = self.index.get(key)?;
        let page = self.list.get(*id).map(|entry| &entry.page);
        #[cfg(feature = "metrics")]
        {
            if page.is_some() {
                (&self.metrics).record_peek_found();
            }
        }
        page
    }

    /// Resident keys from MRU to LRU.
    pub fn keys_mru(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|entry| &entry.key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Drops every page and resets the counters.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
        self.hits = 0;
        self.requests = 0;
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> &LruMetrics {
        &self.metrics
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics = LruMetrics::default();
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            trace!(len = self.list.len(), "LRU evicted tail entry");
            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert!(self.list.len() <= self.capacity, "LRU over capacity");
        assert_eq!(self.index.len(), self.list.len(), "index out of sync");
        assert!(self.hits <= self.requests);
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("len", &self.list.len())
            .field("hits", &self.hits)
            .field("requests", &self.requests)
            .finish()
    }
}

impl<K, V> ReadOnlyCache<K> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> HitCounter for LruCache<K, V> {
    fn hits(&self) -> u64 {
        self.hits
    }

    fn requests(&self) -> u64 {
        self.requests
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            lookup_calls: self.metrics.lookup_calls,
            lookup_hits: self.metrics.lookup_hits,
            lookup_misses: self.metrics.lookup_misses,
            fetch_calls: self.metrics.fetch_calls,
            fetch_failures: self.metrics.fetch_failures,
            evicted_entries: self.metrics.evicted_entries,
            clear_calls: self.metrics.clear_calls,
            move_to_front_calls: self.metrics.move_to_front_calls,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            cache_len: self.len(),
            capacity: self.capacity,
        }
    }
}
