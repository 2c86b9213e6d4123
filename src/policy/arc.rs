//! Adaptive Replacement Cache (ARC) replacement policy.
//!
//! Balances recency against frequency with two resident lists and two ghost
//! lists, and moves a target split `p` between them whenever a ghost entry is
//! referenced again.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                          ArcCache<K, V> Layout                              │
//! │                                                                             │
//! │   ┌─────────────────────────────────────────────────────────────────────┐   │
//! │   │  index: FxHashMap<K, SlotId>      lists: ListSet<Entry, 4>          │   │
//! │   │                                                                     │   │
//! │   │  ┌──────────┬───────────┐           ┌────────┬──────────────────┐   │   │
//! │   │  │   Key    │  SlotId   │           │ SlotId │ key, page, list  │   │   │
//! │   │  ├──────────┼───────────┤           ├────────┼──────────────────┤   │   │
//! │   │  │    17    │   id_0    │──────────►│ id_0   │ 17, Some, T1     │   │   │
//! │   │  │    42    │   id_1    │──────────►│ id_1   │ 42, Some, T2     │   │   │
//! │   │  │     9    │   id_2    │──────────►│ id_2   │  9, None, B1     │   │   │
//! │   │  └──────────┴───────────┘           └────────┴──────────────────┘   │   │
//! │   └─────────────────────────────────────────────────────────────────────┘   │
//! │                                                                             │
//! │   T1 (seen once, resident)            T2 (seen twice+, resident)            │
//! │   ┌─────────────────────────┐          ┌─────────────────────────┐          │
//! │   │ MRU               LRU   │          │ MRU               LRU   │          │
//! │   └─────────────────────────┘          └─────────────────────────┘          │
//! │   B1 (ghosts of T1, no page)          B2 (ghosts of T2, no page)            │
//! │   ┌─────────────────────────┐          ┌─────────────────────────┐          │
//! │   │ MRU               LRU   │          │ MRU               LRU   │          │
//! │   └─────────────────────────┘          └─────────────────────────┘          │
//! │                                                                             │
//! │   p: target size of T1, starts at 0                                         │
//! │   • ghost hit in B1 → p grows   (favor recency)                             │
//! │   • ghost hit in B2 → p shrinks (favor frequency)                           │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All four lists share one arena, so moving a key between lists is a splice
//! and its `SlotId` stays valid for as long as the key is tracked.
//!
//! ## Lookup Flow
//!
//! ```text
//!   lookup_update(key, fetch):
//!     T1 or T2 → hit: move to T2 MRU, no fetch
//!     B1       → miss: p += δ, replace(false), page = fetch(key), move to T2 MRU
//!     B2       → miss: p -= δ, replace(true),  page = fetch(key), move to T2 MRU
//!     absent   → miss: page = fetch(key), admit (may evict), push to T1 MRU
//!
//!   replace(in_b2):
//!     if |T1| > 0 and (|T1| > p or (|T1| == p and in_b2)):
//!       T1 LRU → B1 MRU (page dropped)
//!     else if |T2| > 0:
//!       T2 LRU → B2 MRU (page dropped)
//!
//!   admit (absent key):
//!     |T1| + |B1| == c:  |T1| < c → drop B1 LRU, replace(false)
//!                        else     → drop T1 LRU outright
//!     total >= c:        total == 2c → drop B2 LRU; then replace(false)
//! ```
//!
//! `δ` is `1` when the hit ghost list is at least as long as the other one,
//! otherwise the integer ratio `|other| / |hit|`.
//!
//! ## Operations
//!
//! | Operation          | Time   | Notes                                   |
//! |--------------------|--------|-----------------------------------------|
//! | `lookup_update`    | O(1)   | At most one fetch, at most two evictions|
//! | `peek`/`contains`  | O(1)   | Never reorders                          |
//! | `residency`        | O(1)   | Which of the four lists holds a key     |
//! | `check_invariants` | O(n)   | Full walk of every list                 |
//! | `clear`            | O(n)   | Also resets `p` and the counters        |
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::arc::{ArcCache, ArcList};
//!
//! let mut cache = ArcCache::new(2);
//! for key in [1u64, 1, 2, 2] {
//!     cache.lookup_update(key, |k| k * 2).unwrap();
//! }
//!
//! assert_eq!(cache.hits(), 2);
//! assert_eq!(cache.requests(), 4);
//! assert_eq!(cache.residency(&1), Some(ArcList::T2));
//! assert_eq!(cache.peek(&2), Some(&4));
//! ```
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement Cache",
//!   FAST 2003

use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::{ListSet, SlotId};
use crate::policy::MAX_INITIAL_RESERVE;
use crate::error::{CacheError, ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::ArcMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::ArcMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{ArcMetricsRecorder, CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::{HitCounter, ReadOnlyCache};

/// The four ARC lists.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArcList {
    /// Resident, referenced once since admission.
    T1,
    /// Resident, referenced at least twice.
    T2,
    /// Ghost of an entry evicted from T1.
    B1,
    /// Ghost of an entry evicted from T2.
    B2,
}

impl ArcList {
    pub const ALL: [ArcList; 4] = [ArcList::T1, ArcList::T2, ArcList::B1, ArcList::B2];

    const fn slot(self) -> usize {
        self as usize
    }

    fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    /// `true` for T1 and T2.
    pub fn is_resident(self) -> bool {
        matches!(self, ArcList::T1 | ArcList::T2)
    }

    /// `true` for B1 and B2.
    pub fn is_ghost(self) -> bool {
        !self.is_resident()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArcList::T1 => "T1",
            ArcList::T2 => "T2",
            ArcList::B1 => "B1",
            ArcList::B2 => "B2",
        }
    }
}

impl fmt::Display for ArcList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracked key; `page` is `Some` exactly while the key is in T1 or T2.
struct Entry<K, V> {
    key: K,
    page: Option<V>,
}

/// Adaptive Replacement Cache with page materialization on miss.
///
/// Pages are produced by the caller's fetch closure, invoked exactly once per
/// miss and never on a hit. A failing fetch leaves the cache untouched.
///
/// # Example
///
/// ```
/// use evictkit::policy::arc::ArcCache;
///
/// let mut cache: ArcCache<u32, String> = ArcCache::new(100);
/// let page = cache.lookup_update(7, |k| format!("page-{k}")).unwrap();
/// assert_eq!(page, "page-7");
/// assert_eq!(cache.t1_len(), 1);
///
/// // Second reference promotes to T2 without fetching.
/// cache.lookup_update(7, |_| unreachable!()).unwrap();
/// assert_eq!(cache.t2_len(), 1);
/// ```
pub struct ArcCache<K, V> {
    lists: ListSet<Entry<K, V>, 4>,
    index: FxHashMap<K, SlotId>,
    p: usize,
    capacity: usize,
    hits: u64,
    requests: u64,
    #[cfg(feature = "metrics")]
    metrics: ArcMetrics,
}

impl<K, V> ArcCache<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an ARC cache holding at most `capacity` pages.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. See [`try_new`](Self::try_new).
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(e) => panic!("{}", e),
        }
    }

    /// Creates an ARC cache, rejecting a zero capacity.
    ///
    /// Ghost history is bounded by `capacity` as well, so the cache tracks at
    /// most `2 * capacity` keys.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::zero_capacity());
        }
        let reserve = capacity.saturating_mul(2).min(MAX_INITIAL_RESERVE);
        Ok(Self {
            lists: ListSet::with_capacity(reserve),
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            p: 0,
            capacity,
            hits: 0,
            requests: 0,
            #[cfg(feature = "metrics")]
            metrics: ArcMetrics::default(),
        })
    }

    /// References `key`, fetching its page on a miss.
    ///
    /// Returns the resident page. The error case only occurs if the cache's
    /// bookkeeping has been corrupted.
    pub fn lookup_update<F>(&mut self, key: K, fetch: F) -> Result<&V, InvariantError>
    where
        F: FnOnce(&K) -> V,
    {
        match self.try_lookup_update(key, |k| Ok::<V, Infallible>(fetch(k))) {
            Ok(page) => Ok(page),
            Err(CacheError::Invariant(err)) => Err(err),
            Err(CacheError::Fetch(never)) => match never {},
        }
    }

    /// Fallible form of [`lookup_update`](Self::lookup_update).
    ///
    /// `fetch` runs before anything is mutated. If it fails the call returns
    /// [`CacheError::Fetch`] and the lists, `p` and both counters are exactly
    /// as they were.
    ///
    /// ```
    /// use evictkit::policy::arc::ArcCache;
    ///
    /// let mut cache: ArcCache<u8, u8> = ArcCache::new(1);
    /// assert!(cache.try_lookup_update(3, |_| Err("offline")).is_err());
    /// assert_eq!(cache.requests(), 0);
    /// assert!(cache.is_empty());
    /// ```
    pub fn try_lookup_update<F, E>(&mut self, key: K, fetch: F) -> Result<&V, CacheError<E>>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        match self.locate(&key)? {
            Some((id, list)) if list.is_resident() => {
                self.requests += 1;
                self.hits += 1;
                #[cfg(feature = "metrics")]
                {
                    self.metrics.record_lookup_hit();
                    if list == ArcList::T1 {
                        self.metrics.record_t1_to_t2_promotion();
                    }
                }
                self.lists.move_to_front(id, ArcList::T2.slot());
                self.resident_page(id)
            },
            Some((id, ghost)) => {
                let page = self.fetch_page(&key, fetch)?;
                self.requests += 1;
                #[cfg(feature = "metrics")]
                self.metrics.record_lookup_miss();

                let in_b2 = ghost == ArcList::B2;
                self.adapt(in_b2);
                self.replace(in_b2);
                self.lists.move_to_front(id, ArcList::T2.slot());
                if let Some(entry) = self.lists.get_mut(id) {
                    entry.page = Some(page);
                }
                self.resident_page(id)
            },
            None => {
                let page = self.fetch_page(&key, fetch)?;
                self.requests += 1;
                #[cfg(feature = "metrics")]
                self.metrics.record_lookup_miss();

                self.admit_new();
                let id = self.lists.push_front(
                    ArcList::T1.slot(),
                    Entry {
                        key: key.clone(),
                        page: Some(page),
                    },
                );
                self.index.insert(key, id);
                self.resident_page(id)
            },
        }
    }

    /// Returns the page of a resident key without touching list order.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = self.index.get(key)?;
        self.lists.get(*id).and_then(|entry| entry.page.as_ref())
    }

    /// Returns the list currently tracking `key`, ghost lists included.
    pub fn residency(&self, key: &K) -> Option<ArcList> {
        let id = self.index.get(key)?;
        self.lists.list_of(*id).and_then(ArcList::from_slot)
    }

    /// Keys of `list` from MRU to LRU.
    pub fn keys(&self, list: ArcList) -> impl Iterator<Item = &K> + '_ {
        self.lists.iter(list.slot()).map(|(_, entry)| &entry.key)
    }

    /// Returns `true` if `key` holds a page (T1 or T2).
    pub fn contains(&self, key: &K) -> bool {
        self.residency(key).is_some_and(ArcList::is_resident)
    }

    /// Number of resident pages, `|T1| + |T2|`.
    pub fn len(&self) -> usize {
        self.t1_len() + self.t2_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current target size of T1.
    pub fn p_value(&self) -> usize {
        self.p
    }

    pub fn t1_len(&self) -> usize {
        self.lists.list_len(ArcList::T1.slot())
    }

    pub fn t2_len(&self) -> usize {
        self.lists.list_len(ArcList::T2.slot())
    }

    pub fn b1_len(&self) -> usize {
        self.lists.list_len(ArcList::B1.slot())
    }

    pub fn b2_len(&self) -> usize {
        self.lists.list_len(ArcList::B2.slot())
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Forgets every key, resets `p` and the hit/request counters.
    pub fn clear(&mut self) {
        self.lists.clear();
        self.index.clear();
        self.p = 0;
        self.hits = 0;
        self.requests = 0;
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }

    /// Verifies the capacity bounds, the target bounds and that the index,
    /// lists and pages agree with each other.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let (t1, t2, b1, b2) = (self.t1_len(), self.t2_len(), self.b1_len(), self.b2_len());
        let c = self.capacity;

        if t1 + t2 > c {
            return Err(InvariantError::new(format!(
                "|T1| + |T2| = {} exceeds capacity {c}",
                t1 + t2
            )));
        }
        if t1 + b1 > c {
            return Err(InvariantError::new(format!(
                "|T1| + |B1| = {} exceeds capacity {c}",
                t1 + b1
            )));
        }
        if t1 + t2 + b1 + b2 > c.saturating_mul(2) {
            return Err(InvariantError::new(format!(
                "{} tracked keys exceed 2 * capacity {c}",
                t1 + t2 + b1 + b2
            )));
        }
        if self.p > c {
            return Err(InvariantError::new(format!(
                "target p = {} outside [0, {c}]",
                self.p
            )));
        }
        if self.index.len() != self.lists.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but lists hold {}",
                self.index.len(),
                self.lists.len()
            )));
        }

        for list in ArcList::ALL {
            for (id, entry) in self.lists.iter(list.slot()) {
                if self.index.get(&entry.key) != Some(&id) {
                    return Err(InvariantError::new(format!(
                        "{list} entry is not indexed under its own handle"
                    )));
                }
                if entry.page.is_some() != list.is_resident() {
                    return Err(InvariantError::new(format!(
                        "{list} entry page presence does not match residency"
                    )));
                }
            }
        }
        Ok(())
    }

    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> &ArcMetrics {
        &self.metrics
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics = ArcMetrics::default();
    }

    fn locate(&self, key: &K) -> Result<Option<(SlotId, ArcList)>, InvariantError> {
        let Some(&id) = self.index.get(key) else {
            return Ok(None);
        };
        self.lists
            .list_of(id)
            .and_then(ArcList::from_slot)
            .map(|list| Some((id, list)))
            .ok_or_else(|| InvariantError::new("indexed key does not resolve to any ARC list"))
    }

    fn resident_page<E>(&self, id: SlotId) -> Result<&V, CacheError<E>> {
        self.lists
            .get(id)
            .and_then(|entry| entry.page.as_ref())
            .ok_or_else(|| InvariantError::new("resident entry has no page").into())
    }

    fn fetch_page<F, E>(&mut self, key: &K, fetch: F) -> Result<V, CacheError<E>>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_fetch_call();
        match fetch(key) {
            Ok(page) => Ok(page),
            Err(err) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_fetch_failure();
                Err(CacheError::Fetch(err))
            },
        }
    }

    /// Moves `p` toward the list whose ghost was just referenced.
    fn adapt(&mut self, in_b2: bool) {
        let (b1, b2) = (self.b1_len(), self.b2_len());
        if in_b2 {
            let delta = adaptation_step(b2, b1);
            self.p = self.p.saturating_sub(delta);
            trace!(p = self.p, delta, "ARC target lowered on B2 ghost hit");
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_b2_ghost_hit();
                self.metrics.record_p_decrease();
            }
        } else {
            let delta = adaptation_step(b1, b2);
            self.p = self.p.saturating_add(delta).min(self.capacity);
            trace!(p = self.p, delta, "ARC target raised on B1 ghost hit");
            #[cfg(feature = "metrics")]
            {
                self.metrics.record_b1_ghost_hit();
                self.metrics.record_p_increase();
            }
        }
    }

    fn replace(&mut self, in_b2: bool) {
        let t1 = self.t1_len();
        if t1 > 0 && (t1 > self.p || (t1 == self.p && in_b2)) {
            self.demote_lru(ArcList::T1, ArcList::B1);
        } else if self.t2_len() > 0 {
            self.demote_lru(ArcList::T2, ArcList::B2);
        }
    }

    fn admit_new(&mut self) {
        let (t1, t2, b1, b2) = (self.t1_len(), self.t2_len(), self.b1_len(), self.b2_len());
        let c = self.capacity;

        if t1 + b1 == c {
            if t1 < c {
                self.drop_lru(ArcList::B1);
                self.replace(false);
            } else {
                self.drop_lru(ArcList::T1);
            }
        } else if t1 + t2 + b1 + b2 >= c {
            if t1 + t2 + b1 + b2 == c.saturating_mul(2) {
                self.drop_lru(ArcList::B2);
            }
            self.replace(false);
        }
        debug_assert!(self.len() < c, "admission left no room in T1 + T2");
    }

    /// Moves the LRU entry of a resident list to the MRU of a ghost list,
    /// discarding its page.
    fn demote_lru(&mut self, from: ArcList, to: ArcList) {
        let Some(id) = self.lists.back_id(from.slot()) else {
            return;
        };
        if let Some(entry) = self.lists.get_mut(id) {
            entry.page = None;
        }
        self.lists.move_to_front(id, to.slot());
        trace!(%from, %to, "ARC evicted page to ghost list");
        #[cfg(feature = "metrics")]
        {
            self.metrics.record_evicted_entry();
            match from {
                ArcList::T1 => self.metrics.record_t1_eviction(),
                _ => self.metrics.record_t2_eviction(),
            }
        }
    }

    /// Forgets the LRU entry of `list` entirely.
    fn drop_lru(&mut self, list: ArcList) {
        if let Some(entry) = self.lists.pop_back(list.slot()) {
            self.index.remove(&entry.key);
            trace!(from = %list, "ARC dropped LRU entry");
            #[cfg(feature = "metrics")]
            {
                if list.is_ghost() {
                    self.metrics.record_ghost_drop();
                } else {
                    self.metrics.record_evicted_entry();
                }
            }
        }
    }
}

/// Step applied to `p` on a ghost hit.
///
/// `hit_len` is the length of the ghost list that was hit. When it is empty
/// the step falls back to the other list's length.
fn adaptation_step(hit_len: usize, other_len: usize) -> usize {
    if hit_len >= other_len {
        1
    } else {
        other_len.checked_div(hit_len).unwrap_or(other_len).max(1)
    }
}

impl<K, V> fmt::Debug for ArcCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCache")
            .field("capacity", &self.capacity)
            .field("p", &self.p)
            .field("t1_len", &self.lists.list_len(ArcList::T1.slot()))
            .field("t2_len", &self.lists.list_len(ArcList::T2.slot()))
            .field("b1_len", &self.lists.list_len(ArcList::B1.slot()))
            .field("b2_len", &self.lists.list_len(ArcList::B2.slot()))
            .field("hits", &self.hits)
            .field("requests", &self.requests)
            .finish()
    }
}

impl<K, V> ReadOnlyCache<K> for ArcCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn contains(&self, key: &K) -> bool {
        ArcCache::contains(self, key)
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> HitCounter for ArcCache<K, V> {
    fn hits(&self) -> u64 {
        self.hits
    }

    fn requests(&self) -> u64 {
        self.requests
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<ArcMetricsSnapshot> for ArcCache<K, V>
where
    K: Clone + Eq + Hash,
{
    fn snapshot(&self) -> ArcMetricsSnapshot {
        ArcMetricsSnapshot {
            lookup_calls: self.metrics.lookup_calls,
            lookup_hits: self.metrics.lookup_hits,
            lookup_misses: self.metrics.lookup_misses,
            fetch_calls: self.metrics.fetch_calls,
            fetch_failures: self.metrics.fetch_failures,
            evicted_entries: self.metrics.evicted_entries,
            clear_calls: self.metrics.clear_calls,
            t1_to_t2_promotions: self.metrics.t1_to_t2_promotions,
            b1_ghost_hits: self.metrics.b1_ghost_hits,
            b2_ghost_hits: self.metrics.b2_ghost_hits,
            p_increases: self.metrics.p_increases,
            p_decreases: self.metrics.p_decreases,
            t1_evictions: self.metrics.t1_evictions,
            t2_evictions: self.metrics.t2_evictions,
            ghost_drops: self.metrics.ghost_drops,
            cache_len: self.len(),
            capacity: self.capacity,
            target_p: self.p,
            t1_len: self.t1_len(),
            t2_len: self.t2_len(),
            b1_len: self.b1_len(),
            b2_len: self.b2_len(),
        }
    }
}
