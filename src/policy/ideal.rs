//! Offline-optimal replacement (Belady's MIN).
//!
//! `IdealCache` only records the reference trace. The hit count is computed
//! on demand by replaying the trace with perfect knowledge of the future: on
//! overflow the resident key whose next reference is farthest away is evicted.
//! No online policy of the same capacity can score more hits on that trace,
//! which makes this the upper bound the other policies are measured against.
//!
//! ## Algorithm
//!
//! ```text
//!   backward pass:  occurrences[key] = stack of indices, smallest on top
//!
//!   forward pass, at time t for key k:
//!     pop t from occurrences[k], next = top of occurrences[k] (or never)
//!
//!     k resident → hit
//!                  next == never ? forget k : re-key k under next
//!     otherwise  → next == never ? bypass (admitting k can only hurt)
//!                                : admit k under next
//!                  if resident > capacity → evict last entry of by_next_use
//!
//!   next_use:    FxHashMap<&K, usize>     resident key → next reference time
//!   by_next_use: BTreeMap<usize, &K>      next reference time → resident key
//! ```
//!
//! Reference times are unique per trace position, so `by_next_use` never has
//! two keys under the same time. Eviction is `pop_last`, O(log c).
//!
//! | Operation       | Time          | Notes                         |
//! |-----------------|---------------|-------------------------------|
//! | `lookup_update` | O(1) amort.   | Appends to the trace          |
//! | `hits`          | O(n log c)    | Full replay, no caching       |
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::ideal::IdealCache;
//!
//! let mut ideal = IdealCache::new(2);
//! for key in [1, 2, 1, 3, 1, 2] {
//!     ideal.lookup_update(key);
//! }
//! assert_eq!(ideal.hits(), 3);
//! assert_eq!(ideal.requests(), 6);
//! ```

use std::collections::BTreeMap;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::ConfigError;
use crate::traits::HitCounter;

/// Trace recorder that reports the Belady/MIN hit count.
#[derive(Debug, Clone)]
pub struct IdealCache<K> {
    trace: Vec<K>,
    capacity: usize,
}

impl<K> IdealCache<K>
where
    K: Eq + Hash,
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
        Ok(Self {
            trace: Vec::new(),
            capacity,
        })
    }

    /// Records one reference. No analysis happens here.
    pub fn lookup_update(&mut self, key: K) {
        self.trace.push(key);
    }

    /// Maximum number of hits any cache of this capacity could score on the
    /// recorded trace.
    ///
    /// Recomputed on every call; repeated calls on the same trace agree.
    pub fn hits(&self) -> u64 {
        let hits = optimal_hits(&self.trace, self.capacity);
        debug!(
            requests = self.trace.len(),
            capacity = self.capacity,
            hits,
            "computed offline-optimal hit count"
        );
        hits
    }

    /// Number of recorded references.
    pub fn requests(&self) -> u64 {
        self.trace.len() as u64
    }

    pub fn trace(&self) -> &[K] {
        &self.trace
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Forgets the recorded trace.
    pub fn clear(&mut self) {
        self.trace.clear();
    }
}

impl<K> HitCounter for IdealCache<K>
where
    K: Eq + Hash,
{
    fn hits(&self) -> u64 {
        IdealCache::hits(self)
    }

    fn requests(&self) -> u64 {
        IdealCache::requests(self)
    }
}

/// Belady/MIN hit count of `trace` for a cache of `capacity` pages.
///
/// A zero capacity scores zero hits.
pub fn optimal_hits<K>(trace: &[K], capacity: usize) -> u64
where
    K: Eq + Hash,
{
    if capacity == 0 {
        return 0;
    }

    let mut occurrences: FxHashMap<&K, Vec<usize>> = FxHashMap::default();
    for (time, key) in trace.iter().enumerate().rev() {
        occurrences.entry(key).or_default().push(time);
    }

    let mut next_use: FxHashMap<&K, usize> = FxHashMap::default();
    let mut by_next_use: BTreeMap<usize, &K> = BTreeMap::new();
    let mut hits = 0u64;

    for (time, key) in trace.iter().enumerate() {
        let next = match occurrences.get_mut(key) {
            Some(stack) => {
                let current = stack.pop();
                debug_assert_eq!(current, Some(time));
                stack.last().copied()
            },
            None => None,
        };
        debug_assert!(next.is_none_or(|next| next > time));

        if let Some(scheduled) = next_use.remove(key) {
            hits += 1;
            by_next_use.remove(&scheduled);
            if let Some(next) = next {
                next_use.insert(key, next);
                by_next_use.insert(next, key);
            }
        } else if let Some(next) = next {
            next_use.insert(key, next);
            by_next_use.insert(next, key);
            if next_use.len() > capacity {
                if let Some((_, victim)) = by_next_use.pop_last() {
                    next_use.remove(victim);
                }
            }
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ideal_of(capacity: usize, keys: &[i64]) -> IdealCache<i64> {
        let mut ideal = IdealCache::new(capacity);
        for &k in keys {
            ideal.lookup_update(k);
        }
        ideal
    }

    #[test]
    fn empty_trace_scores_zero() {
        let ideal: IdealCache<i64> = IdealCache::new(3);
        assert_eq!(ideal.hits(), 0);
        assert_eq!(ideal.requests(), 0);
        assert!(ideal.is_empty());
    }

    #[test]
    fn beats_lru_on_reuse_trace() {
        let ideal = ideal_of(2, &[1, 2, 1, 3, 1, 2]);
        assert_eq!(ideal.hits(), 3);
    }

    #[test]
    fn cyclic_trace_keeps_one_hit_per_key() {
        let ideal = ideal_of(2, &[1, 2, 3, 1, 2, 3]);
        assert_eq!(ideal.hits(), 2);
    }

    #[test]
    fn hits_are_idempotent() {
        let ideal = ideal_of(3, &[4, 1, 4, 2, 5, 1, 4, 3, 2, 5]);
        let first = ideal.hits();
        assert_eq!(ideal.hits(), first);
        assert_eq!(ideal.trace().len(), 10);
    }

    #[test]
    fn large_capacity_only_misses_first_references() {
        let keys = [1, 2, 3, 1, 2, 3, 4, 4];
        let ideal = ideal_of(10, &keys);
        assert_eq!(ideal.hits(), 4);
    }

    #[test]
    fn single_slot_repeats() {
        let ideal = ideal_of(1, &[7, 7, 7, 8, 7]);
        assert_eq!(ideal.hits(), 3);
    }

    #[test]
    fn clear_forgets_trace() {
        let mut ideal = ideal_of(2, &[1, 1]);
        ideal.clear();
        assert_eq!(ideal.hits(), 0);
        assert_eq!(ideal.capacity(), 2);
        assert_eq!(optimal_hits(&[1, 1], 0), 0);
        assert!(IdealCache::<i64>::try_new(0).is_err());
    }
}
