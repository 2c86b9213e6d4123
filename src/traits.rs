//! # Simulator Trait Hierarchy
//!
//! Small traits that let the comparison layer drive heterogeneous policies
//! through one interface without knowing which policy sits behind it.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────┐      ┌─────────────────────────────┐
//!   │     ReadOnlyCache<K>        │      │         HitCounter          │
//!   │                             │      │                             │
//!   │  contains(&, &K) → bool     │      │  hits(&) → u64              │
//!   │  len(&) → usize             │      │  requests(&) → u64          │
//!   │  is_empty(&) → bool         │      │  misses(&) → u64            │
//!   │  capacity(&) → usize        │      │  hit_ratio(&) → f64         │
//!   └─────────────────────────────┘      └──────────────┬──────────────┘
//!                                                       │
//!                                                       ▼
//!                                        ┌─────────────────────────────┐
//!                                        │       TraceReplay<K>        │
//!                                        │                             │
//!                                        │  policy_name(&) → &str      │
//!                                        │  replay(&mut, &K) → Result  │
//!                                        └─────────────────────────────┘
//! ```
//!
//! | Type          | ReadOnlyCache | HitCounter | TraceReplay |
//! |---------------|---------------|------------|-------------|
//! | `LruCache`    | yes           | yes        | via `Simulator` |
//! | `ArcCache`    | yes           | yes        | via `Simulator` |
//! | `IdealCache`  | no            | yes        | via `Simulator` |
//! | `Simulator`   | no            | yes        | yes         |
//!
//! The online policies need a fetch function to admit a page, so they only
//! become replayable once a [`Simulator`](crate::builder::Simulator) pairs
//! them with one. `IdealCache` keeps no resident set between calls and so has
//! nothing to answer `contains` with.

use crate::error::InvariantError;

/// Read-only view of a cache's resident set.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCache;
/// use evictkit::traits::ReadOnlyCache;
///
/// fn fill<C: ReadOnlyCache<u64>>(cache: &C) -> f64 {
///     cache.len() as f64 / cache.capacity() as f64
/// }
///
/// let mut cache = LruCache::new(4);
/// cache.lookup_update(1u64, |k| *k);
/// assert_eq!(fill(&cache), 0.25);
/// ```
pub trait ReadOnlyCache<K> {
    /// Returns `true` if `key` currently holds a page.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident pages.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident pages.
    fn capacity(&self) -> usize;
}

/// Running hit/request totals.
pub trait HitCounter {
    fn hits(&self) -> u64;

    fn requests(&self) -> u64;

    fn misses(&self) -> u64 {
        self.requests().saturating_sub(self.hits())
    }

    /// Hits divided by requests; `0.0` before the first request.
    fn hit_ratio(&self) -> f64 {
        match self.requests() {
            0 => 0.0,
            requests => self.hits() as f64 / requests as f64,
        }
    }
}

/// A policy that can be fed a trace one key at a time.
pub trait TraceReplay<K>: HitCounter {
    /// Short label used in reports, e.g. `"ARC"`.
    fn policy_name(&self) -> &'static str;

    /// Records one reference to `key`.
    fn replay(&mut self, key: &K) -> Result<(), InvariantError>;
}
