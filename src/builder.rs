//! Unified simulator builder for every replacement policy.
//!
//! Hides which policy sits behind a [`Simulator`] so a driver can replay one
//! trace through several of them with the same code.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::{PolicyKind, SimulatorBuilder};
//! use evictkit::traits::{HitCounter, TraceReplay};
//!
//! let mut sim = SimulatorBuilder::new(2)
//!     .build(PolicyKind::Lru, |k: &i64| k * 2)
//!     .unwrap();
//! for key in [1, 2, 1, 3, 1] {
//!     sim.replay(&key).unwrap();
//! }
//! assert_eq!(sim.hits(), 2);
//! assert_eq!(sim.policy_name(), "LRU");
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::{ConfigError, InvariantError};
use crate::policy::arc::ArcCache;
use crate::policy::ideal::IdealCache;
use crate::policy::lru::LruCache;
use crate::traits::{HitCounter, TraceReplay};

/// Available replacement policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Least Recently Used.
    Lru,
    /// Adaptive Replacement Cache.
    Arc,
    /// Offline optimum (Belady/MIN).
    Ideal,
}

impl PolicyKind {
    /// Every policy, in report order.
    pub const ALL: [PolicyKind; 3] = [PolicyKind::Arc, PolicyKind::Lru, PolicyKind::Ideal];

    /// Label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            PolicyKind::Lru => "LRU",
            PolicyKind::Arc => "ARC",
            PolicyKind::Ideal => "Ideal",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown policy `{}` (expected one of: arc, lru, ideal)",
            self.0
        )
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for PolicyKind {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(PolicyKind::Lru),
            "arc" => Ok(PolicyKind::Arc),
            "ideal" | "opt" | "min" | "belady" => Ok(PolicyKind::Ideal),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// A policy paired with the fetch function it admits pages with.
pub struct Simulator<K, V, F> {
    inner: SimulatorInner<K, V>,
    fetch: F,
}

enum SimulatorInner<K, V> {
    Lru(LruCache<K, V>),
    Arc(ArcCache<K, V>),
    Ideal(IdealCache<K>),
}

impl<K, V, F> Simulator<K, V, F>
where
    K: Clone + Eq + Hash,
{
    pub fn kind(&self) -> PolicyKind {
        match &self.inner {
            SimulatorInner::Lru(_) => PolicyKind::Lru,
            SimulatorInner::Arc(_) => PolicyKind::Arc,
            SimulatorInner::Ideal(_) => PolicyKind::Ideal,
        }
    }

    pub fn capacity(&self) -> usize {
        match &self.inner {
            SimulatorInner::Lru(lru) => lru.capacity(),
            SimulatorInner::Arc(arc) => arc.capacity(),
            SimulatorInner::Ideal(ideal) => ideal.capacity(),
        }
    }

    /// The wrapped ARC cache, if this simulator runs ARC.
    pub fn as_arc(&self) -> Option<&ArcCache<K, V>> {
        match &self.inner {
            SimulatorInner::Arc(arc) => Some(arc),
            _ => None,
        }
    }

    /// The wrapped LRU cache, if this simulator runs LRU.
    pub fn as_lru(&self) -> Option<&LruCache<K, V>> {
        match &self.inner {
            SimulatorInner::Lru(lru) => Some(lru),
            _ => None,
        }
    }
}

impl<K, V, F> HitCounter for Simulator<K, V, F>
where
    K: Clone + Eq + Hash,
{
    fn hits(&self) -> u64 {
        match &self.inner {
            SimulatorInner::Lru(lru) => lru.hits(),
            SimulatorInner::Arc(arc) => arc.hits(),
            SimulatorInner::Ideal(ideal) => ideal.hits(),
        }
    }

    fn requests(&self) -> u64 {
        match &self.inner {
            SimulatorInner::Lru(lru) => lru.requests(),
            SimulatorInner::Arc(arc) => arc.requests(),
            SimulatorInner::Ideal(ideal) => ideal.requests(),
        }
    }
}

impl<K, V, F> TraceReplay<K> for Simulator<K, V, F>
where
    K: Clone + Eq + Hash,
    F: FnMut(&K) -> V,
{
    fn policy_name(&self) -> &'static str {
        self.kind().label()
    }

    fn replay(&mut self, key: &K) -> Result<(), InvariantError> {
        let fetch = &mut self.fetch;
        match &mut self.inner {
            SimulatorInner::Lru(lru) => {
                lru.lookup_update(key.clone(), fetch);
            },
            SimulatorInner::Arc(arc) => {
                arc.lookup_update(key.clone(), fetch)?;
            },
            SimulatorInner::Ideal(ideal) => ideal.lookup_update(key.clone()),
        }
        Ok(())
    }
}

impl<K, V, F> fmt::Debug for Simulator<K, V, F>
where
    K: Clone + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("policy", &self.kind())
            .field("hits", &self.hits())
            .field("requests", &self.requests())
            .finish()
    }
}

/// Builder for [`Simulator`] instances.
#[derive(Debug, Clone, Copy)]
pub struct SimulatorBuilder {
    capacity: usize,
}

impl SimulatorBuilder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a simulator running `kind` with `fetch` as its page source.
    ///
    /// `fetch` is never called by the `Ideal` policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn build<K, V, F>(
        self,
        kind: PolicyKind,
        fetch: F,
    ) -> Result<Simulator<K, V, F>, ConfigError>
    where
        K: Clone + Eq + Hash,
        F: FnMut(&K) -> V,
    {
        let inner = match kind {
            PolicyKind::Lru => SimulatorInner::Lru(LruCache::try_new(self.capacity)?),
            PolicyKind::Arc => SimulatorInner::Arc(ArcCache::try_new(self.capacity)?),
            PolicyKind::Ideal => SimulatorInner::Ideal(IdealCache::try_new(self.capacity)?),
        };
        Ok(Simulator { inner, fetch })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay_all(kind: PolicyKind, capacity: usize, keys: &[i64]) -> u64 {
        let mut sim = SimulatorBuilder::new(capacity)
            .build(kind, |k: &i64| k * 2)
            .unwrap();
        for key in keys {
            sim.replay(key).unwrap();
        }
        assert_eq!(sim.requests(), keys.len() as u64);
        sim.hits()
    }

    #[test]
    fn every_policy_replays() {
        let keys = [1, 2, 1, 3, 1, 2];
        assert_eq!(replay_all(PolicyKind::Lru, 2, &keys), 2);
        assert_eq!(replay_all(PolicyKind::Ideal, 2, &keys), 3);
        assert!(replay_all(PolicyKind::Arc, 2, &keys) <= 3);
    }

    #[test]
    fn zero_capacity_is_a_config_error() {
        for kind in PolicyKind::ALL {
            let err = SimulatorBuilder::new(0)
                .build(kind, |k: &i64| *k)
                .unwrap_err();
            assert!(err.message().contains("capacity"));
        }
    }

    #[test]
    fn fetch_is_shared_across_calls() {
        let mut fetched = Vec::new();
        let mut sim = SimulatorBuilder::new(1)
            .build(PolicyKind::Arc, |k: &i64| {
                fetched.push(*k);
                *k
            })
            .unwrap();
        for key in [5, 5, 6] {
            sim.replay(&key).unwrap();
        }
        assert_eq!(sim.as_arc().map(|arc| arc.t1_len()), Some(1));
        assert!(sim.as_lru().is_none());
        drop(sim);
        assert_eq!(fetched, vec![5, 6]);
    }

    #[test]
    fn parse_and_display_policy() {
        assert_eq!("ARC".parse::<PolicyKind>(), Ok(PolicyKind::Arc));
        assert_eq!(" lru ".parse::<PolicyKind>(), Ok(PolicyKind::Lru));
        assert_eq!("opt".parse::<PolicyKind>(), Ok(PolicyKind::Ideal));
        assert!("fifo".parse::<PolicyKind>().is_err());
        assert_eq!(PolicyKind::Ideal.to_string(), "Ideal");
    }
}
