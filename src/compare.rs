//! Side-by-side policy comparison over one trace.
//!
//! ```text
//!   keys ──► for each key ──► ARC.replay(key)
//!                         ──► LRU.replay(key)
//!                         ──► Ideal.replay(key)
//!
//!   report: one PolicyOutcome { policy, hits, requests } per policy,
//!           in the order the policies were requested
//! ```
//!
//! The policies never see each other's state; they only share the trace and
//! the fetch function.
//!
//! ## Example
//!
//! ```
//! use evictkit::builder::PolicyKind;
//! use evictkit::compare::Comparison;
//!
//! let report = Comparison::new(2)
//!     .run(&[1i64, 2, 1, 3, 1, 2], |k| k * 2)
//!     .unwrap();
//!
//! assert_eq!(report.outcome(PolicyKind::Lru).map(|o| o.hits), Some(2));
//! assert_eq!(report.outcome(PolicyKind::Ideal).map(|o| o.hits), Some(3));
//! assert_eq!(
//!     report.render_verbose().lines().last(),
//!     Some("Ideal hits: 3 out of 6 requests"),
//! );
//! ```

use std::fmt;
use std::hash::Hash;

use tracing::{debug, info};

use crate::builder::{PolicyKind, SimulatorBuilder};
use crate::error::{ConfigError, InvariantError};
use crate::traits::{HitCounter, TraceReplay};

/// Hits scored by one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub policy: PolicyKind,
    pub hits: u64,
    pub requests: u64,
}

impl PolicyOutcome {
    pub fn hit_ratio(&self) -> f64 {
        match self.requests {
            0 => 0.0,
            requests => self.hits as f64 / requests as f64,
        }
    }
}

/// Result of one comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    capacity: usize,
    requests: u64,
    outcomes: Vec<PolicyOutcome>,
}

impl ComparisonReport {
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Outcomes in the order the policies were requested.
    pub fn outcomes(&self) -> &[PolicyOutcome] {
        &self.outcomes
    }

    pub fn outcome(&self, policy: PolicyKind) -> Option<&PolicyOutcome> {
        self.outcomes.iter().find(|o| o.policy == policy)
    }

    /// One hit count per line.
    pub fn render_compact(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            out.push_str(&outcome.hits.to_string());
            out.push('\n');
        }
        out
    }

    /// `"<POLICY> hits: H out of N requests"`, one line per policy.
    pub fn render_verbose(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            out.push_str(&format!(
                "{} hits: {} out of {} requests\n",
                outcome.policy, outcome.hits, outcome.requests
            ));
        }
        out
    }
}

/// Failure of a comparison run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    Config(ConfigError),
    Invariant {
        policy: PolicyKind,
        source: InvariantError,
    },
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareError::Config(err) => write!(f, "invalid comparison setup: {err}"),
            CompareError::Invariant { policy, source } => write!(f, "{policy}: {source}"),
        }
    }
}

impl std::error::Error for CompareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompareError::Config(err) => Some(err),
            CompareError::Invariant { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for CompareError {
    fn from(err: ConfigError) -> Self {
        CompareError::Config(err)
    }
}

/// Configures which policies to run and at what capacity.
#[derive(Debug, Clone)]
pub struct Comparison {
    capacity: usize,
    policies: Vec<PolicyKind>,
}

impl Comparison {
    /// Compares every policy in [`PolicyKind::ALL`] order.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policies: PolicyKind::ALL.to_vec(),
        }
    }

    /// Restricts the run to `policies`. Duplicates are dropped, order is kept.
    pub fn with_policies(mut self, policies: &[PolicyKind]) -> Self {
        self.policies.clear();
        for &policy in policies {
            if !self.policies.contains(&policy) {
                self.policies.push(policy);
            }
        }
        self
    }

    pub fn policies(&self) -> &[PolicyKind] {
        &self.policies
    }

    /// Replays `keys` through every configured policy.
    ///
    /// `fetch` is shared by the online policies; each miss calls it once.
    pub fn run<K, V, F>(&self, keys: &[K], fetch: F) -> Result<ComparisonReport, CompareError>
    where
        K: Clone + Eq + Hash,
        F: Fn(&K) -> V,
    {
        let builder = SimulatorBuilder::new(self.capacity);
        let mut sims = self
            .policies
            .iter()
            .map(|&kind| builder.build(kind, &fetch))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            capacity = self.capacity,
            requests = keys.len(),
            policies = sims.len(),
            "starting comparison"
        );
        for key in keys {
            for sim in &mut sims {
                sim.replay(key).map_err(|source| CompareError::Invariant {
                    policy: sim.kind(),
                    source,
                })?;
            }
        }

        let outcomes: Vec<PolicyOutcome> = sims
            .iter()
            .map(|sim| PolicyOutcome {
                policy: sim.kind(),
                hits: sim.hits(),
                requests: sim.requests(),
            })
            .collect();
        for outcome in &outcomes {
            info!(
                policy = %outcome.policy,
                hits = outcome.hits,
                requests = outcome.requests,
                "policy finished"
            );
        }

        Ok(ComparisonReport {
            capacity: self.capacity,
            requests: keys.len() as u64,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn default_order_is_arc_lru_ideal() {
        let report = Comparison::new(2).run(&[1i64, 2, 3], |k| *k).unwrap();
        let order: Vec<_> = report.outcomes().iter().map(|o| o.policy).collect();
        assert_eq!(order, vec![PolicyKind::Arc, PolicyKind::Lru, PolicyKind::Ideal]);
        assert_eq!(report.requests(), 3);
    }

    #[test]
    fn subset_dedups_and_keeps_order() {
        let cmp = Comparison::new(3).with_policies(&[
            PolicyKind::Ideal,
            PolicyKind::Lru,
            PolicyKind::Ideal,
        ]);
        assert_eq!(cmp.policies(), &[PolicyKind::Ideal, PolicyKind::Lru]);

        let report = cmp.run(&[1i64, 1], |k| *k).unwrap();
        assert_eq!(report.render_compact(), "1\n1\n");
        assert!(report.outcome(PolicyKind::Arc).is_none());
    }

    #[test]
    fn verbose_uses_policy_labels() {
        let report = Comparison::new(2)
            .run(&[1i64, 1, 2, 2], |k| k * 2)
            .unwrap();
        assert_eq!(
            report.render_verbose(),
            "ARC hits: 2 out of 4 requests\n\
             LRU hits: 2 out of 4 requests\n\
             Ideal hits: 2 out of 4 requests\n"
        );
    }

    #[test]
    fn fetch_runs_once_per_online_miss() {
        let calls = Cell::new(0u64);
        let report = Comparison::new(2)
            .with_policies(&[PolicyKind::Arc, PolicyKind::Lru])
            .run(&[1i64, 2, 1, 3, 1, 2], |k| {
                calls.set(calls.get() + 1);
                *k
            })
            .unwrap();

        let misses: u64 = report
            .outcomes()
            .iter()
            .map(|o| o.requests - o.hits)
            .sum();
        assert_eq!(calls.get(), misses);
    }

    #[test]
    fn zero_capacity_is_reported() {
        let err = Comparison::new(0).run(&[1i64], |k| *k).unwrap_err();
        assert!(matches!(err, CompareError::Config(_)));
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn hit_ratio_of_outcome() {
        let outcome = PolicyOutcome {
            policy: PolicyKind::Lru,
            hits: 1,
            requests: 4,
        };
        assert!((outcome.hit_ratio() - 0.25).abs() < f64::EPSILON);
    }
}
