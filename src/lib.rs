//! evictkit: page-replacement policies and an offline-optimal baseline.
//!
//! - [`policy::arc::ArcCache`]: Adaptive Replacement Cache.
//! - [`policy::lru::LruCache`]: recency-only baseline.
//! - [`policy::ideal::IdealCache`]: Belady/MIN, the best any policy of the
//!   same capacity could do on a recorded trace.
//!
//! [`compare::Comparison`] replays one trace through several policies and
//! [`trace`] reads, generates and writes the trace files the `evictkit`
//! binary consumes.

pub mod builder;
pub mod compare;
pub mod ds;
pub mod error;
pub mod policy;
pub mod trace;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
