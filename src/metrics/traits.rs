//! # Metrics Trait Hierarchy
//!
//! Separates *recording*, *snapshotting* and *export* into small traits so
//! counters can be read by benches and tests or published to monitoring
//! without coupling either concern to policy logic.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌─────────────────────────────┐
//!                   │     CoreMetricsRecorder     │
//!                   │  lookup_hit/lookup_miss     │
//!                   │  fetch_call/evicted/clear   │
//!                   └──────────────┬──────────────┘
//!                                  │
//!                 ┌────────────────┴────────────────┐
//!                 ▼                                 ▼
//!          ┌──────────────┐                 ┌──────────────┐
//!          │     Lru      │                 │     Arc      │
//!          │   Recorder   │                 │   Recorder   │
//!          └──────────────┘                 └──────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (monitoring)                 │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Counters shared by every online policy.
pub trait CoreMetricsRecorder {
    fn record_lookup_hit(&mut self);
    fn record_lookup_miss(&mut self);
    fn record_fetch_call(&mut self);
    fn record_fetch_failure(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// LRU-specific counters.
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_move_to_front(&mut self);
}

/// Read-only LRU counters for `&self` methods (interior mutability).
pub trait LruMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
}

/// Metrics for ARC behavior (adaptive replacement with ghost lists).
pub trait ArcMetricsRecorder: CoreMetricsRecorder {
    fn record_t1_to_t2_promotion(&mut self);
    fn record_b1_ghost_hit(&mut self);
    fn record_b2_ghost_hit(&mut self);
    fn record_p_increase(&mut self);
    fn record_p_decrease(&mut self);
    fn record_t1_eviction(&mut self);
    fn record_t2_eviction(&mut self);
    fn record_ghost_drop(&mut self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
