use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{
    ArcMetricsRecorder, CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder,
};

#[derive(Debug, Default)]
pub struct LruMetrics {
    pub lookup_calls: u64,
    pub lookup_hits: u64,
    pub lookup_misses: u64,
    pub fetch_calls: u64,
    pub fetch_failures: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,
    pub move_to_front_calls: u64,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
}

#[derive(Debug, Default)]
pub struct ArcMetrics {
    pub lookup_calls: u64,
    pub lookup_hits: u64,
    pub lookup_misses: u64,
    pub fetch_calls: u64,
    pub fetch_failures: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,

    pub t1_to_t2_promotions: u64,
    pub b1_ghost_hits: u64,
    pub b2_ghost_hits: u64,
    pub p_increases: u64,
    pub p_decreases: u64,
    pub t1_evictions: u64,
    pub t2_evictions: u64,
    pub ghost_drops: u64,
}

impl CoreMetricsRecorder for LruMetrics {
    fn record_lookup_hit(&mut self) {
        self.lookup_calls += 1;
        self.lookup_hits += 1;
    }

    fn record_lookup_miss(&mut self) {
        self.lookup_calls += 1;
        self.lookup_misses += 1;
    }

    fn record_fetch_call(&mut self) {
        self.fetch_calls += 1;
    }

    fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LruMetricsRecorder for LruMetrics {
    fn record_move_to_front(&mut self) {
        self.move_to_front_calls += 1;
    }
}

impl LruMetricsReadRecorder for &LruMetrics {
    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }
}

impl CoreMetricsRecorder for ArcMetrics {
    fn record_lookup_hit(&mut self) {
        self.lookup_calls += 1;
        self.lookup_hits += 1;
    }

    fn record_lookup_miss(&mut self) {
        self.lookup_calls += 1;
        self.lookup_misses += 1;
    }

    fn record_fetch_call(&mut self) {
        self.fetch_calls += 1;
    }

    fn record_fetch_failure(&mut self) {
        self.fetch_failures += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl ArcMetricsRecorder for ArcMetrics {
    fn record_t1_to_t2_promotion(&mut self) {
        self.t1_to_t2_promotions += 1;
    }

    fn record_b1_ghost_hit(&mut self) {
        self.b1_ghost_hits += 1;
    }

    fn record_b2_ghost_hit(&mut self) {
        self.b2_ghost_hits += 1;
    }

    fn record_p_increase(&mut self) {
        self.p_increases += 1;
    }

    fn record_p_decrease(&mut self) {
        self.p_decreases += 1;
    }

    fn record_t1_eviction(&mut self) {
        self.t1_evictions += 1;
    }

    fn record_t2_eviction(&mut self) {
        self.t2_evictions += 1;
    }

    fn record_ghost_drop(&mut self) {
        self.ghost_drops += 1;
    }
}
