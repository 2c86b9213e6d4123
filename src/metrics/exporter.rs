use std::io::Write;

use parking_lot::Mutex;

use crate::metrics::snapshot::{ArcMetricsSnapshot, LruMetricsSnapshot};
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes in the Prometheus text exposition format so the output can be
/// scraped directly or forwarded to an OpenTelemetry collector. Write errors
/// are dropped; metrics never fail the caller.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_counter(&self, name: &str, value: u64) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, name: &str, value: u64) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }

    fn write_core(
        &self,
        lookup_calls: u64,
        lookup_hits: u64,
        lookup_misses: u64,
        fetch_calls: u64,
        fetch_failures: u64,
        evicted_entries: u64,
    ) {
        self.write_counter(&self.metric_name("lookup_calls_total"), lookup_calls);
        self.write_counter(&self.metric_name("lookup_hits_total"), lookup_hits);
        self.write_counter(&self.metric_name("lookup_misses_total"), lookup_misses);
        self.write_counter(&self.metric_name("fetch_calls_total"), fetch_calls);
        self.write_counter(&self.metric_name("fetch_failures_total"), fetch_failures);
        self.write_counter(
            &self.metric_name("evicted_entries_total"),
            evicted_entries,
        );
    }
}

impl<W: Write + Send> MetricsExporter<LruMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LruMetricsSnapshot) {
        self.write_core(
            snapshot.lookup_calls,
            snapshot.lookup_hits,
            snapshot.lookup_misses,
            snapshot.fetch_calls,
            snapshot.fetch_failures,
            snapshot.evicted_entries,
        );
        self.write_counter(&self.metric_name("clear_calls_total"), snapshot.clear_calls);
        self.write_counter(
            &self.metric_name("move_to_front_calls_total"),
            snapshot.move_to_front_calls,
        );
        self.write_counter(&self.metric_name("peek_calls_total"), snapshot.peek_calls);
        self.write_counter(&self.metric_name("peek_found_total"), snapshot.peek_found);
        self.write_gauge(&self.metric_name("cache_len"), snapshot.cache_len as u64);
        self.write_gauge(&self.metric_name("capacity"), snapshot.capacity as u64);
    }
}

impl<W: Write + Send> MetricsExporter<ArcMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &ArcMetricsSnapshot) {
        self.write_core(
            snapshot.lookup_calls,
            snapshot.lookup_hits,
            snapshot.lookup_misses,
            snapshot.fetch_calls,
            snapshot.fetch_failures,
            snapshot.evicted_entries,
        );
        self.write_counter(&self.metric_name("clear_calls_total"), snapshot.clear_calls);
        self.write_counter(
            &self.metric_name("t1_to_t2_promotions_total"),
            snapshot.t1_to_t2_promotions,
        );
        self.write_counter(
            &self.metric_name("b1_ghost_hits_total"),
            snapshot.b1_ghost_hits,
        );
        self.write_counter(
            &self.metric_name("b2_ghost_hits_total"),
            snapshot.b2_ghost_hits,
        );
        self.write_counter(&self.metric_name("p_increases_total"), snapshot.p_increases);
        self.write_counter(&self.metric_name("p_decreases_total"), snapshot.p_decreases);
        self.write_counter(
            &self.metric_name("t1_evictions_total"),
            snapshot.t1_evictions,
        );
        self.write_counter(
            &self.metric_name("t2_evictions_total"),
            snapshot.t2_evictions,
        );
        self.write_counter(&self.metric_name("ghost_drops_total"), snapshot.ghost_drops);
        self.write_gauge(&self.metric_name("cache_len"), snapshot.cache_len as u64);
        self.write_gauge(&self.metric_name("capacity"), snapshot.capacity as u64);
        self.write_gauge(&self.metric_name("target_p"), snapshot.target_p as u64);
        self.write_gauge(&self.metric_name("t1_len"), snapshot.t1_len as u64);
        self.write_gauge(&self.metric_name("t2_len"), snapshot.t2_len as u64);
        self.write_gauge(&self.metric_name("b1_len"), snapshot.b1_len as u64);
        self.write_gauge(&self.metric_name("b2_len"), snapshot.b2_len as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lru_export_uses_prefix_and_types() {
        let exporter = PrometheusTextExporter::new("evictkit_lru", Vec::new());
        exporter.export(&LruMetricsSnapshot {
            lookup_calls: 3,
            lookup_hits: 1,
            capacity: 8,
            ..Default::default()
        });

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE evictkit_lru_lookup_calls_total counter\n"));
        assert!(text.contains("evictkit_lru_lookup_calls_total 3\n"));
        assert!(text.contains("evictkit_lru_lookup_hits_total 1\n"));
        assert!(text.contains("# TYPE evictkit_lru_capacity gauge\n"));
        assert!(text.contains("evictkit_lru_capacity 8\n"));
    }

    #[test]
    fn arc_export_without_prefix() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&ArcMetricsSnapshot {
            b2_ghost_hits: 4,
            target_p: 2,
            ..Default::default()
        });

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("b2_ghost_hits_total 4\n"));
        assert!(text.contains("target_p 2\n"));
        assert!(!text.contains("_b2_ghost"));
    }
}
