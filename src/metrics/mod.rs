//! Optional per-policy counters (feature `metrics`).
//!
//! `ArcCache` and `LruCache` record into [`ArcMetrics`] / [`LruMetrics`] on
//! every lookup. Read them through
//! [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider) and publish
//! with [`PrometheusTextExporter`].

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use exporter::PrometheusTextExporter;
pub use metrics_impl::{ArcMetrics, LruMetrics};
pub use snapshot::{ArcMetricsSnapshot, LruMetricsSnapshot};
pub use traits::{MetricsExporter, MetricsSnapshotProvider};
