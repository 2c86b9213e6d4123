pub use crate::builder::{PolicyKind, Simulator, SimulatorBuilder};
pub use crate::compare::{Comparison, ComparisonReport, PolicyOutcome};
pub use crate::ds::{IntrusiveList, ListSet, SlotArena, SlotId};
pub use crate::error::{CacheError, ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::{ArcMetricsSnapshot, LruMetricsSnapshot, MetricsSnapshotProvider};
pub use crate::policy::arc::{ArcCache, ArcList};
pub use crate::policy::ideal::IdealCache;
pub use crate::policy::lru::LruCache;
pub use crate::trace::{Trace, TraceError, TraceSpec};
pub use crate::traits::{HitCounter, ReadOnlyCache, TraceReplay};
