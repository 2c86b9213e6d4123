//! Replacement policies.
//!
//! | Policy       | Module    | Kind                                   |
//! |--------------|-----------|----------------------------------------|
//! | `ArcCache`   | [`arc`]   | Online, adaptive recency/frequency     |
//! | `LruCache`   | [`lru`]   | Online, recency only                   |
//! | `IdealCache` | [`ideal`] | Offline optimum (Belady/MIN)           |

pub mod arc;
pub mod ideal;
pub mod lru;

/// Upper bound on the slots a cache reserves up front. Larger caches grow
/// on demand.
pub(crate) const MAX_INITIAL_RESERVE: usize = 4096;
