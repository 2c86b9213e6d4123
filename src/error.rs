//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a policy is configured with invalid
//!   parameters (a zero capacity).
//! - [`InvariantError`]: Returned when internal bookkeeping is found to be
//!   inconsistent, e.g. an indexed ARC key that resolves to no list. This is
//!   never reachable while the invariants hold; it signals a bug, not bad input.
//! - [`CacheError`]: Returned by the fallible `try_lookup_update` methods. It
//!   carries either the caller's fetch error or an [`InvariantError`].
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::{CacheError, ConfigError};
//! use evictkit::policy::arc::ArcCache;
//!
//! let bad: Result<ArcCache<u64, u64>, ConfigError> = ArcCache::try_new(0);
//! assert!(bad.is_err());
//!
//! let mut cache = ArcCache::new(2);
//! let err = cache
//!     .try_lookup_update(7u64, |_| Err::<u64, _>("disk offline"))
//!     .unwrap_err();
//! assert!(matches!(err, CacheError::Fetch("disk offline")));
//! assert_eq!(cache.requests(), 0);
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` and by lookups that discover corrupted
/// bookkeeping. Carries a human-readable description of what failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache invariant violated: {}", self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    pub(crate) fn zero_capacity() -> Self {
        Self::new("cache capacity must be greater than zero")
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Failure of a fallible lookup.
///
/// `Fetch` means the caller's materialization function failed; the cache is
/// left exactly as it was before the call. `Invariant` means the cache found
/// its own bookkeeping corrupted and should be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError<E> {
    Fetch(E),
    Invariant(InvariantError),
}

impl<E> CacheError<E> {
    /// Returns the fetch error, if that is what this is.
    pub fn into_fetch(self) -> Option<E> {
        match self {
            CacheError::Fetch(err) => Some(err),
            CacheError::Invariant(_) => None,
        }
    }
}

impl<E> From<InvariantError> for CacheError<E> {
    fn from(err: InvariantError) -> Self {
        CacheError::Invariant(err)
    }
}

impl<E: fmt::Display> fmt::Display for CacheError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Fetch(err) => write!(f, "page fetch failed: {err}"),
            CacheError::Invariant(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl<E> std::error::Error for CacheError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Fetch(err) => Some(err),
            CacheError::Invariant(err) => Some(err),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
