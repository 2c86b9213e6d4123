//! Reference traces: parsing, generation and fixture files.
//!
//! ## Format
//!
//! ```text
//!   <capacity> <count>
//!   <key_1> <key_2> ... <key_count>
//! ```
//!
//! All tokens are whitespace separated; line breaks carry no meaning. Both
//! header values must be positive, keys are signed 64-bit integers, and
//! tokens after the announced `count` keys are ignored.
//!
//! ## Fixtures
//!
//! [`TraceSpec`] draws keys uniformly from `[low, high]` with a seeded
//! `StdRng`, so the same spec and seed always produce the same file.
//! [`write_fixtures`] writes one `<idx>.dat` per spec.
//!
//! ```
//! use evictkit::trace::{Trace, TraceSpec, DEFAULT_SEED};
//!
//! let trace = Trace::parse("2 5\n1 2 1 3 1\n").unwrap();
//! assert_eq!(trace.capacity(), 2);
//! assert_eq!(trace.keys(), &[1, 2, 1, 3, 1]);
//!
//! let spec = TraceSpec { count: 10, capacity: 3, low: 0, high: 4 };
//! let a = spec.generate(DEFAULT_SEED).unwrap();
//! let b = spec.generate(DEFAULT_SEED).unwrap();
//! assert_eq!(a, b);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Seed used for the standard fixtures.
pub const DEFAULT_SEED: u64 = 275;

/// Upper bound on keys reserved from the header before any are read.
const MAX_KEY_RESERVE: usize = 1 << 16;

/// The five standard fixture cases.
pub const DEFAULT_FIXTURES: [TraceSpec; 5] = [
    TraceSpec {
        count: 1_000,
        capacity: 15,
        low: 0,
        high: 30,
    },
    TraceSpec {
        count: 1_000,
        capacity: 30,
        low: 0,
        high: 2_000,
    },
    TraceSpec {
        count: 300_000,
        capacity: 50,
        low: 0,
        high: 100,
    },
    TraceSpec {
        count: 300_000,
        capacity: 1_000,
        low: 0,
        high: 25_000,
    },
    TraceSpec {
        count: 300_000,
        capacity: 10_000,
        low: 0,
        high: 25_000,
    },
];

// ---------------------------------------------------------------------------
// TraceError
// ---------------------------------------------------------------------------

/// Broad class of a [`TraceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceErrorKind {
    /// The trace or the request was malformed.
    Input,
    /// Reading or writing failed.
    Io,
}

#[derive(Debug)]
pub enum TraceError {
    /// The input ended before the named header field.
    MissingHeader { field: &'static str },
    /// A token is not a signed 64-bit integer.
    InvalidToken { position: usize, token: String },
    /// A header field is zero or negative.
    NonPositive { field: &'static str, value: i64 },
    /// Fewer keys than the header announced.
    Truncated { expected: usize, found: usize },
    /// A generation range with `low > high`.
    InvalidRange { low: i64, high: i64 },
    /// The fixture target exists but is not a directory.
    NotADirectory(PathBuf),
    Io(io::Error),
}

impl TraceError {
    pub fn kind(&self) -> TraceErrorKind {
        match self {
            TraceError::Io(_) => TraceErrorKind::Io,
            _ => TraceErrorKind::Input,
        }
    }

    pub fn is_input_error(&self) -> bool {
        self.kind() == TraceErrorKind::Input
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::MissingHeader { field } => write!(f, "failed to read {field}"),
            TraceError::InvalidToken { position, token } => {
                write!(f, "token {position} is not an integer: `{token}`")
            },
            TraceError::NonPositive { field, value } => {
                write!(f, "invalid {field} {value}: only positive values are accepted")
            },
            TraceError::Truncated { expected, found } => {
                write!(f, "expected {expected} keys, found {found}")
            },
            TraceError::InvalidRange { low, high } => {
                write!(f, "empty key range [{low}, {high}]")
            },
            TraceError::NotADirectory(path) => {
                write!(f, "{} is not a directory", path.display())
            },
            TraceError::Io(err) => write!(f, "trace I/O failed: {err}"),
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(err: io::Error) -> Self {
        TraceError::Io(err)
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// A cache capacity plus the keys to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    capacity: usize,
    keys: Vec<i64>,
}

impl Trace {
    /// Builds a trace directly. `capacity` must be positive.
    pub fn new(capacity: usize, keys: Vec<i64>) -> Result<Self, TraceError> {
        if capacity == 0 {
            return Err(TraceError::NonPositive {
                field: "cache size",
                value: 0,
            });
        }
        Ok(Self { capacity, keys })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn keys(&self) -> &[i64] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Parses the header and the announced number of keys.
    pub fn parse(input: &str) -> Result<Self, TraceError> {
        let mut tokens = input.split_whitespace().enumerate();

        let capacity = header_field(tokens.next(), "cache size")?;
        let count = header_field(tokens.next(), "number of elements")?;

        let mut keys = Vec::with_capacity(count.min(MAX_KEY_RESERVE));
        for (position, token) in tokens.take(count) {
            keys.push(parse_token(position, token)?);
        }
        if keys.len() < count {
            return Err(TraceError::Truncated {
                expected: count,
                found: keys.len(),
            });
        }

        debug!(capacity, count, "parsed trace");
        Ok(Self { capacity, keys })
    }

    /// Reads all of `reader` and parses it.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self, TraceError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse(&input)
    }

    /// Writes the trace in the format [`parse`](Self::parse) accepts.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), TraceError> {
        writeln!(writer, "{} {}", self.capacity, self.keys.len())?;
        let mut first = true;
        for key in &self.keys {
            if !first {
                writer.write_all(b" ")?;
            }
            write!(writer, "{key}")?;
            first = false;
        }
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

fn parse_token(position: usize, token: &str) -> Result<i64, TraceError> {
    token.parse::<i64>().map_err(|_| TraceError::InvalidToken {
        position,
        token: token.to_string(),
    })
}

fn header_field(token: Option<(usize, &str)>, field: &'static str) -> Result<usize, TraceError> {
    let (position, token) = token.ok_or(TraceError::MissingHeader { field })?;
    let value = parse_token(position, token)?;
    if value <= 0 {
        return Err(TraceError::NonPositive { field, value });
    }
    usize::try_from(value).map_err(|_| TraceError::InvalidToken {
        position,
        token: token.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Parameters of a generated trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSpec {
    pub count: usize,
    pub capacity: usize,
    pub low: i64,
    pub high: i64,
}

impl TraceSpec {
    /// Draws `count` keys uniformly from `[low, high]` using `seed`.
    pub fn generate(&self, seed: u64) -> Result<Trace, TraceError> {
        if self.low > self.high {
            return Err(TraceError::InvalidRange {
                low: self.low,
                high: self.high,
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let keys = (0..self.count)
            .map(|_| rng.gen_range(self.low..=self.high))
            .collect();
        Trace::new(self.capacity, keys)
    }
}

/// Writes `specs[idx]` to `dir/<idx>.dat` for every spec, each generated
/// from `seed`. Returns the written paths in order.
pub fn write_fixtures(
    dir: &Path,
    specs: &[TraceSpec],
    seed: u64,
) -> Result<Vec<PathBuf>, TraceError> {
    if !dir.is_dir() {
        return Err(TraceError::NotADirectory(dir.to_path_buf()));
    }

    let mut written = Vec::with_capacity(specs.len());
    for (idx, spec) in specs.iter().enumerate() {
        let trace = spec.generate(seed)?;
        let path = dir.join(format!("{idx}.dat"));
        trace.write_to(BufWriter::new(File::create(&path)?))?;
        info!(path = %path.display(), count = spec.count, "wrote trace fixture");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_layout_and_trailing_tokens() {
        let trace = Trace::parse("  3\n4 \n 7 -1\n9\t0 99 extra").unwrap();
        assert_eq!(trace.capacity(), 3);
        assert_eq!(trace.keys(), &[7, -1, 9, 0]);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Trace::parse(""),
            Err(TraceError::MissingHeader {
                field: "cache size"
            })
        ));
        assert!(matches!(
            Trace::parse("4"),
            Err(TraceError::MissingHeader {
                field: "number of elements"
            })
        ));
        assert!(matches!(
            Trace::parse("0 3 1 2 3"),
            Err(TraceError::NonPositive { value: 0, .. })
        ));
        assert!(matches!(
            Trace::parse("2 -1"),
            Err(TraceError::NonPositive { value: -1, .. })
        ));
        assert!(matches!(
            Trace::parse("2 3 1 x 3"),
            Err(TraceError::InvalidToken { position: 3, .. })
        ));
        assert!(matches!(
            Trace::parse("2 3 1 2"),
            Err(TraceError::Truncated {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn huge_announced_count_is_truncated_not_allocated() {
        let err = Trace::parse("2 9223372036854775807 1 2 3").unwrap_err();
        assert!(matches!(
            err,
            TraceError::Truncated { expected, found: 3 } if expected as u64 == i64::MAX as u64
        ));
        assert!(err.is_input_error());
    }

    #[test]
    fn error_kinds() {
        assert!(Trace::parse("").unwrap_err().is_input_error());
        let io = TraceError::from(io::Error::other("boom"));
        assert_eq!(io.kind(), TraceErrorKind::Io);
        assert!(io.to_string().contains("boom"));
    }

    #[test]
    fn write_then_parse_matches() {
        let trace = Trace::new(2, vec![5, -3, 5]).unwrap();
        let mut buf = Vec::new();
        trace.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "2 3\n5 -3 5\n");
        assert_eq!(Trace::read_from(buf.as_slice()).unwrap(), trace);
    }

    #[test]
    fn generation_is_seeded_and_bounded() {
        let spec = TraceSpec {
            count: 500,
            capacity: 4,
            low: -5,
            high: 5,
        };
        let a = spec.generate(DEFAULT_SEED).unwrap();
        assert_eq!(a, spec.generate(DEFAULT_SEED).unwrap());
        assert_ne!(a, spec.generate(DEFAULT_SEED + 1).unwrap());
        assert_eq!(a.len(), 500);
        assert!(a.keys().iter().all(|k| (-5..=5).contains(k)));
    }

    #[test]
    fn generation_rejects_bad_specs() {
        let inverted = TraceSpec {
            count: 1,
            capacity: 1,
            low: 3,
            high: 2,
        };
        assert!(matches!(
            inverted.generate(1),
            Err(TraceError::InvalidRange { .. })
        ));
        let zero = TraceSpec {
            capacity: 0,
            ..inverted
        };
        assert!(zero.generate(1).is_err());
    }
}
