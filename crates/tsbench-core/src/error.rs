//! Error types for the benchmark pipeline.
//!
//! Each stage detects its own failures locally; the coordinator's
//! first-error-wins join (see [`crate::pipeline`]) is the single point
//! where a local failure becomes the run's failure.

use thiserror::Error;

/// Result alias for pipeline operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// Which timestamp column of a record failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    /// The `range-start` column.
    RangeStart,
    /// The `range-end` column.
    RangeEnd,
}

impl std::fmt::Display for TimestampField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RangeStart => f.write_str("range-start"),
            Self::RangeEnd => f.write_str("range-end"),
        }
    }
}

/// Malformed benchmark input. Fatal to the run.
///
/// Data-record variants carry the 1-based input line number of the
/// offending record (the header occupies line 1).
#[derive(Debug, Error)]
pub enum FormatError {
    /// The header record did not name the three expected columns.
    #[error("unknown input format: {0}")]
    UnknownHeader(String),

    /// A data record had an empty subject field.
    #[error("line {line}: empty subject")]
    EmptySubject {
        /// 1-based input line number.
        line: u64,
    },

    /// A timestamp column did not parse as `YYYY-MM-DD HH:MM:SS`.
    #[error("line {line}: invalid {field} timestamp: {value}")]
    MalformedTimestamp {
        /// 1-based input line number.
        line: u64,
        /// Which of the two timestamp columns failed.
        field: TimestampField,
        /// The offending field text.
        value: String,
    },

    /// The CSV reader rejected a record (wrong column count, broken
    /// quoting).
    #[error("line {line}: {source}")]
    Record {
        /// 1-based input line number.
        line: u64,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Database failure while preparing or running a query.
///
/// Fatal to the run: a failing query invalidates the benchmark rather
/// than being a transient event to mask with retries.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Preparing the benchmark statement failed.
    #[error("prepare failed: {0}")]
    Prepare(String),

    /// Running the prepared statement or scanning its result failed.
    #[error("query failed: {0}")]
    Query(String),

    /// The database connection was lost.
    #[error("connection lost: {0}")]
    Connection(String),
}

/// Top-level error returned by [`crate::pipeline::run`].
#[derive(Debug, Error)]
pub enum BenchError {
    /// Malformed input file.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Database failure.
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// The input contained a valid header but no data records; latency
    /// statistics over zero queries are undefined.
    #[error("input contained no data records")]
    EmptyInput,

    /// The caller cancelled the run before any stage failed.
    #[error("run cancelled")]
    Cancelled,
}
