//! Pipeline data model.
//!
//! Each value crosses exactly one ownership boundary: a
//! [`QueryDescriptor`] moves from the source stage to the execution
//! stage, a [`QueryOutcome`] from the execution stage to the
//! aggregation stage. Nothing is mutated after construction.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A single parsed benchmark query: which subject to aggregate and over
/// which UTC time range.
///
/// The range bounds are forwarded as parsed; `range_start` is not
/// required to precede `range_end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    /// Subject (host) name. Never empty.
    pub subject: String,
    /// Inclusive range start, UTC.
    pub range_start: DateTime<Utc>,
    /// Inclusive range end, UTC.
    pub range_end: DateTime<Utc>,
}

/// The measured result of executing one descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOutcome {
    /// Minimum of the measured value within the range.
    pub min_value: f64,
    /// Maximum of the measured value within the range.
    pub max_value: f64,
    /// Round trip of the prepared query, excluding channel waits.
    pub latency: Duration,
}

/// Latency statistics over one complete run.
///
/// Built incrementally by the aggregation stage; `mean_latency` and
/// `median_latency` are computed only after the outcome sequence is
/// exhausted. This is the sole output of a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of queries executed.
    pub count: usize,
    /// Sum of all query latencies.
    pub total_latency: Duration,
    /// Fastest query.
    pub min_latency: Duration,
    /// Slowest query.
    pub max_latency: Duration,
    /// Mean latency (truncating division).
    pub mean_latency: Duration,
    /// Median latency; for even counts, the average of the two middle
    /// values.
    pub median_latency: Duration,
}
