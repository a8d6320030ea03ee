//! The query-execution seam between the pipeline and the database.

use async_trait::async_trait;

use crate::error::ExecutionError;
use crate::types::QueryDescriptor;

/// Executes min/max range queries against the benchmarked database.
///
/// Implementations prepare the underlying statement once per stage
/// lifetime via [`prepare`](QueryExecutor::prepare) and reuse the
/// prepared form for every descriptor, so planning cost never pollutes
/// the per-query latency measurement.
#[async_trait]
pub trait QueryExecutor: Send {
    /// Prepares the benchmark statement. Called exactly once, before
    /// the first [`min_max`](QueryExecutor::min_max) call.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError::Prepare`] if the statement cannot be
    /// prepared.
    async fn prepare(&mut self) -> Result<(), ExecutionError>;

    /// Runs the prepared statement for one descriptor and returns the
    /// `(min, max)` of the measured value within its range.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the run; the pipeline never retries.
    async fn min_max(
        &mut self,
        descriptor: &QueryDescriptor,
    ) -> Result<(f64, f64), ExecutionError>;
}
