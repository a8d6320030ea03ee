//! Execution stage: [`QueryDescriptor`]s → [`QueryOutcome`]s.
//!
//! Consumes descriptors single-threaded and in order, issues each one
//! against the prepared statement, and brackets exactly the database
//! round trip with the latency measurement. Channel waits on either
//! side stay out of the measurement.

use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::channel::{recv_or_cancel, send_or_cancel};
use crate::error::BenchError;
use crate::executor::QueryExecutor;
use crate::types::{QueryDescriptor, QueryOutcome};

/// Drains descriptors from `rx`, executing each against `executor`.
///
/// The statement is prepared once, before the first descriptor.
/// Cancellation is observed between descriptors, not mid-query: an
/// in-flight query finishes rather than leaking a database-side
/// cursor. Database errors are returned unwrapped; there is no
/// per-query retry.
pub(crate) async fn execute_descriptors<E: QueryExecutor>(
    mut executor: E,
    mut rx: mpsc::Receiver<QueryDescriptor>,
    tx: mpsc::Sender<QueryOutcome>,
    cancel: CancellationToken,
) -> Result<(), BenchError> {
    executor.prepare().await?;

    let mut executed: u64 = 0;
    while let Some(descriptor) = recv_or_cancel(&mut rx, &cancel).await {
        let started = Instant::now();
        let (min_value, max_value) = executor.min_max(&descriptor).await?;
        let latency = started.elapsed();
        executed += 1;

        let outcome = QueryOutcome {
            min_value,
            max_value,
            latency,
        };
        if !send_or_cancel(&tx, outcome, &cancel).await {
            tracing::debug!(executed, "execution stage cancelled mid-stream");
            return Ok(());
        }
    }

    tracing::debug!(executed, "execution stage drained descriptors");
    Ok(())
}
