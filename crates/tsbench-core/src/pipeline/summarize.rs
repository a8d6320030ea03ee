//! Aggregation stage: [`QueryOutcome`]s → [`RunSummary`].
//!
//! Maintains running count, sum, min, and max while consuming, and
//! buffers every latency so the median can be computed after the
//! channel closes. Buffering the full sequence is intentional: the
//! benchmark's output is a complete statistical summary, not a
//! streaming one.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::channel::recv_or_cancel;
use crate::error::BenchError;
use crate::types::{QueryOutcome, RunSummary};

/// Consumes the outcome sequence to completion (or until cancelled)
/// and produces the run summary.
///
/// A clean channel close with zero outcomes is an error: statistics
/// over zero queries are undefined, and a silent count=0 summary would
/// mask an empty input. On cancellation, whatever accumulated is
/// returned with no error — the stage that caused the cancellation
/// already reported.
pub(crate) async fn summarize_outcomes(
    mut rx: mpsc::Receiver<QueryOutcome>,
    cancel: CancellationToken,
) -> Result<RunSummary, BenchError> {
    let mut summary = RunSummary::default();
    let mut latencies: Vec<Duration> = Vec::new();

    while let Some(outcome) = recv_or_cancel(&mut rx, &cancel).await {
        summary.count += 1;
        summary.total_latency += outcome.latency;
        if summary.min_latency.is_zero() || outcome.latency < summary.min_latency {
            summary.min_latency = outcome.latency;
        }
        if outcome.latency > summary.max_latency {
            summary.max_latency = outcome.latency;
        }
        latencies.push(outcome.latency);
    }

    if cancel.is_cancelled() {
        if summary.count > 0 {
            finalize(&mut summary, &mut latencies);
        }
        tracing::debug!(count = summary.count, "aggregation stage cancelled");
        return Ok(summary);
    }

    if summary.count == 0 {
        return Err(BenchError::EmptyInput);
    }

    finalize(&mut summary, &mut latencies);
    tracing::debug!(count = summary.count, "aggregation stage finalized summary");
    Ok(summary)
}

fn finalize(summary: &mut RunSummary, latencies: &mut [Duration]) {
    #[allow(clippy::cast_possible_truncation)]
    let count = summary.count as u32;
    summary.mean_latency = summary.total_latency / count;
    latencies.sort_unstable();
    summary.median_latency = median(latencies);
}

/// Median of an ascending-sorted, non-empty slice: the middle value,
/// or the average of the two middle values for even lengths.
fn median(sorted: &[Duration]) -> Duration {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2
    } else {
        sorted[mid]
    }
}
