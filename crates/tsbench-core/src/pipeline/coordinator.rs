//! Pipeline coordinator: wires the three stages and joins them with
//! first-error-wins semantics.
//!
//! The coordinator owns the two bounded handoff channels and a child
//! cancellation token derived from the caller's. The moment any stage
//! returns an error, the child token is cancelled, the other stages
//! unwind at their next cancellable channel operation, and only that
//! first error survives the join. Because every handoff is cancellable,
//! no stage can block forever on a peer that already stopped.

use std::io::Read;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::config::PipelineConfig;
use super::execute::execute_descriptors;
use super::source::read_descriptors;
use super::summarize::summarize_outcomes;
use crate::error::BenchError;
use crate::executor::QueryExecutor;
use crate::types::RunSummary;

/// What a joined stage produced. Only the aggregation stage carries a
/// value.
enum StageOutput {
    Done,
    Summary(RunSummary),
}

/// Runs the benchmark pipeline with the default configuration.
///
/// # Errors
///
/// Returns the first error any stage reported, or
/// [`BenchError::Cancelled`] if `cancel` fired with no stage error.
/// Statistics accumulated before a failure are discarded: the run is
/// complete and correct, or explicitly failed.
pub async fn run<R, E>(
    input: R,
    executor: E,
    cancel: &CancellationToken,
) -> Result<RunSummary, BenchError>
where
    R: Read + Send + 'static,
    E: QueryExecutor + 'static,
{
    run_with_config(input, executor, cancel, &PipelineConfig::default()).await
}

/// Runs the benchmark pipeline: CSV `input` through `executor` to a
/// [`RunSummary`].
///
/// The three stages run as independent tokio tasks joined in
/// completion order. The source stage performs synchronous CSV reads
/// and yields only at channel sends; the execution stage blocks on
/// database I/O; the aggregation stage is memory-bound.
///
/// # Errors
///
/// See [`run`].
pub async fn run_with_config<R, E>(
    input: R,
    executor: E,
    cancel: &CancellationToken,
    config: &PipelineConfig,
) -> Result<RunSummary, BenchError>
where
    R: Read + Send + 'static,
    E: QueryExecutor + 'static,
{
    let stage_cancel = cancel.child_token();
    let (desc_tx, desc_rx) = mpsc::channel(config.channel_capacity);
    let (outcome_tx, outcome_rx) = mpsc::channel(config.channel_capacity);

    let mut stages: JoinSet<Result<StageOutput, BenchError>> = JoinSet::new();

    let source_cancel = stage_cancel.clone();
    stages.spawn(async move {
        read_descriptors(input, desc_tx, source_cancel)
            .await
            .map(|()| StageOutput::Done)
    });

    let execute_cancel = stage_cancel.clone();
    stages.spawn(async move {
        execute_descriptors(executor, desc_rx, outcome_tx, execute_cancel)
            .await
            .map(|()| StageOutput::Done)
    });

    let summarize_cancel = stage_cancel.clone();
    stages.spawn(async move {
        summarize_outcomes(outcome_rx, summarize_cancel)
            .await
            .map(StageOutput::Summary)
    });

    let mut first_error: Option<BenchError> = None;
    let mut summary: Option<RunSummary> = None;

    while let Some(joined) = stages.join_next().await {
        match joined {
            Ok(Ok(StageOutput::Done)) => {}
            Ok(Ok(StageOutput::Summary(s))) => summary = Some(s),
            Ok(Err(error)) => {
                if first_error.is_none() {
                    tracing::debug!(%error, "stage failed, cancelling remaining stages");
                    stage_cancel.cancel();
                    first_error = Some(error);
                } else {
                    tracing::debug!(%error, "discarding later stage error");
                }
            }
            Err(join_error) => {
                if join_error.is_panic() {
                    std::panic::resume_unwind(join_error.into_panic());
                }
            }
        }
    }

    if let Some(error) = first_error {
        return Err(error);
    }
    if cancel.is_cancelled() {
        return Err(BenchError::Cancelled);
    }

    // The aggregation stage always yields a summary when it finishes
    // without error; reaching this branch without one means a stage was
    // torn down without reporting, which only cancellation can cause.
    let Some(summary) = summary else {
        return Err(BenchError::Cancelled);
    };
    Ok(summary)
}
