//! End-to-end pipeline tests over the public `run` entry point.
//!
//! Exercises the full path with a deterministic in-memory executor:
//! CSV parsing, ordered execution, aggregation, first-error-wins
//! failure propagation, and cooperative cancellation.

use std::io::Cursor;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use tsbench_core::testing::FixedLatencyExecutor;
use tsbench_core::{run, run_with_config, BenchError, ExecutionError, FormatError, PipelineConfig};

fn csv_input(subjects: &[&str]) -> Cursor<Vec<u8>> {
    let mut text = String::from("subject,range-start,range-end\n");
    for subject in subjects {
        text.push_str(subject);
        text.push_str(",2017-01-01 08:59:22,2017-01-01 09:59:22\n");
    }
    Cursor::new(text.into_bytes())
}

fn quick_executor(queries: usize) -> FixedLatencyExecutor {
    FixedLatencyExecutor::new(vec![Duration::from_millis(1); queries])
}

#[tokio::test]
async fn test_summary_count_matches_input_records() {
    let cancel = CancellationToken::new();
    let input = csv_input(&["host-a", "host-b", "host-c", "host-d"]);

    let summary = run(input, quick_executor(4), &cancel).await.unwrap();

    assert_eq!(summary.count, 4);
    assert!(summary.min_latency <= summary.mean_latency);
    assert!(summary.mean_latency <= summary.max_latency);
    assert!(summary.total_latency >= summary.max_latency);
}

#[tokio::test]
async fn test_subjects_reach_database_in_input_order() {
    let cancel = CancellationToken::new();
    let expected = ["h1", "h2", "h3", "h4", "h5"];
    let executor = quick_executor(expected.len());
    let subjects = executor.subject_log();

    let summary = run(csv_input(&expected), executor, &cancel).await.unwrap();

    assert_eq!(summary.count, expected.len());
    assert_eq!(*subjects.lock().unwrap(), expected);
}

#[tokio::test]
async fn test_small_channel_capacity_preserves_order() {
    let cancel = CancellationToken::new();
    let expected: Vec<String> = (0..32).map(|i| format!("host-{i}")).collect();
    let names: Vec<&str> = expected.iter().map(String::as_str).collect();
    let executor = quick_executor(expected.len());
    let subjects = executor.subject_log();
    let config = PipelineConfig {
        channel_capacity: 1,
    };

    let summary = run_with_config(csv_input(&names), executor, &cancel, &config)
        .await
        .unwrap();

    assert_eq!(summary.count, 32);
    assert_eq!(*subjects.lock().unwrap(), expected);
}

#[tokio::test]
async fn test_malformed_header_executes_nothing() {
    let cancel = CancellationToken::new();
    let input = Cursor::new(b"subject,range-start\nhost-a,2017-01-01 08:59:22\n".to_vec());
    let executor = quick_executor(0);
    let subjects = executor.subject_log();

    let result = run(input, executor, &cancel).await;

    assert!(matches!(
        result,
        Err(BenchError::Format(FormatError::UnknownHeader(_)))
    ));
    assert!(subjects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_subject_reports_line_and_stops() {
    let cancel = CancellationToken::new();
    let input = Cursor::new(
        b"subject,range-start,range-end\n\
          host-a,2017-01-01 08:59:22,2017-01-01 09:59:22\n\
          ,2017-01-01 08:59:22,2017-01-01 09:59:22\n\
          host-c,2017-01-01 08:59:22,2017-01-01 09:59:22\n"
            .to_vec(),
    );
    let executor = quick_executor(4);
    let subjects = executor.subject_log();

    let result = run(input, executor, &cancel).await;

    assert!(matches!(
        result,
        Err(BenchError::Format(FormatError::EmptySubject { line: 3 }))
    ));
    // Records after the failing line are never read, so at most the
    // one record before it was executed.
    let executed = subjects.lock().unwrap().clone();
    assert!(executed.len() <= 1);
    assert!(!executed.iter().any(|s| s == "host-c"));
}

#[tokio::test]
async fn test_blank_lines_are_not_records() {
    let cancel = CancellationToken::new();
    let input = Cursor::new(
        b"subject,range-start,range-end\n\
          host-a,2017-01-01 08:59:22,2017-01-01 09:59:22\n\
          \n\
          host-b,2017-01-01 08:59:22,2017-01-01 09:59:22\n\
          \n\
          \n\
          host-c,2017-01-01 08:59:22,2017-01-01 09:59:22\n"
            .to_vec(),
    );
    let executor = quick_executor(3);
    let subjects = executor.subject_log();

    let summary = run(input, executor, &cancel).await.unwrap();

    assert_eq!(summary.count, 3);
    assert_eq!(*subjects.lock().unwrap(), ["host-a", "host-b", "host-c"]);
}

#[tokio::test]
async fn test_zero_data_records_is_empty_input() {
    let cancel = CancellationToken::new();
    let input = Cursor::new(b"subject,range-start,range-end\n".to_vec());

    let result = run(input, quick_executor(0), &cancel).await;

    assert!(matches!(result, Err(BenchError::EmptyInput)));
}

#[tokio::test]
async fn test_query_failure_wins_the_join() {
    let cancel = CancellationToken::new();
    let input = csv_input(&["h1", "h2", "h3", "h4", "h5", "h6"]);
    let executor = quick_executor(6).failing_at(2);

    let result = run(input, executor, &cancel).await;

    // The execution error is the run's error even though the source
    // and aggregation stages also wound down around it.
    assert!(matches!(
        result,
        Err(BenchError::Execution(ExecutionError::Query(_)))
    ));
    assert!(!cancel.is_cancelled(), "caller token must stay untouched");
}

#[tokio::test]
async fn test_caller_cancellation_lets_in_flight_query_finish() {
    let cancel = CancellationToken::new();
    let input = csv_input(&["h1", "h2", "h3"]);
    let executor =
        FixedLatencyExecutor::new(vec![Duration::from_millis(200); 3]).sleeping();
    let subjects = executor.subject_log();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let result = run(input, executor, &cancel).await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(BenchError::Cancelled)));
    // The first query was mid-flight when the token fired: it ran to
    // completion, and nothing further was issued.
    assert_eq!(subjects.lock().unwrap().len(), 1);
    // Unwinding is bounded by the one in-flight round trip.
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(600));
}

#[tokio::test]
async fn test_pre_cancelled_token_reports_cancelled() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let input = csv_input(&["h1", "h2"]);

    let result = run(input, quick_executor(2), &cancel).await;

    assert!(matches!(result, Err(BenchError::Cancelled)));
}

#[tokio::test]
async fn test_summary_statistics_flow_through_pipeline() {
    let cancel = CancellationToken::new();
    let input = csv_input(&["h1", "h2", "h3", "h4"]);
    let latencies = vec![
        Duration::from_millis(10),
        Duration::from_millis(20),
        Duration::from_millis(30),
        Duration::from_millis(40),
    ];
    let executor = FixedLatencyExecutor::new(latencies).sleeping();

    let summary = run(input, executor, &cancel).await.unwrap();

    // Wall-clock measurement puts lower bounds on every statistic.
    assert_eq!(summary.count, 4);
    assert!(summary.min_latency >= Duration::from_millis(10));
    assert!(summary.max_latency >= Duration::from_millis(40));
    assert!(summary.total_latency >= Duration::from_millis(100));
    assert!(summary.mean_latency >= Duration::from_millis(25));
    assert!(summary.median_latency >= Duration::from_millis(20));
}
