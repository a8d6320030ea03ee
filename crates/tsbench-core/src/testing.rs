//! Test support: deterministic executors for exercising the pipeline
//! without a database.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::ExecutionError;
use crate::executor::QueryExecutor;
use crate::types::QueryDescriptor;

/// A [`QueryExecutor`] that replays scripted latencies.
///
/// Each `min_max` call logs the descriptor's subject (for order
/// assertions) and takes the next scripted latency, optionally
/// sleeping for it so wall-clock measurement is observable. Calls past
/// the end of the script reuse a 1ms default.
#[derive(Debug)]
pub struct FixedLatencyExecutor {
    latencies: Vec<Duration>,
    calls: usize,
    sleep: bool,
    fail_at: Option<usize>,
    prepared: bool,
    subjects: Arc<Mutex<Vec<String>>>,
}

impl FixedLatencyExecutor {
    /// Creates an executor with the given latency script.
    #[must_use]
    pub fn new(latencies: Vec<Duration>) -> Self {
        Self {
            latencies,
            calls: 0,
            sleep: false,
            fail_at: None,
            prepared: false,
            subjects: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Makes each query actually sleep for its scripted latency.
    #[must_use]
    pub fn sleeping(mut self) -> Self {
        self.sleep = true;
        self
    }

    /// Injects an [`ExecutionError::Query`] on the zero-based `call`th
    /// query.
    #[must_use]
    pub fn failing_at(mut self, call: usize) -> Self {
        self.fail_at = Some(call);
        self
    }

    /// Shared log of the subjects queried, in execution order.
    #[must_use]
    pub fn subject_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.subjects)
    }
}

#[async_trait]
impl QueryExecutor for FixedLatencyExecutor {
    async fn prepare(&mut self) -> Result<(), ExecutionError> {
        assert!(!self.prepared, "prepare called twice");
        self.prepared = true;
        Ok(())
    }

    async fn min_max(
        &mut self,
        descriptor: &QueryDescriptor,
    ) -> Result<(f64, f64), ExecutionError> {
        assert!(self.prepared, "min_max called before prepare");

        if self.fail_at == Some(self.calls) {
            return Err(ExecutionError::Query("injected failure".to_string()));
        }

        let latency = self
            .latencies
            .get(self.calls)
            .copied()
            .unwrap_or(Duration::from_millis(1));
        self.calls += 1;
        self.subjects
            .lock()
            .unwrap()
            .push(descriptor.subject.clone());

        if self.sleep {
            tokio::time::sleep(latency).await;
        }
        Ok((1.0, 99.0))
    }
}

/// Builds a descriptor with a fixed one-hour range, for tests that
/// only care about the subject.
#[must_use]
pub fn descriptor(subject: &str) -> QueryDescriptor {
    QueryDescriptor {
        subject: subject.to_string(),
        range_start: Utc.with_ymd_and_hms(2017, 1, 1, 8, 59, 22).unwrap(),
        range_end: Utc.with_ymd_and_hms(2017, 1, 1, 9, 59, 22).unwrap(),
    }
}
