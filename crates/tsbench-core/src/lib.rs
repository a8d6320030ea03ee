//! # tsbench-core
//!
//! The concurrent execution pipeline behind the `tsbench` query-latency
//! benchmark: three cooperating stages connected by bounded, cancellable
//! handoff channels.
//!
//! ```text
//! CSV input ─▶ source ─▶ [descriptors] ─▶ execute ─▶ [outcomes] ─▶ summarize ─▶ RunSummary
//!                │                           │                        │
//!                └─────────── shared CancellationToken ───────────────┘
//! ```
//!
//! The coordinator in [`pipeline`] joins the stages with first-error-wins
//! semantics: the first stage error cancels the other two at their next
//! channel operation and becomes the run's error. All state is scoped to
//! a single [`run`] call.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod channel;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod testing;
pub mod types;

pub use error::{BenchError, BenchResult, ExecutionError, FormatError};
pub use executor::QueryExecutor;
pub use pipeline::{run, run_with_config, PipelineConfig};
pub use types::{QueryDescriptor, QueryOutcome, RunSummary};
