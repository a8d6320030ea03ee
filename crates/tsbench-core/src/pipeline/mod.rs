//! The three-stage benchmark pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  descriptors  ┌──────────┐   outcomes   ┌────────────┐
//! │  source   │──────────────▶│ execute  │─────────────▶│ summarize  │
//! │ (task)    │  bounded mpsc │ (task)   │ bounded mpsc │ (task)     │
//! └──────────┘               └──────────┘              └────────────┘
//!       ▲                          ▲                         ▲
//!       └──────────── shared CancellationToken ──────────────┘
//! ```
//!
//! Data flows strictly left to right; control flows the other way on
//! failure. The coordinator spawns the three tasks, joins them in
//! completion order, cancels the shared token on the first error, and
//! retains only that first error for the final result.

pub mod config;
pub mod coordinator;

mod execute;
mod source;
mod summarize;

pub use config::PipelineConfig;
pub use coordinator::{run, run_with_config};
