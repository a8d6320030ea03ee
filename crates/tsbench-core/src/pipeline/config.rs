//! Pipeline configuration.

/// Configuration for one benchmark pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Capacity of each bounded handoff channel.
    ///
    /// Backpressure is the point: a small bound keeps the source stage
    /// from reading far ahead of the serially-executing query stage,
    /// and stalled senders block on `send` rather than buffering.
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
        }
    }
}
