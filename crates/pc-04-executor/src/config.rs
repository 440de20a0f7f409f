//! Executor configuration.

use serde::Deserialize;

/// Batches smaller than this run the optimistic pass on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Minimum batch size for the rayon path.
    pub parallel_threshold: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: PARALLEL_THRESHOLD,
        }
    }
}
