//! Execution strategies for match batches

#[cfg(feature = "parallel")]
pub mod parallel;
pub mod sequential;

// Re-export executors
#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;
pub use sequential::SequentialExecutor;

use serde::{Deserialize, Serialize};

/// Execution mode selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Single-threaded sequential processing
    Sequential,
    /// Multi-threaded processing on a rayon pool
    Parallel,
    /// Pick per batch from its size
    #[default]
    Adaptive,
}

/// Trait for execution strategies
///
/// Implementations must return results in the order of `items`.
pub trait Executor: Send + Sync {
    /// Apply `f` to every item
    fn execute<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;
}

/// Automatically select execution mode based on batch size
pub fn auto_select(batch_len: usize, threshold: usize) -> ExecutionMode {
    if batch_len < 2 || batch_len < threshold {
        ExecutionMode::Sequential
    } else {
        #[cfg(feature = "parallel")]
        return ExecutionMode::Parallel;

        #[cfg(not(feature = "parallel"))]
        ExecutionMode::Sequential
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_batches_run_sequentially() {
        assert_eq!(auto_select(0, 0), ExecutionMode::Sequential);
        assert_eq!(auto_select(1, 0), ExecutionMode::Sequential);
        assert_eq!(auto_select(255, 256), ExecutionMode::Sequential);
    }

    #[test]
    #[cfg(feature = "parallel")]
    fn test_large_batches_run_in_parallel() {
        assert_eq!(auto_select(256, 256), ExecutionMode::Parallel);
        assert_eq!(auto_select(10_000, 256), ExecutionMode::Parallel);
    }

    #[test]
    fn test_mode_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: ExecutionMode,
        }
        let w: Wrapper = toml::from_str("mode = \"parallel\"").unwrap();
        assert_eq!(w.mode, ExecutionMode::Parallel);
        assert_eq!(ExecutionMode::default(), ExecutionMode::Adaptive);
    }
}
