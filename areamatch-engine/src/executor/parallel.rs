//! Parallel execution strategy

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;
use crate::executor::{ExecutionMode, Executor};

/// Multi-threaded executor backed by a dedicated rayon pool
#[derive(Debug)]
pub struct ParallelExecutor {
    pool: ThreadPool,
}

impl ParallelExecutor {
    /// Create an executor with `threads` workers (`None` = one per core).
    ///
    /// Requests above the number of available cores are capped.
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let available = num_cpus::get().max(1);
        let threads = match threads {
            Some(requested) if requested > available => {
                log::warn!(
                    "Requested {requested} threads but only {available} cores are available; using {available}"
                );
                available
            }
            Some(requested) => requested.max(1),
            None => available,
        };

        let pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(Self { pool })
    }

    /// Number of worker threads
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Executor for ParallelExecutor {
    fn execute<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        // Indexed collect keeps input order
        self.pool.install(|| items.par_iter().map(f).collect())
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Parallel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_order() {
        let executor = ParallelExecutor::new(Some(2)).unwrap();
        let items: Vec<u32> = (0..1000).collect();
        let out = executor.execute(&items, |n| n * 2);
        assert_eq!(out, items.iter().map(|n| n * 2).collect::<Vec<_>>());
        assert_eq!(executor.mode(), ExecutionMode::Parallel);
    }

    #[test]
    fn test_thread_request_is_capped() {
        let executor = ParallelExecutor::new(Some(usize::MAX)).unwrap();
        assert_eq!(executor.threads(), num_cpus::get().max(1));

        let executor = ParallelExecutor::new(Some(1)).unwrap();
        assert_eq!(executor.threads(), 1);
    }
}
