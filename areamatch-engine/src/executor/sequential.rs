//! Sequential execution strategy

use crate::executor::{ExecutionMode, Executor};

/// Sequential single-threaded executor
#[derive(Debug, Clone, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn execute<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        items.iter().map(f).collect()
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_order() {
        let out = SequentialExecutor.execute(&[3, 1, 2], |n| n * 10);
        assert_eq!(out, vec![30, 10, 20]);
        assert_eq!(SequentialExecutor.mode(), ExecutionMode::Sequential);
    }
}
