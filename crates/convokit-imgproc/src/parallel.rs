use rayon::prelude::*;
use thiserror::Error;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0, got {0}")]
    InvalidRowStride(usize),
}

/// Controls how the rows of an output image are computed.
///
/// Every strategy produces byte-identical results since each output row only
/// reads from the (immutable) source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    #[default]
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    ParallelRows,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

/// Apply `op` to every row of `dst` with the given strategy.
///
/// # Arguments
///
/// * `dst` - The destination buffer, a whole number of rows.
/// * `row_stride` - The number of elements per row (width * channels).
/// * `strategy` - The execution strategy.
/// * `op` - Called with the row index and the mutable row slice.
pub fn for_each_row<T, F>(
    dst: &mut [T],
    row_stride: usize,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride));
    }

    match strategy {
        ExecutionStrategy::Serial => {
            dst.chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, dst_row)| op(row, dst_row));
        }
        ExecutionStrategy::ParallelRows => {
            dst.par_chunks_exact_mut(row_stride)
                .enumerate()
                .for_each(|(row, dst_row)| op(row, dst_row));
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n));
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_chunks_exact_mut(row_stride)
                    .enumerate()
                    .for_each(|(row, dst_row)| op(row, dst_row));
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_rows(strategy: ExecutionStrategy) -> Result<Vec<usize>, ParallelError> {
        let mut dst = vec![0usize; 12];
        for_each_row(&mut dst, 3, strategy, |row, dst_row| {
            dst_row.iter_mut().enumerate().for_each(|(col, d)| {
                *d = row * 10 + col;
            });
        })?;
        Ok(dst)
    }

    #[test]
    fn test_strategies_agree() -> Result<(), ParallelError> {
        let expected = vec![0, 1, 2, 10, 11, 12, 20, 21, 22, 30, 31, 32];
        assert_eq!(fill_rows(ExecutionStrategy::Serial)?, expected);
        assert_eq!(fill_rows(ExecutionStrategy::ParallelRows)?, expected);
        assert_eq!(fill_rows(ExecutionStrategy::Fixed(2))?, expected);
        Ok(())
    }

    #[test]
    fn test_default_is_serial() {
        assert_eq!(ExecutionStrategy::default(), ExecutionStrategy::Serial);
    }

    #[test]
    fn test_invalid_row_stride() {
        let mut dst = vec![0u8; 4];
        let res = for_each_row(&mut dst, 0, ExecutionStrategy::Serial, |_, _| {});
        assert_eq!(res, Err(ParallelError::InvalidRowStride(0)));
    }

    #[test]
    fn test_fixed_zero_threads() {
        let mut dst = vec![0u8; 4];
        let res = for_each_row(&mut dst, 2, ExecutionStrategy::Fixed(0), |_, _| {});
        assert_eq!(res, Err(ParallelError::InvalidThreadCount(0)));
    }
}
