//! Error types for matrix storage, kernels and the row reader.
//!
//! Every fallible public operation returns [`Result`]; nothing in the
//! algebraic layer panics on well-formed but incompatible input.

/// Primary error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A coordinate lies outside the matrix dimensions.
    #[error("index ({row}, {col}) out of range for {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Two operands (or an operand and a destination) have incompatible shapes.
    #[error("dimension mismatch in {operation}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        /// Name of the operation that rejected its inputs.
        operation: &'static str,
        /// Shape required by the operation, as (rows, columns).
        expected: (usize, usize),
        /// Shape actually supplied.
        found: (usize, usize),
    },

    /// The operation requires a square matrix.
    #[error("{rows}x{cols} matrix is not square")]
    NotSquare { rows: usize, cols: usize },

    /// The row reader met a malformed record or a non-numeric field.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The ambient context was cancelled or its deadline passed.
    #[error("operation cancelled")]
    Cancelled,

    /// Bellman-Ford found a cycle whose total weight is negative.
    #[error("graph contains a negative-weight cycle reachable from vertex {source_vertex}")]
    NegativeCycle { source_vertex: usize },

    /// Underlying reader failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker pool for parallel execution could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub(crate) fn mismatch(
        operation: &'static str,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        GraphError::DimensionMismatch {
            operation,
            expected,
            found,
        }
    }
}

impl From<csv::Error> for GraphError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, |p| p.line() as usize);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => GraphError::Io(io),
            _ => GraphError::Parse { line, message },
        }
    }
}

/// Fails with [`GraphError::DimensionMismatch`] unless `found == expected`.
pub(crate) fn check_shape(
    operation: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(GraphError::mismatch(operation, expected, found))
    }
}
