//! Configuration for kernel execution

/// Physical layout of a matrix or vector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    /// Row-major contiguous array
    Dense,
    /// Compressed sparse row
    Csr,
    /// Compressed sparse column
    Csc,
}

impl StorageFormat {
    /// Whether absent entries are implicit (no storage for zeros)
    pub fn is_sparse(&self) -> bool {
        !matches!(self, StorageFormat::Dense)
    }
}

/// Axis along which a kernel produces its output lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

/// How kernels schedule independent output rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    /// Every row on the calling thread
    Sequential,
    /// Rows partitioned over a rayon pool
    Parallel,
}

/// Configuration shared by every kernel invoked through a [`Context`](crate::Context)
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// Row scheduling strategy
    pub execution: Execution,

    /// Number of worker threads for [`Execution::Parallel`]
    pub n_threads: usize,

    /// Below this many output rows parallel execution falls back to sequential
    pub min_parallel_rows: usize,

    /// Output widths up to this use the dense row accumulator in multiply,
    /// wider outputs use the sort-based accumulator
    pub dense_accum_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            execution: Execution::Sequential,
            n_threads: num_cpus::get(), // Use all available cores
            min_parallel_rows: 64,
            dense_accum_threshold: 256,
        }
    }
}

impl KernelConfig {
    /// Default configuration with row-parallel execution enabled
    pub fn parallel() -> Self {
        Self {
            execution: Execution::Parallel,
            ..Self::default()
        }
    }

    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads.max(1);
        self
    }

    pub fn with_min_parallel_rows(mut self, rows: usize) -> Self {
        self.min_parallel_rows = rows;
        self
    }

    pub fn with_dense_accum_threshold(mut self, threshold: usize) -> Self {
        self.dense_accum_threshold = threshold;
        self
    }

    /// Whether a kernel producing `n_lanes` output lanes should run in parallel
    pub fn runs_parallel(&self, n_lanes: usize) -> bool {
        self.execution == Execution::Parallel && self.n_threads > 1 && n_lanes >= self.min_parallel_rows
    }
}
