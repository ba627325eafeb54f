//! # gblas: sparse linear algebra over semirings
//!
//! Matrices in dense, CSR and CSC storage share one contract, [`Matrix`],
//! so every kernel accepts operands of any format and writes into a
//! destination of any format.
//!
//! ## Overview
//!
//! - **Storage**: [`DenseMatrix`] on `ndarray`, [`SparseMatrixCSR`] and
//!   [`SparseMatrixCSC`] on a shared compressed lane store, plus
//!   [`DenseVector`] and [`SparseVector`]
//! - **Operators**: unary operators, [`BinaryOp`], [`Monoid`] and
//!   [`Semiring`] values such as plus-times, min-plus and lor-land
//! - **Kernels**: masked element-wise add, subtract and multiply, and
//!   semiring `mxm`, `mxv` and `vxm`
//! - **Algorithms**: reduced row echelon form, symmetry predicates,
//!   breadth-first search, Bellman–Ford and predecessor sets
//!
//! Kernels run under a [`Context`] that carries a cancellation flag, an
//! optional deadline and the [`KernelConfig`] choosing sequential or
//! rayon row-parallel execution.
//!
//! ## Usage
//!
//! ```
//! use gblas::{symmetric, DenseMatrix, Matrix, MatrixOps, SparseMatrixCSR};
//!
//! let dense = DenseMatrix::from_rows(&[vec![1, 2, 3], vec![2, 4, 5], vec![3, 5, 6]])?;
//! assert!(symmetric(&dense));
//!
//! let sparse = SparseMatrixCSR::from_matrix(&dense);
//! assert!(sparse.equal(&dense));
//! assert!(sparse.transpose().transpose().equal(&dense));
//! # Ok::<(), gblas::GraphError>(())
//! ```
//!
//! Graph traversal over an adjacency matrix:
//!
//! ```
//! use gblas::{breadth_first_search, Context, SparseMatrixCSR, Vector};
//!
//! let a = SparseMatrixCSR::from_triplets(3, 3, vec![(0, 1, 1), (1, 2, 1)])?;
//! let visited = breadth_first_search(&Context::background(), &a, 0, |_| false)?;
//! assert_eq!(visited.at_vec(2)?, 1);
//! # Ok::<(), gblas::GraphError>(())
//! ```

pub mod algorithms;
pub mod context;
pub mod error;
pub mod io;
pub mod kernel;
pub mod matrix;
pub mod operator;
mod parallel;
pub mod scalar;
pub mod utils;

// Re-export primary components
pub use algorithms::{bellman_ford, breadth_first_search, predecessors, reduced, skew_symmetric, symmetric};
pub use context::Context;
pub use error::{GraphError, Result};
pub use io::{read_matrix, TsvReader};
pub use kernel::{
    element_wise, element_wise_intersection, element_wise_matrix_add, element_wise_matrix_add_assign,
    element_wise_matrix_multiply, element_wise_matrix_subtract, element_wise_vector_add,
    element_wise_vector_add_assign, element_wise_vector_multiply, element_wise_vector_subtract,
    matrix_matrix_multiply, matrix_vector_multiply, mxm, mxv, vector_matrix_multiply, vxm, Mask,
};
pub use matrix::{
    DenseMatrix, DenseVector, Execution, KernelConfig, Matrix, MatrixOps, SparseMatrixCSC,
    SparseMatrixCSR, SparseVector, StorageFormat, Vector,
};
pub use operator::{
    AdditiveInverse, BinaryOp, Identity, LogicalInverse, Monoid, MultiplicativeInverse, Semiring,
    UnaryOperator,
};
pub use scalar::Scalar;
pub use utils::{from_sprs_csc, from_sprs_csr, to_ndarray, to_sprs_csc, to_sprs_csr};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
