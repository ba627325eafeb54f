// Matrix data structures and operations

pub mod config;
pub mod conversion;
pub mod csc;
pub mod csr;
pub mod dense;
pub mod storage;
pub mod traits;
pub mod vector;

pub use config::{Axis, Execution, KernelConfig, StorageFormat};
pub use csc::SparseMatrixCSC;
pub use csr::SparseMatrixCSR;
pub use dense::DenseMatrix;
pub use storage::{CompressedStorage, Lane};
pub use traits::{EntryIter, Matrix, MatrixOps, Vector};
pub use vector::{DenseVector, SparseVector};
