//! Conversions between our matrix formats and external libraries

use ndarray::Array2;
use sprs::CsMat;

use crate::error::Result;
use crate::matrix::traits::Matrix;
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};
use crate::scalar::Scalar;

/// Converts our CSR matrix to an sprs `CsMat` in CSR layout
pub fn to_sprs_csr<T: Scalar>(matrix: &SparseMatrixCSR<T>) -> CsMat<T> {
    CsMat::new(
        matrix.shape(),
        matrix.row_ptr().to_vec(),
        matrix.col_idx().to_vec(),
        matrix.values().to_vec(),
    )
}

/// Converts our CSC matrix to an sprs `CsMat` in CSC layout
pub fn to_sprs_csc<T: Scalar>(matrix: &SparseMatrixCSC<T>) -> CsMat<T> {
    CsMat::new_csc(
        matrix.shape(),
        matrix.col_ptr().to_vec(),
        matrix.row_idx().to_vec(),
        matrix.values().to_vec(),
    )
}

/// Converts an sprs matrix of either layout to our CSR format
///
/// Explicit zeros stored by sprs are dropped.
pub fn from_sprs_csr<T: Scalar + Default>(matrix: CsMat<T>) -> Result<SparseMatrixCSR<T>> {
    // Ensure matrix is in CSR format
    let matrix = if matrix.is_csr() { matrix } else { matrix.to_csr() };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();
    SparseMatrixCSR::from_raw(n_rows, n_cols, indptr, indices, data)
}

/// Converts an sprs matrix of either layout to our CSC format
pub fn from_sprs_csc<T: Scalar + Default>(matrix: CsMat<T>) -> Result<SparseMatrixCSC<T>> {
    // Ensure matrix is in CSC format
    let matrix = if matrix.is_csc() { matrix } else { matrix.to_csc() };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();
    SparseMatrixCSC::from_raw(n_rows, n_cols, indptr, indices, data)
}

/// Copies any matrix into a dense `ndarray` array
pub fn to_ndarray<T: Scalar>(matrix: &dyn Matrix<T>) -> Array2<T> {
    let mut dense = Array2::zeros(matrix.shape());
    for r in 0..matrix.rows() {
        for (c, value) in matrix.row_iter(r) {
            dense[[r, c]] = value;
        }
    }
    dense
}
