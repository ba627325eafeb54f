//! Conversion functions between matrix formats

use crate::matrix::config::StorageFormat;
use crate::matrix::dense::DenseMatrix;
use crate::matrix::storage::{CompressedStorage, Lane};
use crate::matrix::traits::Matrix;
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};
use crate::scalar::Scalar;

impl<T: Scalar> SparseMatrixCSR<T> {
    /// Converts this CSR matrix to CSC format
    pub fn to_csc(&self) -> SparseMatrixCSC<T> {
        // Transposing the row lanes yields the column lanes
        SparseMatrixCSC::from_storage(self.storage().transpose())
    }

    pub fn to_dense(&self) -> DenseMatrix<T> {
        DenseMatrix::from_matrix(self)
    }

    /// Copies any matrix into CSR format
    pub fn from_matrix(matrix: &dyn Matrix<T>) -> Self {
        match matrix.format() {
            StorageFormat::Csc => {
                let by_column = column_lanes(matrix);
                Self::from_storage(
                    CompressedStorage::from_lanes(matrix.columns(), matrix.rows(), by_column).transpose(),
                )
            }
            _ => Self::from_storage(CompressedStorage::from_lanes(
                matrix.rows(),
                matrix.columns(),
                row_lanes(matrix),
            )),
        }
    }
}

impl<T: Scalar> SparseMatrixCSC<T> {
    /// Converts this CSC matrix to CSR format
    pub fn to_csr(&self) -> SparseMatrixCSR<T> {
        SparseMatrixCSR::from_storage(self.storage().transpose())
    }

    pub fn to_dense(&self) -> DenseMatrix<T> {
        DenseMatrix::from_matrix(self)
    }

    /// Copies any matrix into CSC format
    pub fn from_matrix(matrix: &dyn Matrix<T>) -> Self {
        match matrix.format() {
            StorageFormat::Csc => Self::from_storage(CompressedStorage::from_lanes(
                matrix.columns(),
                matrix.rows(),
                column_lanes(matrix),
            )),
            _ => SparseMatrixCSR::from_matrix(matrix).to_csc(),
        }
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Copies any matrix into dense format
    pub fn from_matrix(matrix: &dyn Matrix<T>) -> Self {
        let mut dense = Self::new(matrix.rows(), matrix.columns());
        for r in 0..matrix.rows() {
            for (c, value) in matrix.row_iter(r) {
                dense.data[[r, c]] = value;
            }
        }
        dense
    }

    pub fn to_csr(&self) -> SparseMatrixCSR<T> {
        SparseMatrixCSR::from_matrix(self)
    }

    pub fn to_csc(&self) -> SparseMatrixCSC<T> {
        SparseMatrixCSC::from_matrix(self)
    }
}

impl<T: Scalar> From<SparseMatrixCSR<T>> for SparseMatrixCSC<T> {
    fn from(csr: SparseMatrixCSR<T>) -> Self {
        SparseMatrixCSC::from_storage(csr.into_storage().transpose())
    }
}

impl<T: Scalar> From<SparseMatrixCSC<T>> for SparseMatrixCSR<T> {
    fn from(csc: SparseMatrixCSC<T>) -> Self {
        SparseMatrixCSR::from_storage(csc.into_storage().transpose())
    }
}

fn row_lanes<T: Scalar>(matrix: &dyn Matrix<T>) -> Vec<Lane<T>> {
    (0..matrix.rows()).map(|r| matrix.row_iter(r).unzip()).collect()
}

fn column_lanes<T: Scalar>(matrix: &dyn Matrix<T>) -> Vec<Lane<T>> {
    (0..matrix.columns()).map(|c| matrix.column_iter(c).unzip()).collect()
}
