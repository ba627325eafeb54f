//! Dense and sparse vectors
//!
//! A vector of length n behaves as an n × 1 matrix. The sparse variant is a
//! single lane of [`CompressedStorage`], so it shares insertion, removal and
//! lookup with CSR and CSC.

use std::fmt;

use ndarray::{Array1, Array2};

use crate::error::{GraphError, Result};
use crate::matrix::config::{Axis, StorageFormat};
use crate::matrix::csr::SparseMatrixCSR;
use crate::matrix::dense::DenseMatrix;
use crate::matrix::storage::{CompressedStorage, Lane};
use crate::matrix::traits::{check_index, EntryIter, Matrix, MatrixOps, Vector};
use crate::scalar::Scalar;

/// A dense vector backed by `ndarray::Array1`
#[derive(Clone, PartialEq)]
pub struct DenseVector<T> {
    data: Array1<T>,
}

impl<T: Scalar> DenseVector<T> {
    /// Creates a zero vector of length `n`
    pub fn new(n: usize) -> Self {
        Self {
            data: Array1::zeros(n),
        }
    }

    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            data: Array1::from(values),
        }
    }

    pub fn as_array(&self) -> &Array1<T> {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}

impl<T: Scalar> Matrix<T> for DenseVector<T> {
    fn rows(&self) -> usize {
        self.data.len()
    }

    fn columns(&self) -> usize {
        1
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::Dense
    }

    fn nnz(&self) -> usize {
        self.data.iter().filter(|v| !v.is_zero()).count()
    }

    fn at(&self, row: usize, col: usize) -> Result<T> {
        check_index(row, col, self.shape())?;
        Ok(self.data[row])
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index(row, col, self.shape())?;
        self.data[row] = value;
        Ok(())
    }

    fn row_iter(&self, row: usize) -> EntryIter<'_, T> {
        assert!(row < self.rows(), "Row index out of bounds");
        let value = self.data[row];
        Box::new(std::iter::once((0, value)).filter(|(_, v)| !v.is_zero()))
    }

    fn column_iter(&self, col: usize) -> EntryIter<'_, T> {
        assert!(col < 1, "Column index out of bounds");
        Box::new(
            self.data
                .iter()
                .copied()
                .enumerate()
                .filter(|(_, v)| !v.is_zero()),
        )
    }

    fn clear(&mut self) {
        self.data.fill(T::zero());
    }

    fn assign_lanes(&mut self, axis: Axis, lanes: Vec<Lane<T>>) {
        self.clear();
        match axis {
            Axis::Column => {
                if let Some((idx, values)) = lanes.into_iter().next() {
                    for (i, value) in idx.into_iter().zip(values) {
                        self.data[i] = value;
                    }
                }
            }
            Axis::Row => {
                for (i, (_, values)) in lanes.into_iter().enumerate() {
                    if let Some(&value) = values.first() {
                        self.data[i] = value;
                    }
                }
            }
        }
    }
}

impl<T: Scalar> Vector<T> for DenseVector<T> {
    fn length(&self) -> usize {
        self.data.len()
    }

    fn at_vec(&self, i: usize) -> Result<T> {
        self.at(i, 0)
    }

    fn set_vec(&mut self, i: usize, value: T) -> Result<()> {
        self.set(i, 0, value)
    }
}

impl<T: Scalar> MatrixOps<T> for DenseVector<T> {
    type Transposed = DenseMatrix<T>;

    fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if cols != 1 {
            return Err(GraphError::mismatch("dense vector", (rows, 1), (rows, cols)));
        }
        Ok(Self::new(rows))
    }

    /// The `1 × n` row matrix
    fn transpose(&self) -> DenseMatrix<T> {
        let n = self.data.len();
        let row = Array2::from_shape_fn((1, n), |(_, j)| self.data[j]);
        DenseMatrix::from_array(row)
    }

    fn map_stored<F: Fn(T) -> T>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }
}

impl<T: Scalar> fmt::Debug for DenseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DenseVector({:?})", self.data.to_vec())
    }
}

/// A sparse vector holding ascending indices and non-zero values
#[derive(Clone, PartialEq)]
pub struct SparseVector<T> {
    storage: CompressedStorage<T>,
}

impl<T: Scalar> SparseVector<T> {
    /// Creates an empty vector of length `n`
    pub fn new(n: usize) -> Self {
        Self {
            storage: CompressedStorage::new(1, n),
        }
    }

    /// Builds a vector from `(index, value)` pairs; duplicates are summed
    pub fn from_entries(n: usize, entries: impl IntoIterator<Item = (usize, T)>) -> Result<Self> {
        let mut triplets = Vec::new();
        for (i, value) in entries {
            check_index(i, 0, (n, 1))?;
            triplets.push((0, i, value));
        }
        Ok(Self {
            storage: CompressedStorage::from_triplets(1, n, triplets),
        })
    }

    /// Stored indices, ascending
    pub fn indices(&self) -> &[usize] {
        &self.storage.idx
    }

    pub fn values(&self) -> &[T] {
        &self.storage.values
    }

    pub fn to_dense(&self) -> DenseVector<T> {
        DenseVector::from_vec(self.storage.lane_to_dense(0))
    }
}

impl<T: Scalar> Matrix<T> for SparseVector<T> {
    fn rows(&self) -> usize {
        self.storage.n_minor
    }

    fn columns(&self) -> usize {
        1
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::Csc
    }

    fn nnz(&self) -> usize {
        self.storage.nnz()
    }

    fn at(&self, row: usize, col: usize) -> Result<T> {
        check_index(row, col, self.shape())?;
        Ok(self.storage.get(0, row))
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index(row, col, self.shape())?;
        self.storage.set(0, row, value);
        Ok(())
    }

    fn row_iter(&self, row: usize) -> EntryIter<'_, T> {
        assert!(row < self.rows(), "Row index out of bounds");
        let value = self.storage.get(0, row);
        Box::new(std::iter::once((0, value)).filter(|(_, v)| !v.is_zero()))
    }

    fn column_iter(&self, col: usize) -> EntryIter<'_, T> {
        assert!(col < 1, "Column index out of bounds");
        Box::new(self.storage.lane_iter(0))
    }

    fn clear(&mut self) {
        self.storage.clear();
    }

    fn assign_lanes(&mut self, axis: Axis, lanes: Vec<Lane<T>>) {
        match axis {
            Axis::Column => {
                let lane = lanes.into_iter().next().unwrap_or_default();
                self.storage.assign_lanes(vec![lane]);
            }
            Axis::Row => {
                let (idx, values): (Vec<usize>, Vec<T>) = lanes
                    .into_iter()
                    .enumerate()
                    .filter_map(|(i, (_, values))| values.first().map(|&v| (i, v)))
                    .unzip();
                self.storage.assign_lanes(vec![(idx, values)]);
            }
        }
    }
}

impl<T: Scalar> Vector<T> for SparseVector<T> {
    fn length(&self) -> usize {
        self.storage.n_minor
    }

    fn iter(&self) -> EntryIter<'_, T> {
        Box::new(self.storage.lane_iter(0))
    }
}

impl<T: Scalar> MatrixOps<T> for SparseVector<T> {
    type Transposed = SparseMatrixCSR<T>;

    fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if cols != 1 {
            return Err(GraphError::mismatch("sparse vector", (rows, 1), (rows, cols)));
        }
        Ok(Self::new(rows))
    }

    /// The `1 × n` CSR row matrix; the single lane becomes row 0 unchanged
    fn transpose(&self) -> SparseMatrixCSR<T> {
        SparseMatrixCSR::from_storage(self.storage.clone())
    }

    fn map_stored<F: Fn(T) -> T>(&self, f: F) -> Self {
        Self {
            storage: self.storage.map_values(f),
        }
    }
}

impl<T: Scalar> fmt::Debug for SparseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<_> = self.storage.lane_iter(0).collect();
        write!(f, "SparseVector(len {}, {:?})", self.length(), entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_vector_basics() {
        let mut v = DenseVector::<i32>::new(4);
        assert_eq!(v.length(), 4);
        assert_eq!(v.shape(), (4, 1));
        v.set_vec(2, 5).unwrap();
        assert_eq!(v.at_vec(2).unwrap(), 5);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(2, 5)]);
        assert!(v.set_vec(4, 1).is_err());
    }

    #[test]
    fn test_sparse_vector_basics() {
        let mut v = SparseVector::<f64>::new(5);
        v.set_vec(3, 1.5).unwrap();
        v.set_vec(1, 2.5).unwrap();
        assert_eq!(v.indices(), &[1, 3]);
        assert_eq!(v.nnz(), 2);

        v.set_vec(3, 0.0).unwrap();
        assert_eq!(v.indices(), &[1]);
        assert_eq!(v.at_vec(3).unwrap(), 0.0);
        assert!(matches!(v.at_vec(5), Err(GraphError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_vectors_compare_across_formats() {
        let dense = DenseVector::from_vec(vec![0, 4, 0, 6]);
        let sparse = SparseVector::from_entries(4, vec![(3, 6), (1, 4)]).unwrap();
        assert!(dense.equal(&sparse));
        assert!(sparse.to_dense() == dense);
    }

    #[test]
    fn test_transpose_is_row_matrix() {
        let sparse = SparseVector::from_entries(3, vec![(2, 7)]).unwrap();
        let row = sparse.transpose();
        assert_eq!(row.shape(), (1, 3));
        assert_eq!(row.at(0, 2).unwrap(), 7);

        let dense = DenseVector::from_vec(vec![1, 0, 3]).transpose();
        assert_eq!(dense.row_to_array(0), vec![1, 0, 3]);
    }

    #[test]
    fn test_zeros_rejects_wide_shapes() {
        assert!(SparseVector::<i32>::zeros(3, 2).is_err());
        assert!(DenseVector::<i32>::zeros(3, 1).is_ok());
    }

    #[test]
    fn test_assign_row_lanes() {
        let mut v = SparseVector::<i32>::new(3);
        v.assign_lanes(Axis::Row, vec![(vec![0], vec![4]), (vec![], vec![]), (vec![0], vec![9])]);
        assert_eq!(v.indices(), &[0, 2]);
        assert_eq!(v.values(), &[4, 9]);
    }
}
