//! Dense row-major matrix

use std::fmt;

use ndarray::Array2;

use crate::error::{GraphError, Result};
use crate::matrix::config::{Axis, StorageFormat};
use crate::matrix::storage::Lane;
use crate::matrix::traits::{check_index, EntryIter, Matrix, MatrixOps};
use crate::scalar::Scalar;

/// A dense matrix stored as a row-major `ndarray::Array2`.
///
/// Every coordinate has storage, so `set` with zero stores a zero.
#[derive(Clone, PartialEq)]
pub struct DenseMatrix<T> {
    pub(crate) data: Array2<T>,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Creates a zero matrix with the given dimensions
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: Array2::zeros((n_rows, n_cols)),
        }
    }

    /// Builds a matrix from a slice of equally long rows
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());

        let mut data = Array2::zeros((n_rows, n_cols));
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(GraphError::mismatch("dense from_rows", (1, n_cols), (1, row.len())));
            }
            for (j, &value) in row.iter().enumerate() {
                data[[i, j]] = value;
            }
        }

        Ok(Self { data })
    }

    /// Wraps an existing array, copying it into row-major order if needed
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data: data.as_standard_layout().into_owned(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            data: Array2::eye(n),
        }
    }

    pub fn as_array(&self) -> &Array2<T> {
        &self.data
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }
}

impl<T: Scalar> Matrix<T> for DenseMatrix<T> {
    fn rows(&self) -> usize {
        self.data.nrows()
    }

    fn columns(&self) -> usize {
        self.data.ncols()
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::Dense
    }

    fn nnz(&self) -> usize {
        self.data.iter().filter(|v| !v.is_zero()).count()
    }

    fn at(&self, row: usize, col: usize) -> Result<T> {
        check_index(row, col, self.shape())?;
        Ok(self.data[[row, col]])
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index(row, col, self.shape())?;
        self.data[[row, col]] = value;
        Ok(())
    }

    fn row_iter(&self, row: usize) -> EntryIter<'_, T> {
        assert!(row < self.rows(), "Row index out of bounds");
        Box::new(
            self.data
                .row(row)
                .into_iter()
                .copied()
                .enumerate()
                .filter(|(_, v)| !v.is_zero()),
        )
    }

    fn column_iter(&self, col: usize) -> EntryIter<'_, T> {
        assert!(col < self.columns(), "Column index out of bounds");
        Box::new(
            self.data
                .column(col)
                .into_iter()
                .copied()
                .enumerate()
                .filter(|(_, v)| !v.is_zero()),
        )
    }

    fn row_to_array(&self, row: usize) -> Vec<T> {
        self.data.row(row).to_vec()
    }

    fn clear(&mut self) {
        self.data.fill(T::zero());
    }

    fn assign_lanes(&mut self, axis: Axis, lanes: Vec<Lane<T>>) {
        self.clear();
        for (major, (idx, values)) in lanes.into_iter().enumerate() {
            for (minor, value) in idx.into_iter().zip(values) {
                match axis {
                    Axis::Row => self.data[[major, minor]] = value,
                    Axis::Column => self.data[[minor, major]] = value,
                }
            }
        }
    }
}

impl<T: Scalar> MatrixOps<T> for DenseMatrix<T> {
    type Transposed = DenseMatrix<T>;

    fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::new(rows, cols))
    }

    fn transpose(&self) -> Self {
        Self {
            data: self.data.t().as_standard_layout().into_owned(),
        }
    }

    fn map_stored<F: Fn(T) -> T>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }
}

impl<T: Scalar> fmt::Debug for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DenseMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.rows(), self.columns())?;
        for row in self.data.rows() {
            writeln!(f, "    {:?}", row.to_vec())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DenseMatrix<i32> {
        DenseMatrix::from_rows(&[vec![1, 2, 0], vec![0, 3, 0], vec![4, 0, 5]]).unwrap()
    }

    #[test]
    fn test_new_is_zero() {
        let m = DenseMatrix::<f64>::new(2, 3);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.at(1, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_set_and_at() {
        let mut m = DenseMatrix::<i32>::new(2, 2);
        m.set(1, 0, 7).unwrap();
        assert_eq!(m.at(1, 0).unwrap(), 7);
        m.set(1, 0, 0).unwrap();
        assert_eq!(m.at(1, 0).unwrap(), 0);
        assert!(matches!(m.at(2, 0), Err(GraphError::IndexOutOfRange { .. })));
        assert!(m.set(0, 2, 1).is_err());
    }

    #[test]
    fn test_row_and_column_iter_skip_zeros() {
        let m = sample();
        let row0: Vec<_> = m.row_iter(0).collect();
        assert_eq!(row0, vec![(0, 1), (1, 2)]);
        let col0: Vec<_> = m.column_iter(0).collect();
        assert_eq!(col0, vec![(0, 1), (2, 4)]);
        assert_eq!(m.row_to_array(1), vec![0, 3, 0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        assert!(DenseMatrix::from_rows(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!(t.row_to_array(0), vec![1, 0, 4]);
        assert!(t.as_array().is_standard_layout());
    }

    #[test]
    fn test_update_and_clear() {
        let mut m = sample();
        m.update(2, 2, |v| v * 10).unwrap();
        assert_eq!(m.at(2, 2).unwrap(), 50);
        m.clear();
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn test_assign_lanes_replaces_contents() {
        let mut m = sample();
        m.assign_lanes(Axis::Column, vec![(vec![2], vec![9]), (vec![], vec![]), (vec![0, 1], vec![6, 8])]);
        assert_eq!(m.row_to_array(0), vec![0, 0, 6]);
        assert_eq!(m.row_to_array(1), vec![0, 0, 8]);
        assert_eq!(m.row_to_array(2), vec![9, 0, 0]);
    }
}
