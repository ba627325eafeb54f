//! Compressed Sparse Column (CSC) matrix format implementation

use std::fmt;

use crate::error::{GraphError, Result};
use crate::matrix::config::{Axis, StorageFormat};
use crate::matrix::csr::validate_raw;
use crate::matrix::storage::{CompressedStorage, Lane};
use crate::matrix::traits::{check_index, EntryIter, Matrix, MatrixOps};
use crate::scalar::Scalar;

/// A sparse matrix in Compressed Sparse Column (CSC) format
///
/// The CSC format stores a sparse matrix using three arrays:
/// - col_ptr: Array of size n_cols + 1 containing indices into row_idx and values arrays
/// - row_idx: Array of size nnz containing row indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Row indices are strictly ascending within each column. Internally the
/// columns are the lanes of a [`CompressedStorage`], with rows as the minor axis.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSC<T> {
    storage: CompressedStorage<T>,
}

impl<T: Scalar> SparseMatrixCSC<T> {
    /// Creates an empty matrix with the given dimensions
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            storage: CompressedStorage::new(n_cols, n_rows),
        }
    }

    /// Creates a CSC matrix from raw arrays
    ///
    /// Columns need not be sorted; duplicates are summed and zeros dropped.
    /// Fails if the arrays are inconsistent:
    /// - col_ptr.len() must be n_cols + 1 and non-decreasing
    /// - row_idx.len() must equal values.len()
    /// - col_ptr[n_cols] must equal row_idx.len()
    /// - every row index must be below n_rows
    pub fn from_raw(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        let triplets = validate_raw(n_cols, n_rows, &col_ptr, &row_idx, &values, "csc from_raw")
            .map_err(|err| match err {
                // Report (row, column) rather than (column, row)
                GraphError::IndexOutOfRange { row, col, rows, cols } => GraphError::IndexOutOfRange {
                    row: col,
                    col: row,
                    rows: cols,
                    cols: rows,
                },
                other => other,
            })?;
        Ok(Self {
            storage: CompressedStorage::from_triplets(n_cols, n_rows, triplets),
        })
    }

    /// Builds a matrix from `(row, col, value)` triplets; duplicates are summed
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self> {
        let mut by_column = Vec::new();
        for (row, col, value) in triplets {
            check_index(row, col, (n_rows, n_cols))?;
            by_column.push((col, row, value));
        }
        Ok(Self {
            storage: CompressedStorage::from_triplets(n_cols, n_rows, by_column),
        })
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        let col_ptr = (0..=n).collect();
        let row_idx = (0..n).collect();
        let values = vec![T::one(); n];

        Self {
            storage: CompressedStorage {
                n_major: n,
                n_minor: n,
                ptr: col_ptr,
                idx: row_idx,
                values,
            },
        }
    }

    pub fn col_ptr(&self) -> &[usize] {
        &self.storage.ptr
    }

    pub fn row_idx(&self) -> &[usize] {
        &self.storage.idx
    }

    pub fn values(&self) -> &[T] {
        &self.storage.values
    }

    /// Row indices and values of column `j`
    pub fn column(&self, j: usize) -> (&[usize], &[T]) {
        assert!(j < self.storage.n_major, "Column index out of bounds");
        self.storage.lane(j)
    }

    pub(crate) fn from_storage(storage: CompressedStorage<T>) -> Self {
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &CompressedStorage<T> {
        &self.storage
    }

    pub(crate) fn into_storage(self) -> CompressedStorage<T> {
        self.storage
    }
}

impl<T: Scalar> Matrix<T> for SparseMatrixCSC<T> {
    fn rows(&self) -> usize {
        self.storage.n_minor
    }

    fn columns(&self) -> usize {
        self.storage.n_major
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::Csc
    }

    fn nnz(&self) -> usize {
        self.storage.nnz()
    }

    fn at(&self, row: usize, col: usize) -> Result<T> {
        check_index(row, col, self.shape())?;
        Ok(self.storage.get(col, row))
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index(row, col, self.shape())?;
        self.storage.set(col, row, value);
        Ok(())
    }

    fn row_iter(&self, row: usize) -> EntryIter<'_, T> {
        assert!(row < self.rows(), "Row index out of bounds");
        Box::new(self.storage.minor_iter(row))
    }

    fn column_iter(&self, col: usize) -> EntryIter<'_, T> {
        assert!(col < self.columns(), "Column index out of bounds");
        Box::new(self.storage.lane_iter(col))
    }

    fn clear(&mut self) {
        self.storage.clear();
    }

    fn assign_lanes(&mut self, axis: Axis, lanes: Vec<Lane<T>>) {
        match axis {
            Axis::Column => self.storage.assign_lanes(lanes),
            Axis::Row => {
                let by_row = CompressedStorage::from_lanes(self.rows(), self.columns(), lanes);
                self.storage = by_row.transpose();
            }
        }
    }
}

impl<T: Scalar> MatrixOps<T> for SparseMatrixCSC<T> {
    type Transposed = SparseMatrixCSC<T>;

    fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::new(rows, cols))
    }

    fn transpose(&self) -> Self {
        Self {
            storage: self.storage.transpose(),
        }
    }

    fn map_stored<F: Fn(T) -> T>(&self, f: F) -> Self {
        Self {
            storage: self.storage.map_values(f),
        }
    }
}

impl<T: Scalar> fmt::Debug for SparseMatrixCSC<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSC {{")?;
        writeln!(f, "  dimensions: {} × {}", self.rows(), self.columns())?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_cols_to_print = 5.min(self.columns());
        for j in 0..max_cols_to_print {
            let entries: Vec<_> = self.storage.lane_iter(j).take(5).collect();
            writeln!(f, "    col {}: {:?}", j, entries)?;
        }
        if self.columns() > max_cols_to_print {
            writeln!(f, "    ... ({} more columns)", self.columns() - max_cols_to_print)?;
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //    [1 2 0]
    //    [0 3 0]
    //    [4 0 5]
    fn sample() -> SparseMatrixCSC<i32> {
        SparseMatrixCSC::from_raw(
            3, 3,
            vec![0, 2, 4, 5],
            vec![0, 2, 0, 1, 2],
            vec![1, 4, 2, 3, 5],
        )
        .unwrap()
    }

    #[test]
    fn test_from_raw() {
        let matrix = sample();
        assert_eq!(matrix.shape(), (3, 3));
        assert_eq!(matrix.nnz(), 5);
        assert_eq!(matrix.col_ptr(), &[0, 2, 4, 5]);
        assert_eq!(matrix.at(2, 0).unwrap(), 4);
        assert_eq!(matrix.at(1, 2).unwrap(), 0);
    }

    #[test]
    fn test_col_iter() {
        let matrix = sample();

        let col0: Vec<_> = matrix.column_iter(0).collect();
        assert_eq!(col0, vec![(0, 1), (2, 4)]);

        let col1: Vec<_> = matrix.column_iter(1).collect();
        assert_eq!(col1, vec![(0, 2), (1, 3)]);

        let col2: Vec<_> = matrix.column_iter(2).collect();
        assert_eq!(col2, vec![(2, 5)]);
    }

    #[test]
    fn test_row_iter_walks_columns() {
        let row0: Vec<_> = sample().row_iter(0).collect();
        assert_eq!(row0, vec![(0, 1), (1, 2)]);
        assert_eq!(sample().row_to_array(2), vec![4, 0, 5]);
    }

    #[test]
    fn test_row_out_of_bounds_reported_as_row() {
        let result = SparseMatrixCSC::from_raw(2, 1, vec![0, 1], vec![5], vec![1]);
        assert!(matches!(
            result,
            Err(GraphError::IndexOutOfRange { row: 5, col: 0, rows: 2, cols: 1 })
        ));
    }

    #[test]
    fn test_identity() {
        let identity = SparseMatrixCSC::<f32>::identity(2);
        assert_eq!(identity.row_idx(), &[0, 1]);
        assert_eq!(identity.values(), &[1.0, 1.0]);
    }

    #[test]
    fn test_set_keeps_columns_sorted() {
        let mut matrix = SparseMatrixCSC::<i64>::new(4, 2);
        matrix.set(3, 1, 1).unwrap();
        matrix.set(0, 1, 2).unwrap();
        matrix.set(2, 0, 3).unwrap();

        assert_eq!(matrix.column(1), (&[0, 3][..], &[2, 1][..]));
        assert_eq!(matrix.col_ptr(), &[0, 1, 3]);

        matrix.set(3, 1, 0).unwrap();
        assert_eq!(matrix.nnz(), 2);
    }

    #[test]
    fn test_assign_row_lanes() {
        let mut matrix = SparseMatrixCSC::<i32>::new(2, 3);
        matrix.assign_lanes(Axis::Row, vec![(vec![2], vec![1]), (vec![0, 2], vec![2, 3])]);
        assert_eq!(matrix.column(2), (&[0, 1][..], &[1, 3][..]));
        assert_eq!(matrix.column(0), (&[1][..], &[2][..]));
    }
}
