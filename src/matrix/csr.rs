//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;

use crate::error::{GraphError, Result};
use crate::matrix::config::{Axis, StorageFormat};
use crate::matrix::storage::{CompressedStorage, Lane};
use crate::matrix::traits::{check_index, EntryIter, Matrix, MatrixOps};
use crate::scalar::Scalar;

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Column indices are strictly ascending within each row and no stored value
/// is zero. Row traversal is a slice walk; column traversal binary-searches
/// every row.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    storage: CompressedStorage<T>,
}

impl<T: Scalar> SparseMatrixCSR<T> {
    /// Creates an empty matrix with the given dimensions
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            storage: CompressedStorage::new(n_rows, n_cols),
        }
    }

    /// Creates a CSR matrix from raw arrays
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of rows
    /// * `n_cols` - Number of columns
    /// * `row_ptr` - Row pointers
    /// * `col_idx` - Column indices
    /// * `values` - Non-zero values
    ///
    /// Rows need not be sorted: entries are ordered by column, duplicates are
    /// summed and zeros dropped. Fails if the arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1 and non-decreasing
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    /// - every column index must be below n_cols
    pub fn from_raw(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        let triplets = validate_raw(n_rows, n_cols, &row_ptr, &col_idx, &values, "csr from_raw")?;
        Ok(Self {
            storage: CompressedStorage::from_triplets(n_rows, n_cols, triplets),
        })
    }

    /// Builds a matrix from `(row, col, value)` triplets; duplicates are summed
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
    ) -> Result<Self> {
        let triplets: Vec<_> = triplets.into_iter().collect();
        for &(row, col, _) in &triplets {
            check_index(row, col, (n_rows, n_cols))?;
        }
        Ok(Self {
            storage: CompressedStorage::from_triplets(n_rows, n_cols, triplets),
        })
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        let row_ptr = (0..=n).collect();
        let col_idx = (0..n).collect();
        let values = vec![T::one(); n];

        Self {
            storage: CompressedStorage {
                n_major: n,
                n_minor: n,
                ptr: row_ptr,
                idx: col_idx,
                values,
            },
        }
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.storage.ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.storage.idx
    }

    pub fn values(&self) -> &[T] {
        &self.storage.values
    }

    /// Column indices and values of row `i`
    pub fn row(&self, i: usize) -> (&[usize], &[T]) {
        assert!(i < self.storage.n_major, "Row index out of bounds");
        self.storage.lane(i)
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

/// Checks raw compressed arrays and flattens them into `(major, minor, value)` triplets
pub(crate) fn validate_raw<T: Scalar>(
    n_major: usize,
    n_minor: usize,
    ptr: &[usize],
    idx: &[usize],
    values: &[T],
    operation: &'static str,
) -> Result<Vec<(usize, usize, T)>> {
    if ptr.len() != n_major + 1 {
        return Err(GraphError::mismatch(operation, (n_major + 1, 1), (ptr.len(), 1)));
    }
    if idx.len() != values.len() {
        return Err(GraphError::mismatch(operation, (values.len(), 1), (idx.len(), 1)));
    }
    if ptr[0] != 0 || ptr[n_major] != idx.len() || ptr.windows(2).any(|w| w[0] > w[1]) {
        return Err(GraphError::mismatch(operation, (idx.len(), 1), (ptr[n_major], 1)));
    }

    let mut triplets = Vec::with_capacity(idx.len());
    for major in 0..n_major {
        for k in ptr[major]..ptr[major + 1] {
            if idx[k] >= n_minor {
                return Err(GraphError::IndexOutOfRange {
                    row: major,
                    col: idx[k],
                    rows: n_major,
                    cols: n_minor,
                });
            }
            triplets.push((major, idx[k], values[k]));
        }
    }
    Ok(triplets)
}

impl<T: Scalar> Matrix<T> for SparseMatrixCSR<T> {
    fn rows(&self) -> usize {
        self.storage.n_major
    }

    fn columns(&self) -> usize {
        self.storage.n_minor
    }

    fn format(&self) -> StorageFormat {
        StorageFormat::Csr
    }

    fn nnz(&self) -> usize {
        self.storage.nnz()
    }

    fn at(&self, row: usize, col: usize) -> Result<T> {
        check_index(row, col, self.shape())?;
        Ok(self.storage.get(row, col))
    }

    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        check_index(row, col, self.shape())?;
        self.storage.set(row, col, value);
        Ok(())
    }

    fn row_iter(&self, row: usize) -> EntryIter<'_, T> {
        assert!(row < self.rows(), "Row index out of bounds");
        Box::new(self.storage.lane_iter(row))
    }

    fn column_iter(&self, col: usize) -> EntryIter<'_, T> {
        assert!(col < self.columns(), "Column index out of bounds");
        Box::new(self.storage.minor_iter(col))
    }

    fn row_to_array(&self, row: usize) -> Vec<T> {
        self.storage.lane_to_dense(row)
    }

    fn clear(&mut self) {
        self.storage.clear();
    }

    fn assign_lanes(&mut self, axis: Axis, lanes: Vec<Lane<T>>) {
        match axis {
            Axis::Row => self.storage.assign_lanes(lanes),
            Axis::Column => {
                let by_column = CompressedStorage::from_lanes(self.columns(), self.rows(), lanes);
                self.storage = by_column.transpose();
            }
        }
    }
}

impl<T: Scalar> MatrixOps<T> for SparseMatrixCSR<T> {
    type Transposed = SparseMatrixCSR<T>;

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

impl<T: Scalar> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.rows(), self.columns())?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        // Print a sample of the matrix content
        let max_rows_to_print = 5.min(self.rows());

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let (cols, vals) = self.storage.lane(i);

                if cols.is_empty() {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(cols.len());

                    for j in 0..max_elements {
                        write!(f, "({}, {:?}) ", cols[j], vals[j])?;
                    }

                    if cols.len() > max_elements {
                        write!(f, "... ({} more)", cols.len() - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.rows() > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.rows() - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrixCSR<i32> {
        SparseMatrixCSR::from_raw(
            3, 3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
        )
        .unwrap()
    }

    #[test]
    fn test_from_raw() {
        let matrix = sample();

        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.columns(), 3);
        assert_eq!(matrix.nnz(), 5);
        assert_eq!(matrix.row_ptr(), &[0, 2, 3, 5]);
    }

    #[test]
    fn test_row_iter() {
        let matrix = sample();

        let row0: Vec<_> = matrix.row_iter(0).collect();
        assert_eq!(row0, vec![(0, 1), (1, 2)]);

        let row1: Vec<_> = matrix.row_iter(1).collect();
        assert_eq!(row1, vec![(1, 3)]);

        let row2: Vec<_> = matrix.row_iter(2).collect();
        assert_eq!(row2, vec![(0, 4), (2, 5)]);
    }

    #[test]
    fn test_unsorted_row_is_ordered() {
        let matrix = SparseMatrixCSR::from_raw(1, 4, vec![0, 3], vec![3, 0, 2], vec![7, 8, 9]).unwrap();
        assert_eq!(matrix.col_idx(), &[0, 2, 3]);
        assert_eq!(matrix.values(), &[8, 9, 7]);
    }

    #[test]
    fn test_identity() {
        let identity = SparseMatrixCSR::<i32>::identity(3);

        assert_eq!(identity.rows(), 3);
        assert_eq!(identity.columns(), 3);
        assert_eq!(identity.nnz(), 3);

        assert_eq!(identity.row_ptr(), &[0, 1, 2, 3]);
        assert_eq!(identity.col_idx(), &[0, 1, 2]);
        assert_eq!(identity.values(), &[1, 1, 1]);
    }

    #[test]
    fn test_invalid_row_ptr() {
        let result = SparseMatrixCSR::from_raw(
            3, 3,
            vec![0, 2, 3], // Missing last element
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
        );
        assert!(matches!(result, Err(GraphError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_inconsistent_lengths() {
        let result = SparseMatrixCSR::from_raw(
            3, 3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4], // Missing last element
        );
        assert!(matches!(result, Err(GraphError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_column_out_of_bounds() {
        let result = SparseMatrixCSR::from_raw(1, 2, vec![0, 1], vec![2], vec![1]);
        assert!(matches!(result, Err(GraphError::IndexOutOfRange { col: 2, .. })));
    }

    #[test]
    fn test_set_keeps_rows_sorted() {
        let mut matrix = SparseMatrixCSR::<f64>::new(2, 4);
        matrix.set(0, 3, 1.0).unwrap();
        matrix.set(0, 1, 2.0).unwrap();
        matrix.set(1, 0, 3.0).unwrap();
        matrix.set(0, 2, 4.0).unwrap();

        assert_eq!(matrix.row(0), (&[1, 2, 3][..], &[2.0, 4.0, 1.0][..]));
        assert_eq!(matrix.row_ptr(), &[0, 3, 4]);

        matrix.set(0, 2, 0.0).unwrap();
        assert_eq!(matrix.row(0).0, &[1, 3]);
        assert_eq!(matrix.nnz(), 3);
    }

    #[test]
    fn test_column_iter() {
        let col0: Vec<_> = sample().column_iter(0).collect();
        assert_eq!(col0, vec![(0, 1), (2, 4)]);
    }

    #[test]
    fn test_assign_column_lanes() {
        let mut matrix = SparseMatrixCSR::<i32>::new(2, 2);
        matrix.assign_lanes(Axis::Column, vec![(vec![1], vec![5]), (vec![0, 1], vec![6, 7])]);
        assert_eq!(matrix.row_to_array(0), vec![0, 6]);
        assert_eq!(matrix.row_to_array(1), vec![5, 7]);
    }
}
