//! The matrix and vector contracts every storage format implements
//!
//! [`Matrix`] is object safe so kernels can take `&dyn Matrix<T>` operands of
//! any format. [`MatrixOps`] adds the operations that return a value of the
//! implementing type, and [`Vector`] the one-dimensional accessors.

use std::ops::Neg;

use crate::context::Context;
use crate::error::{GraphError, Result};
use crate::kernel::{self, Mask};
use crate::matrix::config::{Axis, StorageFormat};
use crate::matrix::storage::Lane;
use crate::scalar::Scalar;

/// Boxed ascending `(index, value)` stream over the non-zero entries of a lane
pub type EntryIter<'a, T> = Box<dyn Iterator<Item = (usize, T)> + 'a>;

/// Capabilities shared by dense, CSR and CSC matrices and by vectors.
pub trait Matrix<T: Scalar>: Sync {
    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    /// `(rows, columns)`
    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns())
    }

    fn format(&self) -> StorageFormat;

    /// Number of non-zero entries
    fn nnz(&self) -> usize;

    /// Value at `(row, col)`, or zero when the entry is absent
    fn at(&self, row: usize, col: usize) -> Result<T>;

    /// Stores `value` at `(row, col)`.
    ///
    /// Sparse formats remove the entry when `value` is zero.
    fn set(&mut self, row: usize, col: usize, value: T) -> Result<()>;

    /// Equivalent to `set(row, col, f(at(row, col)))`
    fn update<F>(&mut self, row: usize, col: usize, f: F) -> Result<()>
    where
        F: FnOnce(T) -> T,
        Self: Sized,
    {
        let current = self.at(row, col)?;
        self.set(row, col, f(current))
    }

    /// Non-zero entries of `row` as ascending `(column, value)` pairs
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()`.
    fn row_iter(&self, row: usize) -> EntryIter<'_, T>;

    /// Non-zero entries of `col` as ascending `(row, value)` pairs
    ///
    /// # Panics
    ///
    /// Panics if `col >= columns()`.
    fn column_iter(&self, col: usize) -> EntryIter<'_, T>;

    /// Row `row` as a dense array of `columns()` values
    fn row_to_array(&self, row: usize) -> Vec<T> {
        let mut dense = vec![T::zero(); self.columns()];
        for (col, value) in self.row_iter(row) {
            dense[col] = value;
        }
        dense
    }

    /// Removes every entry; dimensions are unchanged
    fn clear(&mut self);

    /// Replaces the whole contents with sorted, zero-free lanes.
    ///
    /// With [`Axis::Row`] `lanes[r]` holds the `(columns, values)` of row `r`;
    /// with [`Axis::Column`] `lanes[c]` holds the `(rows, values)` of column `c`.
    /// Kernels call this once per result, after every input has been read.
    fn assign_lanes(&mut self, axis: Axis, lanes: Vec<Lane<T>>);

    /// Mathematical equality, independent of storage format
    fn equal(&self, other: &dyn Matrix<T>) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        if self.format() == StorageFormat::Csc && other.format() == StorageFormat::Csc {
            (0..self.columns()).all(|c| self.column_iter(c).eq(other.column_iter(c)))
        } else {
            (0..self.rows()).all(|r| self.row_iter(r).eq(other.row_iter(r)))
        }
    }

    fn not_equal(&self, other: &dyn Matrix<T>) -> bool {
        !self.equal(other)
    }
}

/// Operations producing a matrix of the implementing type.
pub trait MatrixOps<T: Scalar>: Matrix<T> + Clone + Sized {
    /// Type produced by [`transpose`](MatrixOps::transpose)
    type Transposed: MatrixOps<T>;

    /// A zero matrix of this type with the given shape
    fn zeros(rows: usize, cols: usize) -> Result<Self>;

    /// Matrix whose `(c, r)` entry is this matrix's `(r, c)` entry
    fn transpose(&self) -> Self::Transposed;

    /// Applies `f` to every stored value
    fn map_stored<F: Fn(T) -> T>(&self, f: F) -> Self;

    /// Same shape and format with every entry negated
    fn negative(&self) -> Self
    where
        T: Neg<Output = T>,
    {
        self.map_stored(|v| -v)
    }

    /// `self · other` under the plus-times semiring, in this format
    fn multiply(&self, other: &dyn Matrix<T>) -> Result<Self> {
        let mut out = Self::zeros(self.rows(), other.columns())?;
        kernel::matrix_matrix_multiply(&Context::background(), self, other, Mask::None, &mut out)?;
        Ok(out)
    }

    /// Element-wise `self + other`, in this format
    fn add(&self, other: &dyn Matrix<T>) -> Result<Self> {
        let mut out = Self::zeros(self.rows(), self.columns())?;
        kernel::element_wise_matrix_add(&Context::background(), self, other, Mask::None, &mut out)?;
        Ok(out)
    }
}

/// One-dimensional view of an `n × 1` matrix.
pub trait Vector<T: Scalar>: Matrix<T> {
    fn length(&self) -> usize {
        self.rows()
    }

    fn at_vec(&self, i: usize) -> Result<T> {
        self.at(i, 0)
    }

    fn set_vec(&mut self, i: usize, value: T) -> Result<()> {
        self.set(i, 0, value)
    }

    /// Non-zero entries as ascending `(index, value)` pairs
    fn iter(&self) -> EntryIter<'_, T> {
        self.column_iter(0)
    }
}

/// Fails with [`GraphError::IndexOutOfRange`] unless `(row, col)` lies inside `shape`
#[inline]
pub(crate) fn check_index(row: usize, col: usize, shape: (usize, usize)) -> Result<()> {
    if row < shape.0 && col < shape.1 {
        Ok(())
    } else {
        Err(GraphError::IndexOutOfRange {
            row,
            col,
            rows: shape.0,
            cols: shape.1,
        })
    }
}
