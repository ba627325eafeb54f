//! Row accumulators for semiring multiplication
//!
//! A row of `C = A ⊗⊕ B` receives many partial products for the same column.
//! The accumulators fold them with the additive monoid of the semiring:
//! - **Dense**: a value slot per output column, for narrow outputs
//! - **Sort**: an unsorted product list sorted and merged once, for wide outputs
//!
//! Both return entries in ascending column order with e⊕ and zero results
//! removed.

use crate::matrix::storage::Lane;
use crate::operator::Monoid;
use crate::scalar::Scalar;

/// Trait for accumulators that fold the partial products of one output row
pub trait Accumulator<T> {
    /// Reset the accumulator to prepare for a new row
    fn reset(&mut self);

    /// Fold `val` into column `col`
    fn accumulate(&mut self, col: usize, val: T);

    /// Extract the kept entries as sorted `(columns, values)` and reset
    fn extract_result(&mut self) -> Lane<T>;
}

/// Create an accumulator suited to an output row of `n_cols` columns
///
/// Rows up to `dense_threshold` columns wide use a dense accumulator,
/// wider rows the sort-based one.
pub fn create_accumulator<T: Scalar>(
    n_cols: usize,
    dense_threshold: usize,
    add: Monoid<T>,
) -> Box<dyn Accumulator<T>> {
    if n_cols <= dense_threshold {
        Box::new(DenseAccumulator::new(n_cols, add))
    } else {
        // Start with a reasonable initial capacity
        let initial_capacity = std::cmp::min(n_cols / 10, 1024);
        Box::new(SortAccumulator::new(initial_capacity, add))
    }
}

#[inline]
fn keep<T: Scalar>(value: T, add: &Monoid<T>) -> bool {
    value != add.identity() && !value.is_zero()
}

/// Dense accumulator: one slot per output column
pub struct DenseAccumulator<T> {
    /// The dense accumulation array
    values: Vec<T>,

    /// Flags to track which slots hold a partial result
    occupied: Vec<bool>,

    /// Columns touched in the current row
    col_indices: Vec<usize>,

    add: Monoid<T>,
}

impl<T: Scalar> DenseAccumulator<T> {
    /// Create a new dense accumulator with specified column capacity
    pub fn new(n_cols: usize, add: Monoid<T>) -> Self {
        Self {
            values: vec![add.identity(); n_cols],
            occupied: vec![false; n_cols],
            col_indices: Vec::new(),
            add,
        }
    }
}

impl<T: Scalar> Accumulator<T> for DenseAccumulator<T> {
    fn reset(&mut self) {
        // Clear only the slots this row touched
        for &col in &self.col_indices {
            self.occupied[col] = false;
        }
        self.col_indices.clear();
    }

    fn accumulate(&mut self, col: usize, val: T) {
        if !self.occupied[col] {
            // First time seeing this column, mark it and add to indices
            self.occupied[col] = true;
            self.col_indices.push(col);
            self.values[col] = val;
        } else {
            self.values[col] = self.add.apply(self.values[col], val);
        }
    }

    fn extract_result(&mut self) -> Lane<T> {
        self.col_indices.sort_unstable();

        let mut cols = Vec::with_capacity(self.col_indices.len());
        let mut vals = Vec::with_capacity(self.col_indices.len());
        for &col in &self.col_indices {
            let value = self.values[col];
            if keep(value, &self.add) {
                cols.push(col);
                vals.push(value);
            }
        }

        self.reset();
        (cols, vals)
    }
}

/// Sort-based accumulator: collects products, then sorts and merges duplicates
pub struct SortAccumulator<T> {
    /// Temporary storage for column indices of intermediate products
    col_indices: Vec<usize>,

    /// Temporary storage for values of intermediate products
    values: Vec<T>,

    add: Monoid<T>,
}

impl<T: Scalar> SortAccumulator<T> {
    pub fn new(initial_capacity: usize, add: Monoid<T>) -> Self {
        Self {
            col_indices: Vec::with_capacity(initial_capacity),
            values: Vec::with_capacity(initial_capacity),
            add,
        }
    }
}

impl<T: Scalar> Accumulator<T> for SortAccumulator<T> {
    fn reset(&mut self) {
        self.col_indices.clear();
        self.values.clear();
    }

    fn accumulate(&mut self, col: usize, val: T) {
        self.col_indices.push(col);
        self.values.push(val);
    }

    fn extract_result(&mut self) -> Lane<T> {
        if self.col_indices.is_empty() {
            return (Vec::new(), Vec::new());
        }

        // Stable sort keeps products of one column in arrival order
        let mut order: Vec<usize> = (0..self.col_indices.len()).collect();
        order.sort_by_key(|&i| self.col_indices[i]);

        let mut sorted_cols = Vec::new();
        let mut sorted_vals = Vec::new();

        let mut current_col = self.col_indices[order[0]];
        let mut current_val = self.values[order[0]];

        for &i in order.iter().skip(1) {
            let col = self.col_indices[i];
            let val = self.values[i];

            if col == current_col {
                current_val = self.add.apply(current_val, val);
            } else {
                if keep(current_val, &self.add) {
                    sorted_cols.push(current_col);
                    sorted_vals.push(current_val);
                }
                current_col = col;
                current_val = val;
            }
        }

        // Add the last column/value
        if keep(current_val, &self.add) {
            sorted_cols.push(current_col);
            sorted_vals.push(current_val);
        }

        self.reset();
        (sorted_cols, sorted_vals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_accumulator_empty() {
        let mut accumulator = DenseAccumulator::<f64>::new(5, Monoid::plus());

        // Without any accumulation, should get empty result
        let (col_indices, values) = accumulator.extract_result();

        assert!(col_indices.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_dense_accumulator_merges_and_sorts() {
        let mut accumulator = DenseAccumulator::<i32>::new(6, Monoid::plus());
        accumulator.accumulate(4, 1);
        accumulator.accumulate(1, 2);
        accumulator.accumulate(4, 3);

        assert_eq!(accumulator.extract_result(), (vec![1, 4], vec![2, 4]));

        // Extraction resets for the next row
        accumulator.accumulate(0, 9);
        assert_eq!(accumulator.extract_result(), (vec![0], vec![9]));
    }

    #[test]
    fn test_dense_accumulator_drops_cancellation() {
        let mut accumulator = DenseAccumulator::<i32>::new(3, Monoid::plus());
        accumulator.accumulate(2, 5);
        accumulator.accumulate(2, -5);
        accumulator.accumulate(0, 1);
        assert_eq!(accumulator.extract_result(), (vec![0], vec![1]));
    }

    #[test]
    fn test_sort_accumulator_merges_duplicates() {
        let mut accumulator = SortAccumulator::<f64>::new(4, Monoid::plus());
        accumulator.accumulate(7, 1.0);
        accumulator.accumulate(2, 2.0);
        accumulator.accumulate(7, 0.5);
        accumulator.accumulate(3, 4.0);

        assert_eq!(accumulator.extract_result(), (vec![2, 3, 7], vec![2.0, 4.0, 1.5]));
    }

    #[test]
    fn test_min_monoid_drops_identity() {
        let mut accumulator = SortAccumulator::<i64>::new(4, Monoid::min());
        accumulator.accumulate(1, 8);
        accumulator.accumulate(1, 3);
        accumulator.accumulate(2, i64::MAX);
        assert_eq!(accumulator.extract_result(), (vec![1], vec![3]));
    }

    #[test]
    fn test_accumulators_agree() {
        let products = [(5usize, 2i32), (0, 1), (5, 3), (9, 4), (0, -1), (3, 7)];

        let mut dense = create_accumulator(10, 256, Monoid::plus());
        let mut sort = create_accumulator(10, 0, Monoid::plus());
        for &(col, val) in &products {
            dense.accumulate(col, val);
            sort.accumulate(col, val);
        }

        let expected = (vec![3, 5, 9], vec![7, 5, 4]);
        assert_eq!(dense.extract_result(), expected);
        assert_eq!(sort.extract_result(), expected);
    }
}
