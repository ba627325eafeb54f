//! Algebraic kernels
//!
//! Element-wise and multiply kernels over any pair of storage formats. Every
//! kernel validates shapes before touching its destination, computes the
//! result lane by lane through [`compute_lanes`](crate::parallel), and only
//! then clears and fills the destination.

pub mod accumulator;
pub mod elementwise;
pub mod multiply;

use crate::error::{check_shape, Result};
use crate::matrix::config::Axis;
use crate::matrix::storage::Lane;
use crate::matrix::traits::Matrix;
use crate::scalar::Scalar;

pub use accumulator::{create_accumulator, Accumulator, DenseAccumulator, SortAccumulator};
pub use elementwise::{
    element_wise, element_wise_intersection, element_wise_matrix_add,
    element_wise_matrix_add_assign, element_wise_matrix_multiply, element_wise_matrix_subtract,
    element_wise_vector_add, element_wise_vector_add_assign, element_wise_vector_multiply,
    element_wise_vector_subtract,
};
pub use multiply::{
    matrix_matrix_multiply, matrix_vector_multiply, mxm, mxv, vector_matrix_multiply, vxm,
};

/// Write mask for a kernel's destination.
///
/// The mask has the destination's shape. Only its stored (non-zero)
/// pattern matters, never its values.
#[derive(Clone, Copy)]
pub enum Mask<'a, T: Scalar> {
    /// Every coordinate may be written
    None,
    /// Only coordinates where the mask is non-zero may be written
    Matrix(&'a dyn Matrix<T>),
    /// Only coordinates where the mask is zero may be written
    Complement(&'a dyn Matrix<T>),
}

impl<'a, T: Scalar> Mask<'a, T> {
    pub(crate) fn check_shape(&self, operation: &'static str, shape: (usize, usize)) -> Result<()> {
        match self {
            Mask::None => Ok(()),
            Mask::Matrix(m) | Mask::Complement(m) => check_shape(operation, shape, m.shape()),
        }
    }

    /// Ascending minor indices where the mask is stored, for lane `major`
    pub(crate) fn stored(&self, axis: Axis, major: usize) -> Option<Vec<usize>> {
        let m = match self {
            Mask::None => return None,
            Mask::Matrix(m) | Mask::Complement(m) => m,
        };
        let indices = match axis {
            Axis::Row => m.row_iter(major).map(|(i, _)| i).collect(),
            Axis::Column => m.column_iter(major).map(|(i, _)| i).collect(),
        };
        Some(indices)
    }

    /// Removes the entries of `lane` the mask forbids
    pub(crate) fn filter_lane(&self, axis: Axis, major: usize, lane: Lane<T>) -> Lane<T> {
        let stored = match self.stored(axis, major) {
            None => return lane,
            Some(stored) => stored,
        };
        let keep_stored = matches!(self, Mask::Matrix(_));

        let (idx, values) = lane;
        let mut cursor = 0;
        idx.into_iter()
            .zip(values)
            .filter(|&(i, _)| {
                while cursor < stored.len() && stored[cursor] < i {
                    cursor += 1;
                }
                let present = cursor < stored.len() && stored[cursor] == i;
                present == keep_stored
            })
            .unzip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DenseVector, SparseMatrixCSR};

    #[test]
    fn test_mask_filter() {
        let mask = SparseMatrixCSR::from_triplets(1, 5, vec![(0, 1, 1), (0, 3, 1)]).unwrap();
        let lane = (vec![0, 1, 2, 3], vec![10, 11, 12, 13]);

        let kept = Mask::Matrix(&mask).filter_lane(Axis::Row, 0, lane.clone());
        assert_eq!(kept, (vec![1, 3], vec![11, 13]));

        let complement = Mask::Complement(&mask).filter_lane(Axis::Row, 0, lane.clone());
        assert_eq!(complement, (vec![0, 2], vec![10, 12]));

        assert_eq!(Mask::None.filter_lane(Axis::Row, 0, lane.clone()), lane);
    }

    #[test]
    fn test_mask_shape() {
        let mask = DenseVector::<i32>::new(3);
        assert!(Mask::Matrix(&mask).check_shape("test", (3, 1)).is_ok());
        assert!(Mask::Complement(&mask).check_shape("test", (4, 1)).is_err());
        assert!(Mask::<i32>::None.check_shape("test", (4, 1)).is_ok());
    }
}
