//! Element type bound shared by every matrix, vector and kernel

use num_traits::{Bounded, Num};
use std::fmt::Debug;

/// Numeric element type of a matrix or vector.
///
/// Implemented for all primitive integers and floats. `T::zero()` is the
/// implicit value of every absent entry in sparse storage.
pub trait Scalar:
    Copy + PartialEq + PartialOrd + Num + Bounded + Debug + Send + Sync + 'static
{
}

impl<T> Scalar for T where
    T: Copy + PartialEq + PartialOrd + Num + Bounded + Debug + Send + Sync + 'static
{
}
