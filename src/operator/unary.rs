//! Named unary operators

use std::ops::Neg;

use crate::scalar::Scalar;

/// A pure function `T -> T` with a stable name.
pub trait UnaryOperator<T> {
    /// Name used in logs and diagnostics
    fn name(&self) -> &'static str;

    /// Applies the operator to a single value
    fn apply(&self, value: T) -> T;
}

/// Returns its argument unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity;

/// Maps `v` to `-v`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdditiveInverse;

/// Maps `v` to `1 / v`.
///
/// Integer types use truncating division, so only `1` and `-1` survive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiplicativeInverse;

/// Boolean negation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalInverse;

impl<T: Copy> UnaryOperator<T> for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn apply(&self, value: T) -> T {
        value
    }
}

impl<T: Copy + Neg<Output = T>> UnaryOperator<T> for AdditiveInverse {
    fn name(&self) -> &'static str {
        "additive_inverse"
    }

    fn apply(&self, value: T) -> T {
        -value
    }
}

impl<T: Scalar> UnaryOperator<T> for MultiplicativeInverse {
    fn name(&self) -> &'static str {
        "multiplicative_inverse"
    }

    fn apply(&self, value: T) -> T {
        T::one() / value
    }
}

impl UnaryOperator<bool> for LogicalInverse {
    fn name(&self) -> &'static str {
        "logical_inverse"
    }

    fn apply(&self, value: bool) -> bool {
        !value
    }
}
