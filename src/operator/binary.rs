//! Binary operators, monoids and semirings
//!
//! All three are small `Copy` values holding plain function pointers, so a
//! semiring can be shared freely between worker threads.

use std::fmt;

use crate::scalar::Scalar;

/// A named pure function `(T, T) -> T`.
#[derive(Clone, Copy)]
pub struct BinaryOp<T> {
    name: &'static str,
    op: fn(T, T) -> T,
}

impl<T> BinaryOp<T> {
    /// Wraps an arbitrary function as a binary operator
    pub const fn new(name: &'static str, op: fn(T, T) -> T) -> Self {
        Self { name, op }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the operator
    #[inline]
    pub fn apply(&self, left: T, right: T) -> T {
        (self.op)(left, right)
    }
}

impl<T: Scalar> BinaryOp<T> {
    pub fn plus() -> Self {
        Self::new("plus", |a, b| a + b)
    }

    pub fn minus() -> Self {
        Self::new("minus", |a, b| a - b)
    }

    pub fn times() -> Self {
        Self::new("times", |a, b| a * b)
    }

    pub fn div() -> Self {
        Self::new("div", |a, b| a / b)
    }

    pub fn min() -> Self {
        Self::new("min", |a, b| if b < a { b } else { a })
    }

    pub fn max() -> Self {
        Self::new("max", |a, b| if b > a { b } else { a })
    }

    /// Keeps the left operand
    pub fn first() -> Self {
        Self::new("first", |a, _| a)
    }

    /// Keeps the right operand
    pub fn second() -> Self {
        Self::new("second", |_, b| b)
    }

    /// Logical or over numbers: one when either side is non-zero
    pub fn lor() -> Self {
        Self::new("lor", |a, b| {
            if !a.is_zero() || !b.is_zero() {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// Logical and over numbers: one when both sides are non-zero
    pub fn land() -> Self {
        Self::new("land", |a, b| {
            if !a.is_zero() && !b.is_zero() {
                T::one()
            } else {
                T::zero()
            }
        })
    }
}

impl<T> fmt::Debug for BinaryOp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryOp({})", self.name)
    }
}

/// An associative binary operator together with its identity element.
#[derive(Clone, Copy, Debug)]
pub struct Monoid<T> {
    op: BinaryOp<T>,
    identity: T,
}

impl<T: Copy> Monoid<T> {
    pub const fn new(op: BinaryOp<T>, identity: T) -> Self {
        Self { op, identity }
    }

    pub fn identity(&self) -> T {
        self.identity
    }

    pub fn operator(&self) -> BinaryOp<T> {
        self.op
    }

    pub fn name(&self) -> &'static str {
        self.op.name()
    }

    #[inline]
    pub fn apply(&self, left: T, right: T) -> T {
        self.op.apply(left, right)
    }
}

impl<T: Scalar> Monoid<T> {
    pub fn plus() -> Self {
        Self::new(BinaryOp::plus(), T::zero())
    }

    pub fn times() -> Self {
        Self::new(BinaryOp::times(), T::one())
    }

    pub fn min() -> Self {
        Self::new(BinaryOp::min(), T::max_value())
    }

    pub fn max() -> Self {
        Self::new(BinaryOp::max(), T::min_value())
    }

    pub fn lor() -> Self {
        Self::new(BinaryOp::lor(), T::zero())
    }
}

/// An additive monoid `(⊕, e⊕)` paired with a multiplicative operator `⊗`.
#[derive(Clone, Copy, Debug)]
pub struct Semiring<T> {
    add: Monoid<T>,
    multiply: BinaryOp<T>,
}

impl<T: Copy> Semiring<T> {
    pub const fn new(add: Monoid<T>, multiply: BinaryOp<T>) -> Self {
        Self { add, multiply }
    }

    pub fn add_monoid(&self) -> Monoid<T> {
        self.add
    }

    pub fn multiply_op(&self) -> BinaryOp<T> {
        self.multiply
    }

    /// The additive identity e⊕
    #[inline]
    pub fn zero(&self) -> T {
        self.add.identity()
    }

    #[inline]
    pub fn add(&self, left: T, right: T) -> T {
        self.add.apply(left, right)
    }

    #[inline]
    pub fn multiply(&self, left: T, right: T) -> T {
        self.multiply.apply(left, right)
    }
}

impl<T: Scalar> Semiring<T> {
    /// Conventional arithmetic `(+, ×)`
    pub fn plus_times() -> Self {
        Self::new(Monoid::plus(), BinaryOp::times())
    }

    /// Tropical `(min, +)`, used for shortest paths
    pub fn min_plus() -> Self {
        Self::new(Monoid::min(), BinaryOp::plus())
    }

    /// `(max, +)`, used for longest / critical paths
    pub fn max_plus() -> Self {
        Self::new(Monoid::max(), BinaryOp::plus())
    }

    /// Boolean `(∨, ∧)` over numbers, used for reachability
    pub fn lor_land() -> Self {
        Self::new(Monoid::lor(), BinaryOp::land())
    }
}
