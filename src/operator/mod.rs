//! Operator values: unary operators, binary operators, monoids and semirings

pub mod binary;
pub mod unary;

pub use binary::{BinaryOp, Monoid, Semiring};
pub use unary::{AdditiveInverse, Identity, LogicalInverse, MultiplicativeInverse, UnaryOperator};
