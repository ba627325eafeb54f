//! Element-wise kernels
//!
//! Each output lane is the ordered merge of the matching lanes of the two
//! operands. Add and subtract walk the union of stored coordinates (a missing
//! side contributes zero); multiply walks the intersection.

use std::iter::Peekable;

use log::debug;

use crate::context::Context;
use crate::error::{check_shape, Result};
use crate::kernel::Mask;
use crate::matrix::config::{Axis, StorageFormat};
use crate::matrix::storage::Lane;
use crate::matrix::traits::{Matrix, Vector};
use crate::operator::BinaryOp;
use crate::parallel::compute_lanes;
use crate::scalar::Scalar;

/// Which coordinates an element-wise operation visits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pattern {
    Union,
    Intersection,
}

/// Native traversal axis of a storage format
fn native_axis(format: StorageFormat) -> Axis {
    match format {
        StorageFormat::Csc => Axis::Column,
        StorageFormat::Csr | StorageFormat::Dense => Axis::Row,
    }
}

/// Lane axis for merging `a` with `b`
///
/// Follows the sparse operand. When both are sparse in different formats the
/// one with fewer stored entries decides; two dense operands merge by row.
fn merge_axis<T, A, B>(a: &A, b: &B) -> Axis
where
    T: Scalar,
    A: Matrix<T> + ?Sized,
    B: Matrix<T> + ?Sized,
{
    let (fa, fb) = (a.format(), b.format());
    match (fa.is_sparse(), fb.is_sparse()) {
        (true, true) if fa == fb => native_axis(fa),
        (true, true) if a.nnz() <= b.nnz() => native_axis(fa),
        (true, true) => native_axis(fb),
        (true, false) => native_axis(fa),
        (false, true) => native_axis(fb),
        (false, false) => Axis::Row,
    }
}

/// Merges two ascending `(index, value)` streams with `op`
fn merge_lane<T, L, R>(left: L, right: R, op: BinaryOp<T>, pattern: Pattern) -> Lane<T>
where
    T: Scalar,
    L: Iterator<Item = (usize, T)>,
    R: Iterator<Item = (usize, T)>,
{
    let mut left: Peekable<L> = left.peekable();
    let mut right: Peekable<R> = right.peekable();
    let mut idx = Vec::new();
    let mut values = Vec::new();

    loop {
        let next = match (left.peek().copied(), right.peek().copied()) {
            (None, None) => break,
            (Some((i, a)), Some((j, b))) if i == j => {
                left.next();
                right.next();
                Some((i, op.apply(a, b)))
            }
            (Some((i, a)), Some((j, _))) if i < j => {
                left.next();
                (pattern == Pattern::Union).then(|| (i, op.apply(a, T::zero())))
            }
            (Some(_), Some((j, b))) => {
                right.next();
                (pattern == Pattern::Union).then(|| (j, op.apply(T::zero(), b)))
            }
            (Some((i, a)), None) => {
                if pattern == Pattern::Intersection {
                    break;
                }
                left.next();
                Some((i, op.apply(a, T::zero())))
            }
            (None, Some((j, b))) => {
                if pattern == Pattern::Intersection {
                    break;
                }
                right.next();
                Some((j, op.apply(T::zero(), b)))
            }
        };

        if let Some((i, value)) = next {
            if !value.is_zero() {
                idx.push(i);
                values.push(value);
            }
        }
    }

    (idx, values)
}

/// Shared body of every element-wise kernel; operands may be `dyn Matrix` or `dyn Vector`
#[allow(clippy::too_many_arguments)]
fn run<T, A, B, O>(
    ctx: &Context,
    operation: &'static str,
    op: BinaryOp<T>,
    pattern: Pattern,
    a: &A,
    b: &B,
    mask: Mask<'_, T>,
    out: &mut O,
) -> Result<()>
where
    T: Scalar,
    A: Matrix<T> + ?Sized,
    B: Matrix<T> + ?Sized,
    O: Matrix<T> + ?Sized,
{
    check_shape(operation, a.shape(), b.shape())?;
    check_shape(operation, a.shape(), out.shape())?;
    mask.check_shape(operation, a.shape())?;

    let lanes = compute(ctx, operation, op, pattern, a, b, mask)?;
    out.assign_lanes(lanes.0, lanes.1);
    Ok(())
}

/// Computes every output lane without touching any destination
fn compute<T, A, B>(
    ctx: &Context,
    operation: &'static str,
    op: BinaryOp<T>,
    pattern: Pattern,
    a: &A,
    b: &B,
    mask: Mask<'_, T>,
) -> Result<(Axis, Vec<Lane<T>>)>
where
    T: Scalar,
    A: Matrix<T> + ?Sized,
    B: Matrix<T> + ?Sized,
{
    let axis = merge_axis(a, b);
    let n_lanes = match axis {
        Axis::Row => a.rows(),
        Axis::Column => a.columns(),
    };
    debug!(
        "{}: {}x{} ({:?} ⊙ {:?}) merged by {:?}",
        operation,
        a.rows(),
        a.columns(),
        a.format(),
        b.format(),
        axis
    );

    let lanes = compute_lanes(ctx, n_lanes, |k| {
        let lane = match axis {
            Axis::Row => merge_lane(a.row_iter(k), b.row_iter(k), op, pattern),
            Axis::Column => merge_lane(a.column_iter(k), b.column_iter(k), op, pattern),
        };
        mask.filter_lane(axis, k, lane)
    })?;

    Ok((axis, lanes))
}

/// `out = a op b` over the union of stored coordinates
pub fn element_wise<T: Scalar>(
    ctx: &Context,
    op: BinaryOp<T>,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Matrix<T>,
) -> Result<()> {
    run(ctx, "element-wise union", op, Pattern::Union, a, b, mask, out)
}

/// `out = a op b` over the intersection of stored coordinates
pub fn element_wise_intersection<T: Scalar>(
    ctx: &Context,
    op: BinaryOp<T>,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Matrix<T>,
) -> Result<()> {
    run(ctx, "element-wise intersection", op, Pattern::Intersection, a, b, mask, out)
}

pub fn element_wise_matrix_add<T: Scalar>(
    ctx: &Context,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Matrix<T>,
) -> Result<()> {
    run(ctx, "element-wise matrix add", BinaryOp::plus(), Pattern::Union, a, b, mask, out)
}

pub fn element_wise_matrix_subtract<T: Scalar>(
    ctx: &Context,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Matrix<T>,
) -> Result<()> {
    run(ctx, "element-wise matrix subtract", BinaryOp::minus(), Pattern::Union, a, b, mask, out)
}

pub fn element_wise_matrix_multiply<T: Scalar>(
    ctx: &Context,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Matrix<T>,
) -> Result<()> {
    run(ctx, "element-wise matrix multiply", BinaryOp::times(), Pattern::Intersection, a, b, mask, out)
}

/// `acc = acc + other`, reading every cell of `acc` before it is overwritten
pub fn element_wise_matrix_add_assign<T: Scalar>(
    ctx: &Context,
    acc: &mut dyn Matrix<T>,
    other: &dyn Matrix<T>,
    mask: Mask<'_, T>,
) -> Result<()> {
    let operation = "element-wise matrix add";
    check_shape(operation, acc.shape(), other.shape())?;
    mask.check_shape(operation, acc.shape())?;

    let (axis, lanes) = compute(ctx, operation, BinaryOp::plus(), Pattern::Union, &*acc, other, mask)?;
    acc.assign_lanes(axis, lanes);
    Ok(())
}

pub fn element_wise_vector_add<T: Scalar>(
    ctx: &Context,
    a: &dyn Vector<T>,
    b: &dyn Vector<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Vector<T>,
) -> Result<()> {
    run(ctx, "element-wise vector add", BinaryOp::plus(), Pattern::Union, a, b, mask, out)
}

pub fn element_wise_vector_subtract<T: Scalar>(
    ctx: &Context,
    a: &dyn Vector<T>,
    b: &dyn Vector<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Vector<T>,
) -> Result<()> {
    run(ctx, "element-wise vector subtract", BinaryOp::minus(), Pattern::Union, a, b, mask, out)
}

pub fn element_wise_vector_multiply<T: Scalar>(
    ctx: &Context,
    a: &dyn Vector<T>,
    b: &dyn Vector<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Vector<T>,
) -> Result<()> {
    run(ctx, "element-wise vector multiply", BinaryOp::times(), Pattern::Intersection, a, b, mask, out)
}

/// `acc = acc + other` for vectors; `acc` is both operand and destination
pub fn element_wise_vector_add_assign<T: Scalar>(
    ctx: &Context,
    acc: &mut dyn Vector<T>,
    other: &dyn Vector<T>,
    mask: Mask<'_, T>,
) -> Result<()> {
    let operation = "element-wise vector add";
    check_shape(operation, acc.shape(), other.shape())?;
    mask.check_shape(operation, acc.shape())?;

    let (axis, lanes) = compute(ctx, operation, BinaryOp::plus(), Pattern::Union, &*acc, other, mask)?;
    acc.assign_lanes(axis, lanes);
    Ok(())
}
