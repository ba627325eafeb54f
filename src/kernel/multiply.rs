//! Semiring multiplication kernels
//!
//! `C(r, c) = ⊕_i A(r, i) ⊗ B(i, c)`, accumulated from e⊕. Two row-wise
//! strategies produce the same result:
//!
//! - **Inner product** when B is CSC: row r of A is merged against each
//!   column stream of B.
//! - **Gustavson** otherwise: each A entry `(r, i, a)` scales row i of B into
//!   a dense or sort-based row accumulator.
//!
//! Rows are independent, so both run through the row scheduler and honour
//! cancellation between rows.

use log::debug;

use crate::context::Context;
use crate::error::{check_shape, GraphError, Result};
use crate::kernel::accumulator::create_accumulator;
use crate::kernel::Mask;
use crate::matrix::config::{Axis, StorageFormat};
use crate::matrix::storage::Lane;
use crate::matrix::traits::{Matrix, Vector};
use crate::operator::Semiring;
use crate::parallel::compute_lanes;
use crate::scalar::Scalar;

#[inline]
fn kept<T: Scalar>(semiring: &Semiring<T>, value: T) -> bool {
    value != semiring.zero() && !value.is_zero()
}

/// Folds the products of two ascending sparse streams; `None` when no index matches
fn dot<T, L, R>(semiring: &Semiring<T>, left: L, right: R) -> Option<T>
where
    T: Scalar,
    L: IntoIterator<Item = (usize, T)>,
    R: IntoIterator<Item = (usize, T)>,
{
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    let mut acc: Option<T> = None;

    loop {
        let (i, a) = match left.peek() {
            Some(&entry) => entry,
            None => break,
        };
        let (j, b) = match right.peek() {
            Some(&entry) => entry,
            None => break,
        };

        if i == j {
            let product = semiring.multiply(a, b);
            acc = Some(semiring.add(acc.unwrap_or(semiring.zero()), product));
            left.next();
            right.next();
        } else if i < j {
            left.next();
        } else {
            right.next();
        }
    }

    acc
}

/// Row r of `A ⊗⊕ B` by merging A's row with every permitted column of B
fn inner_product_row<T: Scalar>(
    semiring: &Semiring<T>,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    r: usize,
) -> Lane<T> {
    let a_row: Vec<(usize, T)> = a.row_iter(r).collect();
    if a_row.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let candidates: Vec<usize> = match mask {
        Mask::Matrix(_) => mask.stored(Axis::Row, r).unwrap_or_default(),
        _ => (0..b.columns()).collect(),
    };

    let mut cols = Vec::new();
    let mut vals = Vec::new();
    for c in candidates {
        if let Some(value) = dot(semiring, a_row.iter().copied(), b.column_iter(c)) {
            if kept(semiring, value) {
                cols.push(c);
                vals.push(value);
            }
        }
    }

    match mask {
        Mask::Complement(_) => mask.filter_lane(Axis::Row, r, (cols, vals)),
        _ => (cols, vals),
    }
}

/// Row r of `A ⊗⊕ B` by scaling rows of B into an accumulator
fn gustavson_row<T: Scalar>(
    semiring: &Semiring<T>,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    dense_threshold: usize,
    r: usize,
) -> Lane<T> {
    let mut accumulator = create_accumulator(b.columns(), dense_threshold, semiring.add_monoid());

    for (i, a_val) in a.row_iter(r) {
        for (c, b_val) in b.row_iter(i) {
            accumulator.accumulate(c, semiring.multiply(a_val, b_val));
        }
    }

    let lane = accumulator.extract_result();
    mask.filter_lane(Axis::Row, r, lane)
}

/// `out = A ⊗⊕ B` under `semiring`, restricted by `mask`
///
/// # Arguments
///
/// * `a` - Left operand, m × k
/// * `b` - Right operand, k × n
/// * `mask` - Optional m × n write mask
/// * `out` - Destination, m × n; cleared before it is filled
pub fn mxm<T: Scalar>(
    ctx: &Context,
    semiring: &Semiring<T>,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Matrix<T>,
) -> Result<()> {
    let operation = "matrix multiply";
    if a.columns() != b.rows() {
        return Err(GraphError::mismatch(operation, (a.columns(), b.columns()), b.shape()));
    }
    check_shape(operation, (a.rows(), b.columns()), out.shape())?;
    mask.check_shape(operation, out.shape())?;

    let inner = b.format() == StorageFormat::Csc;
    debug!(
        "{}: {}x{} · {}x{} over {} via {}",
        operation,
        a.rows(),
        a.columns(),
        b.rows(),
        b.columns(),
        semiring.add_monoid().name(),
        if inner { "inner product" } else { "gustavson" }
    );

    let dense_threshold = ctx.config().dense_accum_threshold;
    let lanes = compute_lanes(ctx, a.rows(), |r| {
        if inner {
            inner_product_row(semiring, a, b, mask, r)
        } else {
            gustavson_row(semiring, a, b, mask, dense_threshold, r)
        }
    })?;

    out.assign_lanes(Axis::Row, lanes);
    Ok(())
}

/// `out = A · B` under the plus-times semiring
pub fn matrix_matrix_multiply<T: Scalar>(
    ctx: &Context,
    a: &dyn Matrix<T>,
    b: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    out: &mut dyn Matrix<T>,
) -> Result<()> {
    mxm(ctx, &Semiring::plus_times(), a, b, mask, out)
}

/// `y = A ⊗⊕ x` under `semiring`; `y(r) = ⊕_i A(r, i) ⊗ x(i)`
pub fn mxv<T: Scalar>(
    ctx: &Context,
    semiring: &Semiring<T>,
    a: &dyn Matrix<T>,
    x: &dyn Vector<T>,
    mask: Mask<'_, T>,
    y: &mut dyn Vector<T>,
) -> Result<()> {
    let operation = "matrix-vector multiply";
    check_shape(operation, (a.columns(), 1), x.shape())?;
    check_shape(operation, (a.rows(), 1), y.shape())?;
    mask.check_shape(operation, y.shape())?;

    debug!("{}: {}x{} · {}", operation, a.rows(), a.columns(), x.length());

    // Absent entries of x contribute nothing, as opposed to contributing zero
    let mut x_dense: Vec<Option<T>> = vec![None; x.length()];
    for (i, value) in x.iter() {
        x_dense[i] = Some(value);
    }

    let lanes = compute_lanes(ctx, a.rows(), |r| {
        let mut acc: Option<T> = None;
        for (i, a_val) in a.row_iter(r) {
            if let Some(x_val) = x_dense[i] {
                let product = semiring.multiply(a_val, x_val);
                acc = Some(semiring.add(acc.unwrap_or(semiring.zero()), product));
            }
        }
        let lane = match acc {
            Some(value) if kept(semiring, value) => (vec![0], vec![value]),
            _ => (Vec::new(), Vec::new()),
        };
        mask.filter_lane(Axis::Row, r, lane)
    })?;

    y.assign_lanes(Axis::Row, lanes);
    Ok(())
}

/// `y = A · x` under the plus-times semiring
pub fn matrix_vector_multiply<T: Scalar>(
    ctx: &Context,
    a: &dyn Matrix<T>,
    x: &dyn Vector<T>,
    mask: Mask<'_, T>,
    y: &mut dyn Vector<T>,
) -> Result<()> {
    mxv(ctx, &Semiring::plus_times(), a, x, mask, y)
}

/// `yᵀ = xᵀ ⊗⊕ A` under `semiring`; `y(c) = ⊕_i x(i) ⊗ A(i, c)`
///
/// Follows the out-edges of every vertex in `x` when A is an adjacency matrix.
pub fn vxm<T: Scalar>(
    ctx: &Context,
    semiring: &Semiring<T>,
    x: &dyn Vector<T>,
    a: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    y: &mut dyn Vector<T>,
) -> Result<()> {
    let operation = "vector-matrix multiply";
    check_shape(operation, (a.rows(), 1), x.shape())?;
    check_shape(operation, (a.columns(), 1), y.shape())?;
    mask.check_shape(operation, y.shape())?;

    let lane = if a.format() == StorageFormat::Csc {
        debug!("{}: {} · {}x{} via column dot products", operation, x.length(), a.rows(), a.columns());

        let x_entries: Vec<(usize, T)> = x.iter().collect();
        let per_column = compute_lanes(ctx, a.columns(), |c| {
            match dot(semiring, x_entries.iter().copied(), a.column_iter(c)) {
                Some(value) if kept(semiring, value) => (vec![0], vec![value]),
                _ => (Vec::new(), Vec::new()),
            }
        })?;
        per_column
            .into_iter()
            .enumerate()
            .filter(|(_, (idx, _))| !idx.is_empty())
            .map(|(c, (_, values))| (c, values[0]))
            .unzip()
    } else {
        debug!("{}: {} · {}x{} via row scaling", operation, x.length(), a.rows(), a.columns());

        let mut accumulator =
            create_accumulator(a.columns(), ctx.config().dense_accum_threshold, semiring.add_monoid());
        for (i, x_val) in x.iter() {
            ctx.check()?;
            for (c, a_val) in a.row_iter(i) {
                accumulator.accumulate(c, semiring.multiply(x_val, a_val));
            }
        }
        accumulator.extract_result()
    };

    let lane = mask.filter_lane(Axis::Column, 0, lane);
    y.assign_lanes(Axis::Column, vec![lane]);
    Ok(())
}

/// `yᵀ = xᵀ · A` under the plus-times semiring
pub fn vector_matrix_multiply<T: Scalar>(
    ctx: &Context,
    x: &dyn Vector<T>,
    a: &dyn Matrix<T>,
    mask: Mask<'_, T>,
    y: &mut dyn Vector<T>,
) -> Result<()> {
    vxm(ctx, &Semiring::plus_times(), x, a, mask, y)
}
