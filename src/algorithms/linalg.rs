//! Linear-algebra utilities built on the matrix contract

use std::ops::Neg;

use log::debug;

use crate::error::Result;
use crate::matrix::traits::{Matrix, MatrixOps};
use crate::scalar::Scalar;

/// Overwrites row `r` of `m` with `values`; sparse formats drop the zeros
fn write_row<T: Scalar, M: Matrix<T>>(m: &mut M, r: usize, values: &[T]) -> Result<()> {
    for (c, &value) in values.iter().enumerate() {
        m.set(r, c, value)?;
    }
    Ok(())
}

/// Reduced row echelon form of `s` by Gauss–Jordan elimination
///
/// Pivots are the first non-zero entry found scanning down the lead column;
/// zero tests are exact. When every remaining column lacks a pivot the
/// partially reduced matrix is returned, which is already the rref of a
/// rank-deficient input. The result keeps the storage format of `s`.
pub fn reduced<T: Scalar, M: MatrixOps<T>>(s: &M) -> Result<M> {
    let mut m = s.clone();
    let (rows, columns) = m.shape();
    let mut lead = 0;

    for r in 0..rows {
        if lead >= columns {
            return Ok(m);
        }

        let mut i = r;
        while m.at(i, lead)?.is_zero() {
            i += 1;
            if i == rows {
                i = r;
                lead += 1;
                if lead == columns {
                    debug!("reduced: no pivot left after row {}, stopping", r);
                    return Ok(m);
                }
            }
        }

        // Swap through full rows so sparse formats stay consistent
        if i != r {
            let row_i = m.row_to_array(i);
            let row_r = m.row_to_array(r);
            write_row(&mut m, i, &row_r)?;
            write_row(&mut m, r, &row_i)?;
        }

        let pivot = m.at(r, lead)?;
        let pivot_row: Vec<T> = m.row_to_array(r).into_iter().map(|v| v / pivot).collect();
        write_row(&mut m, r, &pivot_row)?;

        for other in 0..rows {
            if other == r {
                continue;
            }
            let factor = m.at(other, lead)?;
            if factor.is_zero() {
                continue;
            }
            let eliminated: Vec<T> = m
                .row_to_array(other)
                .into_iter()
                .zip(&pivot_row)
                .map(|(v, &p)| v - factor * p)
                .collect();
            write_row(&mut m, other, &eliminated)?;
        }

        lead += 1;
    }

    Ok(m)
}

/// Whether `s` is square and equal to its transpose
pub fn symmetric<T: Scalar, M: MatrixOps<T>>(s: &M) -> bool {
    s.rows() == s.columns() && s.transpose().equal(s)
}

/// Whether `s` is square and equal to the negation of its transpose
pub fn skew_symmetric<T, M>(s: &M) -> bool
where
    T: Scalar + Neg<Output = T>,
    M: MatrixOps<T>,
{
    s.rows() == s.columns() && s.transpose().negative().equal(s)
}
