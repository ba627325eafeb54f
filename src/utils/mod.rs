//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csc, from_sprs_csr, to_ndarray, to_sprs_csc, to_sprs_csr};

/// Computes an exclusive prefix sum (scan) for a vector
///
/// The result has one more element than `input`; its last element is the total.
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}
