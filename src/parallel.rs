//! # Row-partitioned kernel execution
//!
//! Kernels describe how to compute one output lane (a row, or a column for
//! column-oriented merges). This module evaluates every lane either on the
//! calling thread or across a rayon pool, polling the context before each
//! lane. A lane is always computed start to finish by one worker, so partial
//! accumulators never cross threads.

use log::{trace, warn};
use rayon::prelude::*;

use crate::context::Context;
use crate::error::{GraphError, Result};
use crate::matrix::storage::Lane;

/// Computes `n_lanes` independent output lanes with `compute`.
///
/// Returns [`GraphError::Cancelled`] as soon as the context reports
/// cancellation; the lanes computed so far are discarded.
pub(crate) fn compute_lanes<T, F>(ctx: &Context, n_lanes: usize, compute: F) -> Result<Vec<Lane<T>>>
where
    T: Send,
    F: Fn(usize) -> Lane<T> + Send + Sync,
{
    let result = if ctx.config().runs_parallel(n_lanes) {
        trace!("computing {} lanes in parallel", n_lanes);

        let run = || {
            (0..n_lanes)
                .into_par_iter() // Use Rayon's parallel iterator
                .map(|i| {
                    ctx.check()?;
                    Ok(compute(i))
                })
                .collect::<Result<Vec<_>>>()
        };

        match ctx.pool() {
            Some(pool) => pool.install(run),
            None => run(),
        }
    } else {
        trace!("computing {} lanes sequentially", n_lanes);

        let mut lanes = Vec::with_capacity(n_lanes);
        for i in 0..n_lanes {
            ctx.check()?;
            lanes.push(compute(i));
        }
        Ok(lanes)
    };

    if let Err(GraphError::Cancelled) = &result {
        warn!("kernel cancelled before completing {} lanes", n_lanes);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::config::KernelConfig;

    fn diagonal_lane(i: usize) -> Lane<i32> {
        (vec![i], vec![i as i32 + 1])
    }

    #[test]
    fn test_sequential_order() {
        let ctx = Context::background();
        let lanes = compute_lanes(&ctx, 4, diagonal_lane).unwrap();
        assert_eq!(lanes.len(), 4);
        assert_eq!(lanes[3], (vec![3], vec![4]));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = KernelConfig::parallel().with_threads(4).with_min_parallel_rows(1);
        let ctx = Context::with_config(config).unwrap();

        let parallel = compute_lanes(&ctx, 500, diagonal_lane).unwrap();
        let sequential = compute_lanes(&Context::background(), 500, diagonal_lane).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_cancelled_context_stops() {
        let ctx = Context::background();
        ctx.cancel();
        let result = compute_lanes(&ctx, 3, diagonal_lane);
        assert!(matches!(result, Err(GraphError::Cancelled)));
    }

    #[test]
    fn test_cancel_midway() {
        let ctx = Context::background();
        let result = compute_lanes(&ctx, 10, |i| {
            if i == 4 {
                ctx.cancel();
            }
            diagonal_lane(i)
        });
        assert!(matches!(result, Err(GraphError::Cancelled)));
    }
}
