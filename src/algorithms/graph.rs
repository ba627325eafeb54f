//! Graph traversals expressed as sparse linear algebra
//!
//! A graph on n vertices is an n × n adjacency matrix where `A(u, v) ≠ 0`
//! means an edge `u → v` of weight `A(u, v)`. Reachability runs over the
//! logical-or/logical-and semiring, shortest paths over min-plus.

use log::{debug, trace};

use crate::context::Context;
use crate::error::{GraphError, Result};
use crate::kernel::{element_wise_vector_add_assign, mxv, vxm, Mask};
use crate::matrix::traits::{check_index, Matrix, Vector};
use crate::matrix::vector::SparseVector;
use crate::operator::Semiring;
use crate::scalar::Scalar;

fn check_adjacency<T: Scalar>(a: &dyn Matrix<T>, vertex: usize) -> Result<usize> {
    if a.rows() != a.columns() {
        return Err(GraphError::NotSquare {
            rows: a.rows(),
            cols: a.columns(),
        });
    }
    check_index(vertex, 0, (a.rows(), 1))?;
    Ok(a.rows())
}

/// Level-synchronous breadth-first search from `source`.
///
/// Each level expands the frontier along out-edges with `vxm`, masked by the
/// complement of the visited set, then folds the new vertices into it. `stop`
/// sees the visited set before every expansion, so once on `{source}` and
/// then after each level, and ends the search early by returning `true`.
/// The search also ends once a level discovers nothing.
///
/// Returns the visited set with `1` at every reached vertex.
pub fn breadth_first_search<T, F>(
    ctx: &Context,
    a: &dyn Matrix<T>,
    source: usize,
    mut stop: F,
) -> Result<SparseVector<T>>
where
    T: Scalar,
    F: FnMut(&SparseVector<T>) -> bool,
{
    let n = check_adjacency(a, source)?;
    let semiring = Semiring::lor_land();

    let mut visited = SparseVector::new(n);
    visited.set_vec(source, T::one())?;
    let mut frontier = visited.clone();
    let mut next = SparseVector::new(n);

    let mut level = 0;
    while !stop(&visited) {
        vxm(ctx, &semiring, &frontier, a, Mask::Complement(&visited), &mut next)?;
        if next.nnz() == 0 {
            break;
        }
        level += 1;
        trace!("bfs level {}: {} new vertices", level, next.nnz());

        element_wise_vector_add_assign(ctx, &mut visited, &next, Mask::None)?;
        std::mem::swap(&mut frontier, &mut next);
    }

    debug!("bfs from {}: {} vertices reached in {} levels", source, visited.nnz(), level);
    Ok(visited)
}

/// Single-source shortest path lengths under min-plus.
///
/// Distances start as `Some(0)` at `source` and unknown elsewhere; each of
/// at most `n - 1` rounds relaxes every stored edge from the previous round's
/// distances. Unreachable vertices stay `None`. A further improving round
/// means a negative cycle is reachable from `source`.
///
/// Only stored entries are edges, so zero-weight edges cannot be expressed.
pub fn bellman_ford<T: Scalar>(ctx: &Context, a: &dyn Matrix<T>, source: usize) -> Result<Vec<Option<T>>> {
    let n = check_adjacency(a, source)?;
    let semiring = Semiring::min_plus();

    let mut distance: Vec<Option<T>> = vec![None; n];
    distance[source] = Some(T::zero());

    for round in 1..n {
        ctx.check()?;
        match relax(&semiring, a, &distance) {
            Some(next) => distance = next,
            None => {
                debug!("bellman-ford from {} converged after {} rounds", source, round - 1);
                return Ok(distance);
            }
        }
    }

    if relax(&semiring, a, &distance).is_some() {
        return Err(GraphError::NegativeCycle { source_vertex: source });
    }
    Ok(distance)
}

/// One round `d' = d ⊕ (d ⊗ A)`; `None` when nothing improves
fn relax<T: Scalar>(semiring: &Semiring<T>, a: &dyn Matrix<T>, distance: &[Option<T>]) -> Option<Vec<Option<T>>> {
    let mut next = distance.to_vec();
    for (u, du) in distance.iter().enumerate() {
        let du = match du {
            Some(du) => *du,
            None => continue,
        };
        for (v, weight) in a.row_iter(u) {
            let candidate = semiring.multiply(du, weight);
            next[v] = Some(match next[v] {
                Some(dv) => semiring.add(dv, candidate),
                None => candidate,
            });
        }
    }

    if next.as_slice() == distance {
        None
    } else {
        Some(next)
    }
}

/// Vertices with a path to `target`, including `target` itself.
///
/// Grows `x ← x ∨ A·x` under logical-or/logical-and until no new vertex
/// appears; `(A·x)(u)` is set when `u` has an edge into `x`.
pub fn predecessors<T: Scalar>(ctx: &Context, a: &dyn Matrix<T>, target: usize) -> Result<SparseVector<T>> {
    let n = check_adjacency(a, target)?;
    let semiring = Semiring::lor_land();

    let mut reached = SparseVector::new(n);
    reached.set_vec(target, T::one())?;
    let mut next = SparseVector::new(n);

    loop {
        mxv(ctx, &semiring, a, &reached, Mask::Complement(&reached), &mut next)?;
        if next.nnz() == 0 {
            break;
        }
        element_wise_vector_add_assign(ctx, &mut reached, &next, Mask::None)?;
    }

    debug!("predecessors of {}: {} vertices", target, reached.nnz());
    Ok(reached)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{DenseMatrix, SparseMatrixCSR};

    fn path_graph() -> SparseMatrixCSR<i64> {
        // 0 → 1 → 2, 3 isolated
        SparseMatrixCSR::from_triplets(4, 4, vec![(0, 1, 1), (1, 2, 1)]).unwrap()
    }

    #[test]
    fn test_non_square_adjacency() {
        let a = DenseMatrix::<i64>::new(2, 3);
        let ctx = Context::background();
        assert!(matches!(
            breadth_first_search(&ctx, &a, 0, |_| false),
            Err(GraphError::NotSquare { rows: 2, cols: 3 })
        ));
        assert!(matches!(bellman_ford(&ctx, &a, 0), Err(GraphError::NotSquare { .. })));
        assert!(matches!(predecessors(&ctx, &a, 0), Err(GraphError::NotSquare { .. })));
    }

    #[test]
    fn test_source_out_of_range() {
        let ctx = Context::background();
        assert!(matches!(
            breadth_first_search(&ctx, &path_graph(), 4, |_| false),
            Err(GraphError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_bfs_runs_to_exhaustion() {
        let visited = breadth_first_search(&Context::background(), &path_graph(), 0, |_| false).unwrap();
        assert_eq!(visited.indices(), &[0, 1, 2]);
        assert!(visited.values().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_bfs_stops_immediately() {
        let visited = breadth_first_search(&Context::background(), &path_graph(), 0, |_| true).unwrap();
        assert_eq!(visited.indices(), &[0]);
    }

    #[test]
    fn test_relax_reports_fixed_point() {
        let a = path_graph();
        let ring = Semiring::min_plus();
        let settled = vec![Some(0), Some(1), Some(2), None];
        assert!(relax(&ring, &a, &settled).is_none());
        let start = vec![Some(0), None, None, None];
        assert_eq!(relax(&ring, &a, &start), Some(vec![Some(0), Some(1), None, None]));
    }

    #[test]
    fn test_predecessors_of_path_end() {
        let reached = predecessors(&Context::background(), &path_graph(), 2).unwrap();
        assert_eq!(reached.indices(), &[0, 1, 2]);
    }
}
