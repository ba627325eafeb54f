//! Element-wise kernels across storage formats

use gblas::{
    element_wise, element_wise_intersection, element_wise_matrix_add,
    element_wise_matrix_add_assign, element_wise_matrix_multiply, element_wise_matrix_subtract,
    element_wise_vector_add, element_wise_vector_add_assign, element_wise_vector_multiply,
    element_wise_vector_subtract, BinaryOp, Context, DenseMatrix, DenseVector, GraphError,
    KernelConfig, Mask, Matrix, SparseMatrixCSC, SparseMatrixCSR, SparseVector, Vector,
};

fn left() -> DenseMatrix<i64> {
    DenseMatrix::from_rows(&[vec![1, 0, 2], vec![0, 3, 0], vec![4, 0, 5]]).unwrap()
}

fn right() -> DenseMatrix<i64> {
    DenseMatrix::from_rows(&[vec![1, 6, -2], vec![0, 0, 0], vec![0, 7, 1]]).unwrap()
}

fn boxed<M: Matrix<i64> + 'static>(m: M) -> Box<dyn Matrix<i64>> {
    Box::new(m)
}

/// `left` and `right` in every storage format
fn operands() -> Vec<(Box<dyn Matrix<i64>>, Box<dyn Matrix<i64>>)> {
    let (l, r) = (left(), right());
    vec![
        (boxed(l.clone()), boxed(r.clone())),
        (boxed(l.to_csr()), boxed(r.to_csr())),
        (boxed(l.to_csc()), boxed(r.to_csc())),
        (boxed(l.to_csr()), boxed(r.to_csc())),
        (boxed(l.to_csc()), boxed(r.clone())),
        (boxed(l.to_csc()), boxed(r.to_csr())),
        (boxed(l.clone()), boxed(r.to_csc())),
    ]
}

fn destinations() -> Vec<Box<dyn Matrix<i64>>> {
    vec![
        boxed(DenseMatrix::new(3, 3)),
        boxed(SparseMatrixCSR::new(3, 3)),
        boxed(SparseMatrixCSC::new(3, 3)),
    ]
}

#[test]
fn test_add_every_format_combination() {
    let expected = DenseMatrix::from_rows(&[vec![2, 6, 0], vec![0, 3, 0], vec![4, 7, 6]]).unwrap();
    let ctx = Context::background();

    for (a, b) in operands() {
        for mut out in destinations() {
            element_wise_matrix_add(&ctx, a.as_ref(), b.as_ref(), Mask::None, out.as_mut()).unwrap();
            assert!(out.equal(&expected), "{:?} + {:?} into {:?}", a.format(), b.format(), out.format());
        }
    }
}

#[test]
fn test_add_drops_cancelled_entries() {
    let ctx = Context::background();
    let mut out = SparseMatrixCSR::new(3, 3);
    element_wise_matrix_add(&ctx, &left().to_csr(), &right().to_csr(), Mask::None, &mut out).unwrap();
    // 2 + (-2) at (0, 2) is the only cancellation
    assert_eq!(out.nnz(), 6);
    assert_eq!(out.at(0, 2).unwrap(), 0);
    assert_eq!(out.row_iter(0).collect::<Vec<_>>(), vec![(0, 2), (1, 6)]);
}

#[test]
fn test_mixed_formats_follow_sparser_operand() {
    let n = 300;
    let ctx = Context::background();
    let diagonal = SparseMatrixCSC::<i64>::identity(n);
    // Rows 0 and 1 full: far more entries than the diagonal
    let wide = SparseMatrixCSR::from_triplets(n, n, (0..n).flat_map(|c| [(0, c, 2i64), (1, c, 3)])).unwrap();

    let mut expected = wide.to_dense();
    for i in 0..n {
        expected.set(i, i, expected.at(i, i).unwrap() + 1).unwrap();
    }

    let mut by_columns = SparseMatrixCSR::new(n, n);
    element_wise_matrix_add(&ctx, &diagonal, &wide, Mask::None, &mut by_columns).unwrap();
    assert!(by_columns.equal(&expected));

    let mut reversed = SparseMatrixCSC::new(n, n);
    element_wise_matrix_add(&ctx, &wide, &diagonal, Mask::None, &mut reversed).unwrap();
    assert!(reversed.equal(&expected));

    // A single entry makes the CSR side the sparser one
    let single = SparseMatrixCSR::from_triplets(n, n, vec![(5, 7, -4)]).unwrap();
    let mask = SparseMatrixCSR::from_triplets(n, n, vec![(5, 5, 1), (5, 7, 1), (6, 6, 1)]).unwrap();
    let mut masked = DenseMatrix::new(n, n);
    element_wise_matrix_add(&ctx, &single, &diagonal, Mask::Matrix(&mask), &mut masked).unwrap();
    assert_eq!(masked.nnz(), 3);
    assert_eq!(masked.at(5, 7).unwrap(), -4);
    assert_eq!(masked.at(6, 6).unwrap(), 1);
    assert_eq!(masked.at(7, 7).unwrap(), 0);
}

#[test]
fn test_subtract() {
    let expected = DenseMatrix::from_rows(&[vec![0, -6, 4], vec![0, 3, 0], vec![4, -7, 4]]).unwrap();
    let ctx = Context::background();

    for (a, b) in operands() {
        for mut out in destinations() {
            element_wise_matrix_subtract(&ctx, a.as_ref(), b.as_ref(), Mask::None, out.as_mut()).unwrap();
            assert!(out.equal(&expected));
        }
    }
}

#[test]
fn test_multiply_is_intersection() {
    let expected = DenseMatrix::from_rows(&[vec![1, 0, -4], vec![0, 0, 0], vec![0, 0, 5]]).unwrap();
    let ctx = Context::background();

    for (a, b) in operands() {
        for mut out in destinations() {
            element_wise_matrix_multiply(&ctx, a.as_ref(), b.as_ref(), Mask::None, out.as_mut()).unwrap();
            assert!(out.equal(&expected));
        }
    }
}

#[test]
fn test_custom_operators() {
    let ctx = Context::background();
    let mut out = SparseMatrixCSC::new(3, 3);

    element_wise(&ctx, BinaryOp::max(), &left(), &right(), Mask::None, &mut out).unwrap();
    let expected = DenseMatrix::from_rows(&[vec![1, 6, 2], vec![0, 3, 0], vec![4, 7, 5]]).unwrap();
    assert!(out.equal(&expected));

    element_wise_intersection(&ctx, BinaryOp::min(), &left(), &right(), Mask::None, &mut out).unwrap();
    let expected = DenseMatrix::from_rows(&[vec![1, 0, -2], vec![0, 0, 0], vec![0, 0, 1]]).unwrap();
    assert!(out.equal(&expected));
}

#[test]
fn test_masks() {
    let ctx = Context::background();
    let mask = SparseMatrixCSR::from_triplets(3, 3, vec![(0, 0, 1), (2, 1, 1), (1, 2, 9)]).unwrap();

    let mut out = SparseMatrixCSR::new(3, 3);
    element_wise_matrix_add(&ctx, &left(), &right(), Mask::Matrix(&mask), &mut out).unwrap();
    let expected = SparseMatrixCSR::from_triplets(3, 3, vec![(0, 0, 2), (2, 1, 7)]).unwrap();
    assert!(out.equal(&expected));

    let mut out = DenseMatrix::new(3, 3);
    element_wise_matrix_add(&ctx, &left(), &right(), Mask::Complement(&mask), &mut out).unwrap();
    let expected = DenseMatrix::from_rows(&[vec![0, 6, 0], vec![0, 3, 0], vec![4, 0, 6]]).unwrap();
    assert!(out.equal(&expected));
}

#[test]
fn test_destination_is_replaced() {
    let ctx = Context::background();
    let mut out = SparseMatrixCSR::from_triplets(3, 3, vec![(1, 0, 42)]).unwrap();
    element_wise_matrix_multiply(&ctx, &left(), &right(), Mask::None, &mut out).unwrap();
    assert_eq!(out.at(1, 0).unwrap(), 0);
}

#[test]
fn test_shape_mismatch_leaves_destination() {
    let ctx = Context::background();
    let wide = SparseMatrixCSR::<i64>::new(3, 4);
    let mut out = SparseMatrixCSR::from_triplets(3, 3, vec![(0, 0, 1)]).unwrap();

    let result = element_wise_matrix_add(&ctx, &left(), &wide, Mask::None, &mut out);
    assert!(matches!(result, Err(GraphError::DimensionMismatch { .. })));
    assert_eq!(out.nnz(), 1);

    let bad_mask = SparseMatrixCSR::<i64>::new(2, 3);
    let result = element_wise_matrix_add(&ctx, &left(), &right(), Mask::Matrix(&bad_mask), &mut out);
    assert!(result.is_err());

    let mut small = DenseMatrix::new(2, 3);
    assert!(element_wise_matrix_add(&ctx, &left(), &right(), Mask::None, &mut small).is_err());
}

#[test]
fn test_add_assign_reads_before_writing() {
    let ctx = Context::background();
    let mut acc = left().to_csr();
    element_wise_matrix_add_assign(&ctx, &mut acc, &left(), Mask::None).unwrap();
    assert_eq!(acc.at(2, 2).unwrap(), 10);
    assert_eq!(acc.nnz(), 5);
}

#[test]
fn test_vector_kernels() {
    let ctx = Context::background();
    let a = SparseVector::from_entries(5, vec![(0, 1), (2, 3), (4, -1)]).unwrap();
    let b = DenseVector::from_vec(vec![2, 0, 3, 1, 1]);

    let mut sum = SparseVector::new(5);
    element_wise_vector_add(&ctx, &a, &b, Mask::None, &mut sum).unwrap();
    assert_eq!(sum.iter().collect::<Vec<_>>(), vec![(0, 3), (2, 6), (3, 1)]);

    let mut difference = DenseVector::new(5);
    element_wise_vector_subtract(&ctx, &a, &b, Mask::None, &mut difference).unwrap();
    assert_eq!(difference.to_vec(), vec![-1, 0, 0, -1, -2]);

    let mut product = SparseVector::new(5);
    element_wise_vector_multiply(&ctx, &a, &b, Mask::None, &mut product).unwrap();
    assert_eq!(product.iter().collect::<Vec<_>>(), vec![(0, 2), (2, 9), (4, -1)]);

    let mut short = SparseVector::new(4);
    assert!(element_wise_vector_add(&ctx, &a, &b, Mask::None, &mut short).is_err());
}

#[test]
fn test_vector_add_assign_with_complement_mask() {
    let ctx = Context::background();
    let mut visited = SparseVector::from_entries(4, vec![(0, 1), (1, 1)]).unwrap();
    let frontier = SparseVector::from_entries(4, vec![(1, 1), (3, 1)]).unwrap();
    let seen = visited.clone();

    element_wise_vector_add_assign(&ctx, &mut visited, &frontier, Mask::Complement(&seen)).unwrap();
    // The destination is replaced; masked-out coordinates end up empty
    assert_eq!(visited.iter().collect::<Vec<_>>(), vec![(3, 1)]);
}

#[test]
fn test_parallel_matches_sequential() {
    let n = 300;
    let a = SparseMatrixCSR::from_triplets(n, n, (0..n).map(|i| (i, (i * 7) % n, i as i64 + 1))).unwrap();
    let b = SparseMatrixCSC::from_triplets(n, n, (0..n).map(|i| (i, (i * 3) % n, 2))).unwrap();

    let sequential = Context::background();
    let parallel = Context::with_config(KernelConfig::parallel().with_threads(4)).unwrap();

    let mut expected = SparseMatrixCSR::new(n, n);
    element_wise_matrix_add(&sequential, &a, &b, Mask::None, &mut expected).unwrap();
    let mut actual = SparseMatrixCSR::new(n, n);
    element_wise_matrix_add(&parallel, &a, &b, Mask::None, &mut actual).unwrap();

    assert_eq!(actual, expected);
}

#[test]
fn test_cancelled_context() {
    let ctx = Context::background();
    ctx.cancel();
    let mut out = SparseMatrixCSR::from_triplets(3, 3, vec![(0, 0, 9)]).unwrap();
    let result = element_wise_matrix_add(&ctx, &left(), &right(), Mask::None, &mut out);
    assert!(matches!(result, Err(GraphError::Cancelled)));
    assert_eq!(out.at(0, 0).unwrap(), 9);
}
