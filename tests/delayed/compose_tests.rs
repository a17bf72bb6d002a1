/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::sync::Arc;

use deep_causality_matrix::delayed::{ConstantMatrix, DelayedBind, DelayedCast, DelayedTranspose};
use deep_causality_matrix::{DenseExtractor, DenseMatrix, ExtractOptions, Matrix, MatrixError, Selection, SparseExtractor};

fn mat(nrow: usize, ncol: usize, data: Vec<f64>) -> Arc<dyn Matrix<f64>> {
    Arc::new(DenseMatrix::new(nrow, ncol, data, true).unwrap())
}

#[test]
fn test_bind_along_rows_stacks_children() {
    let a = mat(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
    let b = mat(1, 2, vec![5.0, 6.0]);
    let bound = DelayedBind::new(vec![a, b], true).unwrap();
    assert_eq!(bound.nrow(), 3);
    assert_eq!(bound.ncol(), 2);

    let mut extractor = bound.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 2];
    assert_eq!(extractor.fetch(0, &mut buf), &[1.0, 2.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[3.0, 4.0]);
    assert_eq!(extractor.fetch(2, &mut buf), &[5.0, 6.0]);
}

#[test]
fn test_bind_perpendicular_direction_concatenates_all_children() {
    let a = mat(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
    let b = mat(1, 2, vec![5.0, 6.0]);
    let bound = DelayedBind::new(vec![a, b], true).unwrap();
    let mut extractor = bound.dense_extractor(false, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 3];
    // Column 0 spans every child's rows: a's column 0 then b's column 0.
    assert_eq!(extractor.fetch(0, &mut buf), &[1.0, 3.0, 5.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[2.0, 4.0, 6.0]);
}

#[test]
fn test_bind_rejects_mismatched_perpendicular_shape() {
    let a = mat(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
    let b = mat(1, 3, vec![5.0, 6.0, 7.0]);
    let err = DelayedBind::new(vec![a, b], true).unwrap_err();
    assert!(matches!(err, MatrixError::ShapeMismatch((2, 2), (1, 3))));
}

#[test]
fn test_bind_rejects_empty_children() {
    let err = DelayedBind::<f64>::new(vec![], true).unwrap_err();
    assert_eq!(err, MatrixError::EmptyMatrix);
}

#[test]
fn test_cast_widens_integer_to_float() {
    let child: Arc<dyn Matrix<i32>> = Arc::new(DenseMatrix::new(1, 3, vec![1, 0, -2], true).unwrap());
    let cast: DelayedCast<i32, f64> = DelayedCast::new(child);
    let mut extractor = cast.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0f64; 3];
    assert_eq!(extractor.fetch(0, &mut buf), &[1.0, 0.0, -2.0]);
}

#[test]
fn test_transpose_swaps_dimensions_and_axes() {
    // 2x3: [[1,2,3],[4,5,6]]
    let child = mat(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let t = DelayedTranspose::new(child);
    assert_eq!(t.nrow(), 3);
    assert_eq!(t.ncol(), 2);

    let mut extractor = t.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 2];
    assert_eq!(extractor.fetch(0, &mut buf), &[1.0, 4.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[2.0, 5.0]);
    assert_eq!(extractor.fetch(2, &mut buf), &[3.0, 6.0]);
}

#[test]
fn test_constant_matrix_nonzero_is_dense_everywhere() {
    let c = ConstantMatrix::new(2, 3, 7.0);
    assert_eq!(c.sparse_proportion(), 0.0);
    let mut extractor = c.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 3];
    assert_eq!(extractor.fetch(0, &mut buf), &[7.0, 7.0, 7.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[7.0, 7.0, 7.0]);
}

#[test]
fn test_constant_matrix_zero_is_fully_sparse() {
    let c = ConstantMatrix::new(2, 3, 0.0);
    assert_eq!(c.sparse_proportion(), 1.0);
    let mut extractor = c.sparse_extractor(true, Selection::Full, ExtractOptions::new());
    let mut vbuf = vec![0.0; 3];
    let mut ibuf = vec![0usize; 3];
    let range = extractor.fetch(0, &mut vbuf, &mut ibuf);
    assert_eq!(range.number, 0);
}
