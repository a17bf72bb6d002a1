/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::sync::Arc;

use deep_causality_matrix::{DenseExtractor, DenseMatrix, ExtractOptions, Matrix, MatrixError, Selection, SparseExtractor};

fn sample_row_major() -> DenseMatrix<f64> {
    // 2x3, row-major: [[1,0,2],[0,3,0]]
    DenseMatrix::new(2, 3, vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0], true).unwrap()
}

#[test]
fn test_dense_row_full_zero_copy_path() {
    let m = sample_row_major();
    let mut extractor = m.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 3];
    assert_eq!(extractor.fetch(0, &mut buf), &[1.0, 0.0, 2.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[0.0, 3.0, 0.0]);
}

#[test]
fn test_dense_column_full() {
    let m = sample_row_major();
    let mut extractor = m.dense_extractor(false, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 2];
    assert_eq!(extractor.fetch(0, &mut buf), &[1.0, 0.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[0.0, 3.0]);
    assert_eq!(extractor.fetch(2, &mut buf), &[2.0, 0.0]);
}

#[test]
fn test_dense_sparse_extractor_skips_zeros() {
    let m = sample_row_major();
    let mut extractor = m.sparse_extractor(true, Selection::Full, ExtractOptions::new());
    let mut vbuf = vec![0.0; 3];
    let mut ibuf = vec![0usize; 3];
    let range = extractor.fetch(0, &mut vbuf, &mut ibuf);
    assert_eq!(range.value.unwrap(), &[1.0, 2.0]);
    assert_eq!(range.index.unwrap(), &[0, 2]);
}

#[test]
fn test_dense_block_selection() {
    let m = sample_row_major();
    let mut extractor = m.dense_extractor(true, Selection::Block { start: 1, length: 2 }, ExtractOptions::new());
    let mut buf = vec![0.0; 2];
    assert_eq!(extractor.fetch(0, &mut buf), &[0.0, 2.0]);
}

#[test]
fn test_dense_index_selection() {
    let m = sample_row_major();
    let idx: Arc<[usize]> = vec![2usize, 0].into();
    let mut extractor = m.dense_extractor(true, Selection::Index(idx), ExtractOptions::new());
    let mut buf = vec![0.0; 2];
    assert_eq!(extractor.fetch(1, &mut buf), &[0.0, 0.0]);
}

#[test]
fn test_column_major_storage() {
    // Same logical contents as `sample_row_major`, stored column-major:
    // column 0 = [1,0], column 1 = [0,3], column 2 = [2,0].
    let m = DenseMatrix::new(2, 3, vec![1.0, 0.0, 0.0, 3.0, 2.0, 0.0], false).unwrap();
    let mut extractor = m.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 3];
    assert_eq!(extractor.fetch(0, &mut buf), &[1.0, 0.0, 2.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[0.0, 3.0, 0.0]);
}

#[test]
fn test_dense_not_sparse() {
    let m = sample_row_major();
    assert_eq!(m.sparse_proportion(), 0.0);
    assert!(!m.is_sparse());
}

#[test]
fn test_buffer_length_mismatch_error() {
    let err = DenseMatrix::new(2, 3, vec![1.0, 2.0], true).unwrap_err();
    assert_eq!(err, MatrixError::PointerLengthMismatch(6, 2));
}
