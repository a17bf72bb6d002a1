/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::sync::Arc;

use deep_causality_matrix::{
    CompressedSparseMatrix, DenseExtractor, ExtractOptions, Matrix, MatrixError, Selection, SparseExtractor,
};

// 3x4 CSR:
//   row0: col1=1.0, col3=2.0
//   row1: (empty)
//   row2: col0=3.0, col2=4.0
fn sample_csr() -> CompressedSparseMatrix<f64> {
    CompressedSparseMatrix::csr(
        3,
        4,
        vec![1.0, 2.0, 3.0, 4.0],
        vec![1, 3, 0, 2],
        vec![0, 2, 2, 4],
        true,
    )
    .unwrap()
}

#[test]
fn test_csr_dense_row_full() {
    let m = sample_csr();
    let mut extractor = m.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 4];
    assert_eq!(extractor.fetch(0, &mut buf), &[0.0, 1.0, 0.0, 2.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[0.0, 0.0, 0.0, 0.0]);
    assert_eq!(extractor.fetch(2, &mut buf), &[3.0, 0.0, 4.0, 0.0]);
}

#[test]
fn test_csr_sparse_row_full() {
    let m = sample_csr();
    let mut extractor = m.sparse_extractor(true, Selection::Full, ExtractOptions::new());
    let mut vbuf = vec![0.0; 4];
    let mut ibuf = vec![0usize; 4];
    let range = extractor.fetch(0, &mut vbuf, &mut ibuf);
    assert_eq!(range.value.unwrap(), &[1.0, 2.0]);
    assert_eq!(range.index.unwrap(), &[1, 3]);

    let empty = extractor.fetch(1, &mut vbuf, &mut ibuf);
    assert_eq!(empty.number, 0);
}

#[test]
fn test_csr_dense_row_block_and_index() {
    let m = sample_csr();
    let mut block = m.dense_extractor(true, Selection::Block { start: 1, length: 2 }, ExtractOptions::new());
    let mut buf = vec![0.0; 2];
    assert_eq!(block.fetch(0, &mut buf), &[1.0, 0.0]);

    let idx: Arc<[usize]> = vec![0usize, 3].into();
    let mut by_index = m.dense_extractor(true, Selection::Index(idx), ExtractOptions::new());
    let mut buf2 = vec![0.0; 2];
    assert_eq!(by_index.fetch(0, &mut buf2), &[0.0, 2.0]);
}

#[test]
fn test_csr_column_access_via_secondary_cache() {
    let m = sample_csr();
    // row = false: query columns, which is the non-primary direction for a
    // row-major (CSR) matrix and exercises the secondary traversal cache.
    let mut extractor = m.dense_extractor(false, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 3];
    assert_eq!(extractor.fetch(0, &mut buf), &[0.0, 0.0, 3.0]); // column 0
    assert_eq!(extractor.fetch(1, &mut buf), &[1.0, 0.0, 0.0]); // column 1
    assert_eq!(extractor.fetch(2, &mut buf), &[0.0, 0.0, 4.0]); // column 2
    assert_eq!(extractor.fetch(3, &mut buf), &[2.0, 0.0, 0.0]); // column 3
}

#[test]
fn test_csr_sparse_column_access() {
    let m = sample_csr();
    let mut extractor = m.sparse_extractor(false, Selection::Full, ExtractOptions::new());
    let mut vbuf = vec![0.0; 3];
    let mut ibuf = vec![0usize; 3];
    let range = extractor.fetch(1, &mut vbuf, &mut ibuf);
    assert_eq!(range.value.unwrap(), &[1.0]);
    assert_eq!(range.index.unwrap(), &[0]);
}

#[test]
fn test_csc_matches_equivalent_csr() {
    // Same logical matrix as `sample_csr`, stored column-major instead.
    // col0: row2=3.0 ; col1: row0=1.0 ; col2: row2=4.0 ; col3: row0=2.0
    let csc = CompressedSparseMatrix::csc(
        3,
        4,
        vec![3.0, 1.0, 4.0, 2.0],
        vec![2, 0, 2, 0],
        vec![0, 1, 2, 3, 4],
        true,
    )
    .unwrap();
    let mut extractor = csc.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 4];
    assert_eq!(extractor.fetch(0, &mut buf), &[0.0, 1.0, 0.0, 2.0]);
    assert_eq!(extractor.fetch(2, &mut buf), &[3.0, 0.0, 4.0, 0.0]);
    assert_eq!(csc.sparse_proportion(), 1.0);
    assert_eq!(csc.prefer_rows_proportion(), 0.0);
    assert!(!csc.uses_oracle(true));
}

#[test]
fn test_pointer_length_mismatch() {
    let err = CompressedSparseMatrix::csr(2, 2, vec![1.0], vec![0], vec![0, 1], true).unwrap_err();
    assert_eq!(err, MatrixError::PointerLengthMismatch(3, 2));
}

#[test]
fn test_value_index_length_mismatch() {
    let err = CompressedSparseMatrix::csr(2, 2, vec![1.0, 2.0], vec![0], vec![0, 1, 2], true).unwrap_err();
    assert_eq!(err, MatrixError::PointerLengthMismatch(2, 1));
}

#[test]
fn test_non_monotonic_pointers() {
    let err = CompressedSparseMatrix::csr(2, 2, vec![1.0], vec![0], vec![1, 0], true).unwrap_err();
    assert_eq!(err, MatrixError::NonMonotonicPointers(0));
}

#[test]
fn test_unsorted_indices() {
    let err = CompressedSparseMatrix::csr(1, 2, vec![1.0, 2.0], vec![1, 0], vec![0, 2], true).unwrap_err();
    assert_eq!(err, MatrixError::UnsortedIndices(0, 1));
}

#[test]
fn test_index_out_of_bounds() {
    let err = CompressedSparseMatrix::csr(1, 2, vec![1.0], vec![5], vec![0, 1], true).unwrap_err();
    assert_eq!(err, MatrixError::IndexOutOfBounds(5, 2));
}

#[test]
fn test_check_false_skips_validation() {
    // An otherwise-invalid matrix (out-of-bounds index) is accepted when
    // `check` is false; constructing it must not panic.
    let m = CompressedSparseMatrix::csr(1, 2, vec![1.0], vec![5], vec![0, 1], false).unwrap();
    assert_eq!(m.values(), &[1.0]);
}

#[test]
fn test_empty_primary_dimension() {
    let m = CompressedSparseMatrix::csr(0, 3, vec![], vec![], vec![0], true).unwrap();
    assert_eq!(m.nrow(), 0);
    assert_eq!(m.ncol(), 3);
}
