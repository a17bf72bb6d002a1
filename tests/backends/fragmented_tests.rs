/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use deep_causality_matrix::{DenseExtractor, ExtractOptions, FragmentedSparseMatrix, Matrix, MatrixError, Selection, SparseExtractor};

// Same logical 3x4 matrix as the CSR sample in `compressed_tests`, built
// incrementally one primary row at a time instead of from one shared buffer.
fn sample_fragmented() -> FragmentedSparseMatrix<f64> {
    FragmentedSparseMatrix::new(
        3,
        4,
        vec![
            (vec![1.0, 2.0], vec![1, 3]),
            (vec![], vec![]),
            (vec![3.0, 4.0], vec![0, 2]),
        ],
        true,
        true,
    )
    .unwrap()
}

#[test]
fn test_fragmented_dense_row_full() {
    let m = sample_fragmented();
    let mut extractor = m.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 4];
    assert_eq!(extractor.fetch(0, &mut buf), &[0.0, 1.0, 0.0, 2.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[0.0, 0.0, 0.0, 0.0]);
    assert_eq!(extractor.fetch(2, &mut buf), &[3.0, 0.0, 4.0, 0.0]);
}

#[test]
fn test_fragmented_column_access_via_secondary_cache() {
    let m = sample_fragmented();
    let mut extractor = m.dense_extractor(false, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 3];
    assert_eq!(extractor.fetch(0, &mut buf), &[0.0, 0.0, 3.0]);
    assert_eq!(extractor.fetch(1, &mut buf), &[1.0, 0.0, 0.0]);
    assert_eq!(extractor.fetch(3, &mut buf), &[2.0, 0.0, 0.0]);
}

#[test]
fn test_fragmented_sparse_row() {
    let m = sample_fragmented();
    let mut extractor = m.sparse_extractor(true, Selection::Full, ExtractOptions::new());
    let mut vbuf = vec![0.0; 4];
    let mut ibuf = vec![0usize; 4];
    let range = extractor.fetch(2, &mut vbuf, &mut ibuf);
    assert_eq!(range.value.unwrap(), &[3.0, 4.0]);
    assert_eq!(range.index.unwrap(), &[0, 2]);
}

#[test]
fn test_fragmented_primary_count_mismatch() {
    let err = FragmentedSparseMatrix::<f64>::new(2, 4, vec![(vec![], vec![])], true, true).unwrap_err();
    assert_eq!(err, MatrixError::PointerLengthMismatch(2, 1));
}

#[test]
fn test_fragmented_unsorted_indices() {
    let err =
        FragmentedSparseMatrix::new(1, 4, vec![(vec![1.0, 2.0], vec![3, 1])], true, true).unwrap_err();
    assert_eq!(err, MatrixError::UnsortedIndices(0, 1));
}

#[test]
fn test_fragmented_index_out_of_bounds() {
    let err = FragmentedSparseMatrix::new(1, 4, vec![(vec![1.0], vec![10])], true, true).unwrap_err();
    assert_eq!(err, MatrixError::IndexOutOfBounds(10, 4));
}

#[test]
fn test_fragmented_is_sparse() {
    let m = sample_fragmented();
    assert_eq!(m.sparse_proportion(), 1.0);
    assert!(m.is_sparse());
}
