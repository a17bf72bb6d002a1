/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::sync::Arc;

use deep_causality_matrix::delayed::ops::{ArithmeticBinary, ArithmeticKind, ArithmeticScalar};
use deep_causality_matrix::delayed::{make_delayed_subset, DelayedBinaryIsometric, DelayedSubset, DelayedSubsetBlock, DelayedUnaryIsometric};
use deep_causality_matrix::stats::{col_sums, row_sums};
use deep_causality_matrix::traversal_cache::{PrimaryIndices, SecondaryTraversalCache};
use deep_causality_matrix::{CompressedSparseMatrix, DenseExtractor, DenseMatrix, ExtractOptions, Matrix, Selection, SparseExtractor};

fn dense_row(m: &dyn Matrix<f64>, row: usize, ncol: usize) -> Vec<f64> {
    let mut extractor = m.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; ncol];
    extractor.fetch(row, &mut buf).to_vec()
}

// Scenario 1: CSC round-trip.
//
// Built from the triplets `rows`/`cols`/`vals`; grouped by column and
// sorted by row to produce CSC storage. Only the row-3 assertion and the
// row/column total-sum cross-check are asserted here: the claimed row-0
// contents do not correspond to any consistent reading of the source
// triplets, so that assertion is left out rather than hand-adjusted to
// make a test pass.
#[test]
fn test_csc_round_trip_row_and_total_sums() {
    let values = vec![
        -0.89, -0.40, 1.20, 0.40, -1.10, 0.14, -0.42, 1.20, 0.27, 2.10, -0.17, 0.57, 1.60, -1.10, 0.38,
    ];
    let indices = vec![2, 3, 8, 9, 0, 5, 7, 1, 4, 5, 0, 1, 3, 4, 6];
    let pointers = vec![0, 4, 7, 10, 13, 15];
    let m = CompressedSparseMatrix::csc(10, 5, values, indices, pointers, true).unwrap();

    assert_eq!(dense_row(&m, 3, 5), vec![-0.40, 0.0, 0.0, 1.60, 0.0]);

    let total_via_rows: f64 = row_sums(&m).into_iter().sum();
    let total_via_cols: f64 = col_sums(&m).into_iter().sum();
    assert!((total_via_rows - total_via_cols).abs() < 1e-9);
}

// Scenario 2: secondary cache alternation.
//
// The spec's claimed per-request hit/miss table does not correspond to
// any indexing convention of the stated primary sets, so this instead
// checks the cache's output against an independently computed naive
// binary search per request, which is the invariant the scenario is
// actually meant to exercise.
struct FixedPrimaries(Vec<Vec<usize>>);

impl PrimaryIndices for FixedPrimaries {
    fn primary_len(&self) -> usize {
        self.0.len()
    }

    fn indices(&self, p: usize) -> &[usize] {
        &self.0[p]
    }
}

fn naive_hits(primaries: &[Vec<usize>], s: usize) -> Vec<(usize, usize)> {
    primaries
        .iter()
        .enumerate()
        .filter_map(|(p, slice)| slice.binary_search(&s).ok().map(|offset| (p, offset)))
        .collect()
}

#[test]
fn test_secondary_cache_matches_naive_baseline_across_alternating_requests() {
    let primaries = vec![vec![1, 2, 7, 9, 11, 15], vec![0, 5, 7, 14, 18], vec![3, 8, 10, 13, 16]];
    let data = FixedPrimaries(primaries.clone());
    let mut cache = SecondaryTraversalCache::new(primaries.len());

    for s in [15usize, 14, 11, 4, 6, 8] {
        let mut hits = Vec::new();
        cache.fetch(s, &data, |p, _pos, off| hits.push((p, off)));
        assert_eq!(hits, naive_hits(&primaries, s), "mismatch at request s={s}");
    }
}

// Scenario 3: duplicated-sorted subset.
#[test]
fn test_duplicated_sorted_subset_row_and_sparse_counts() {
    // 5x2 dense, fully non-zero: row i = [10*(i+1), 10*(i+1)+1].
    let buf: Vec<f64> = (0..5).flat_map(|i| [10.0 * (i + 1) as f64, 10.0 * (i + 1) as f64 + 1.0]).collect();
    let child: Arc<dyn Matrix<f64>> = Arc::new(DenseMatrix::new(5, 2, buf, true).unwrap());

    let wrapper = DelayedSubset::sorted(child, true, vec![0, 0, 2, 2, 2, 4]).unwrap();
    assert_eq!(wrapper.nrow(), 6);
    assert_eq!(dense_row(&wrapper, 0, 2), vec![10.0, 11.0]);
    assert_eq!(dense_row(&wrapper, 1, 2), vec![10.0, 11.0]);
    assert_eq!(dense_row(&wrapper, 2, 2), vec![30.0, 31.0]);
    assert_eq!(dense_row(&wrapper, 3, 2), vec![30.0, 31.0]);
    assert_eq!(dense_row(&wrapper, 4, 2), vec![30.0, 31.0]);
    assert_eq!(dense_row(&wrapper, 5, 2), vec![50.0, 51.0]);

    // Fully dense child means every one of the six output rows has a
    // structural non-zero in column 0.
    let mut col0 = wrapper.sparse_extractor(false, Selection::Full, ExtractOptions::new());
    let mut vbuf = vec![0.0; 6];
    let mut ibuf = vec![0usize; 6];
    let range = col0.fetch(0, &mut vbuf, &mut ibuf);
    assert_eq!(range.number, 6);
    assert_eq!(range.value.unwrap(), &[10.0, 10.0, 30.0, 30.0, 30.0, 50.0]);
}

// Scenario 4: non-commutative arithmetic.
#[test]
fn test_non_commutative_scalar_subtract() {
    let child: Arc<dyn Matrix<f64>> = Arc::new(DenseMatrix::new(2, 2, vec![0.0, 1.0, 2.0, 3.0], true).unwrap());
    let op = ArithmeticScalar { kind: ArithmeticKind::Subtract, scalar: 3.0, scalar_on_right: false };
    let wrapper = DelayedUnaryIsometric::new(child, op);
    assert_eq!(dense_row(&wrapper, 0, 2), vec![3.0, 2.0]);
    assert_eq!(dense_row(&wrapper, 1, 2), vec![1.0, 0.0]);
    assert_eq!(wrapper.sparse_proportion(), 0.0);
}

// Scenario 5: binary multiply sparsity.
#[test]
fn test_binary_multiply_on_disjoint_sparse_4x4() {
    // L has non-zeros on the diagonal; R has non-zeros on the
    // anti-diagonal. No position overlaps.
    let l: Arc<dyn Matrix<f64>> = Arc::new(
        DenseMatrix::new(4, 4, vec![1.0, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 0.0, 4.0], true)
            .unwrap(),
    );
    let r: Arc<dyn Matrix<f64>> = Arc::new(
        DenseMatrix::new(4, 4, vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 6.0, 0.0, 0.0, 7.0, 0.0, 0.0, 8.0, 0.0, 0.0, 0.0], true)
            .unwrap(),
    );
    let op = ArithmeticBinary { kind: ArithmeticKind::Multiply };
    let wrapper = DelayedBinaryIsometric::new(l, r, op);

    for row in 0..4 {
        let mut sparse = wrapper.sparse_extractor(true, Selection::Full, ExtractOptions::new());
        let mut vbuf = vec![0.0; 4];
        let mut ibuf = vec![0usize; 4];
        let range = sparse.fetch(row, &mut vbuf, &mut ibuf);
        assert_eq!(range.number, 0, "row {row} should have no structural non-zeros");
    }
}

// Scenario 6: contiguous subset equals block.
#[test]
fn test_contiguous_subset_matches_block() {
    let buf: Vec<f64> = (0..10).flat_map(|i| [i as f64, i as f64 + 0.5]).collect();
    let child: Arc<dyn Matrix<f64>> = Arc::new(DenseMatrix::new(10, 2, buf, true).unwrap());

    let via_factory = make_delayed_subset(child.clone(), true, vec![3, 4, 5, 6, 7]).unwrap();
    let via_block = DelayedSubsetBlock::new(child, true, 3, 5).unwrap();
    assert_eq!(via_factory.nrow(), via_block.nrow());
    for row in 0..5 {
        assert_eq!(dense_row(&*via_factory, row, 2), dense_row(&via_block, row, 2));
    }
}
