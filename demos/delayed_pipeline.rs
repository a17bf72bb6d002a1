// SPDX-License-Identifier: MIT
// Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
use std::sync::Arc;

use deep_causality_matrix::delayed::ops::{ArithmeticKind, ArithmeticScalar, ComparisonBinary, ComparisonKind};
use deep_causality_matrix::delayed::{DelayedBinaryIsometric, DelayedSubset, DelayedUnaryIsometric};
use deep_causality_matrix::{DenseExtractor, DenseMatrix, ExtractOptions, Matrix, Selection};

pub fn main() {
    // A 4x3 dense matrix, row-major:
    //     [ 1  2  3 ]
    //     [ 4  5  6 ]
    //     [ 7  8  9 ]
    //     [10 11 12 ]
    let base: Arc<dyn Matrix<f64>> = Arc::new(
        DenseMatrix::new(4, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0], true).unwrap(),
    );

    // Every node in a delayed chain is an `Arc<dyn Matrix<V>>`: nothing
    // below is ever materialized until a fetch asks for it.
    let doubled: Arc<dyn Matrix<f64>> = Arc::new(DelayedUnaryIsometric::new(
        base.clone(),
        ArithmeticScalar { kind: ArithmeticKind::Multiply, scalar: 2.0, scalar_on_right: true },
    ));

    // Reverse the row order and drop row 1 via an arbitrary (unsorted,
    // non-unique-free) index list.
    let reordered: Arc<dyn Matrix<f64>> = Arc::new(DelayedSubset::general(doubled, true, vec![3, 0, 2]).unwrap());
    assert_eq!(reordered.nrow(), 3);

    let mut extractor = reordered.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 3];
    assert_eq!(extractor.fetch(0, &mut buf), &[20.0, 22.0, 24.0]); // 2x original row 3
    assert_eq!(extractor.fetch(1, &mut buf), &[2.0, 4.0, 6.0]); // 2x original row 0
    assert_eq!(extractor.fetch(2, &mut buf), &[14.0, 16.0, 18.0]); // 2x original row 2
    drop(extractor);

    // Compare the reordered-and-doubled matrix against a constant
    // threshold, element-wise, with the comparison folded in lazily too.
    let threshold: Arc<dyn Matrix<f64>> = Arc::new(
        DenseMatrix::new(3, 3, vec![15.0; 9], true).unwrap(),
    );
    let above_threshold: Arc<dyn Matrix<f64>> =
        Arc::new(DelayedBinaryIsometric::new(reordered, threshold, ComparisonBinary { kind: ComparisonKind::Greater }));

    let mut cmp = above_threshold.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut cmp_buf = vec![0.0; 3];
    assert_eq!(cmp.fetch(0, &mut cmp_buf), &[1.0, 1.0, 1.0]); // 20,22,24 all > 15
    assert_eq!(cmp.fetch(1, &mut cmp_buf), &[0.0, 0.0, 0.0]); // 2,4,6 all <= 15
    assert_eq!(cmp.fetch(2, &mut cmp_buf), &[0.0, 1.0, 1.0]); // 14 <= 15, 16,18 > 15

    // None of the intermediate nodes (`doubled`, `reordered`, `threshold`)
    // were ever asked to produce a full dense copy of themselves; every
    // fetch above walked the chain on demand, one row at a time.
}
