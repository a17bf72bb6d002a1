/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Reduction kernels built purely on top of the public [`Matrix`] /
//! extractor API, with no special access to backend internals — the same
//! parallelisable-extractor-per-worker pattern described for consumers.

use std::ops::Add;

use num_traits::Zero;

use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::traits::Matrix;

/// Sum of every row, using the sparse extractor so all-zero rows cost
/// nothing beyond a single `fetch` call.
pub fn row_sums<V: Copy + PartialEq + Zero + Add<Output = V> + Send + Sync>(matrix: &dyn Matrix<V>) -> Vec<V> {
    reduce(matrix, true)
}

/// Sum of every column.
pub fn col_sums<V: Copy + PartialEq + Zero + Add<Output = V> + Send + Sync>(matrix: &dyn Matrix<V>) -> Vec<V> {
    reduce(matrix, false)
}

fn reduce<V: Copy + PartialEq + Zero + Add<Output = V> + Send + Sync>(matrix: &dyn Matrix<V>, row: bool) -> Vec<V> {
    let primary_dim = if row { matrix.nrow() } else { matrix.ncol() };
    let secondary_dim = if row { matrix.ncol() } else { matrix.nrow() };
    let mut extractor = matrix.sparse_extractor(row, Selection::Full, ExtractOptions::with_values_only());
    let mut value_buf = vec![V::zero(); secondary_dim];
    let mut index_buf = vec![0usize; secondary_dim];
    (0..primary_dim)
        .map(|i| {
            let range = extractor.fetch(i, &mut value_buf, &mut index_buf);
            range.value.unwrap_or(&[]).iter().fold(V::zero(), |acc, &v| acc + v)
        })
        .collect()
}
