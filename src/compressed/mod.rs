/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Compressed-sparse-row / compressed-sparse-column storage: three parallel
//! arrays (`values`, `indices`, `pointers`) plus a `row_major` flag that
//! decides which dimension is primary.

use std::sync::Arc;

use num_traits::Zero;

use crate::dense::DenseMatrix;
use crate::error::MatrixError;
use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::sparse_range::SparseRange;
use crate::traits::{DenseExtractor, Matrix, SparseExtractor};
use crate::traversal_cache::{PrimaryIndices, SecondaryTraversalCache};

/// A compressed-sparse matrix. `row_major = true` gives CSR (rows primary,
/// `pointers.len() == nrow + 1`); `row_major = false` gives CSC (columns
/// primary, `pointers.len() == ncol + 1`).
#[derive(Debug, Clone)]
pub struct CompressedSparseMatrix<V> {
    nrow: usize,
    ncol: usize,
    values: Arc<[V]>,
    indices: Arc<[usize]>,
    pointers: Arc<[usize]>,
    row_major: bool,
}

impl<V: Copy> CompressedSparseMatrix<V> {
    /// Validates the triple and constructs a matrix. `check` may be set to
    /// `false` by a caller that has already established the invariants
    /// elsewhere, skipping the O(nnz) verification pass.
    pub fn new(
        nrow: usize,
        ncol: usize,
        values: Vec<V>,
        indices: Vec<usize>,
        pointers: Vec<usize>,
        row_major: bool,
        check: bool,
    ) -> Result<Self, MatrixError> {
        let primary_dim = if row_major { nrow } else { ncol };
        let secondary_dim = if row_major { ncol } else { nrow };

        if pointers.len() != primary_dim + 1 {
            return Err(MatrixError::PointerLengthMismatch(primary_dim + 1, pointers.len()));
        }
        if values.len() != indices.len() {
            return Err(MatrixError::PointerLengthMismatch(values.len(), indices.len()));
        }

        if check {
            for p in 0..primary_dim {
                let (start, end) = (pointers[p], pointers[p + 1]);
                if start > end {
                    return Err(MatrixError::NonMonotonicPointers(p));
                }
                let slice = &indices[start..end];
                for (pos, window) in slice.windows(2).enumerate() {
                    if window[0] >= window[1] {
                        return Err(MatrixError::UnsortedIndices(p, pos + 1));
                    }
                }
                if let Some(&last) = slice.last() {
                    if last >= secondary_dim {
                        return Err(MatrixError::IndexOutOfBounds(last, secondary_dim));
                    }
                }
            }
        }

        Ok(Self {
            nrow,
            ncol,
            values: values.into(),
            indices: indices.into(),
            pointers: pointers.into(),
            row_major,
        })
    }

    fn primary_slice(&self, p: usize) -> (&[V], &[usize]) {
        let (start, end) = (self.pointers[p], self.pointers[p + 1]);
        (&self.values[start..end], &self.indices[start..end])
    }

    fn is_primary(&self, row: bool) -> bool {
        row == self.row_major
    }

    fn selection_ids(&self, full_len: usize, selection: &Selection) -> Vec<usize> {
        match selection {
            Selection::Full => (0..full_len).collect(),
            Selection::Block { start, length } => (*start..*start + *length).collect(),
            Selection::Index(idx) => idx.to_vec(),
        }
    }
}

/// Adapts a list of primary-element ids (the current selection along the
/// primary dimension) into the slice view the traversal cache needs.
struct SelectedPrimaries<'a, V> {
    matrix: &'a CompressedSparseMatrix<V>,
    ids: &'a [usize],
}

impl<'a, V: Copy> PrimaryIndices for SelectedPrimaries<'a, V> {
    fn primary_len(&self) -> usize {
        self.ids.len()
    }

    fn indices(&self, p: usize) -> &[usize] {
        self.matrix.primary_slice(self.ids[p]).1
    }
}

enum Extraction {
    /// Primary-direction: `i` selects a primary slice directly, `secondary`
    /// restricts which secondary positions are reported out of that slice.
    Primary { secondary: Selection },
    /// Secondary-direction: `i` is the secondary index being walked across
    /// `primaries`, one of which is consulted per fetch via the traversal
    /// cache.
    Secondary { primaries: Vec<usize> },
}

struct CsDenseExtractor<'a, V> {
    matrix: &'a CompressedSparseMatrix<V>,
    extraction: Extraction,
    cache: Option<SecondaryTraversalCache>,
    len: usize,
}

impl<'a, V: Copy + Zero> DenseExtractor<V> for CsDenseExtractor<'a, V> {
    fn len(&self) -> usize {
        self.len
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        for slot in buffer[..self.len].iter_mut() {
            *slot = V::zero();
        }
        match &self.extraction {
            Extraction::Primary { secondary } => {
                let (values, indices) = self.matrix.primary_slice(i);
                match secondary {
                    Selection::Full => {
                        for (&v, &idx) in values.iter().zip(indices) {
                            buffer[idx] = v;
                        }
                    }
                    Selection::Block { start, length } => {
                        let lo = indices.partition_point(|&x| x < *start);
                        let hi = indices.partition_point(|&x| x < *start + *length);
                        for (&v, &idx) in values[lo..hi].iter().zip(&indices[lo..hi]) {
                            buffer[idx - start] = v;
                        }
                    }
                    Selection::Index(requested) => {
                        let mut a = 0usize;
                        let mut b = 0usize;
                        while a < indices.len() && b < requested.len() {
                            if indices[a] < requested[b] {
                                a += 1;
                            } else if indices[a] > requested[b] {
                                b += 1;
                            } else {
                                buffer[b] = values[a];
                                a += 1;
                                b += 1;
                            }
                        }
                    }
                }
            }
            Extraction::Secondary { primaries } => {
                let view = SelectedPrimaries { matrix: self.matrix, ids: primaries };
                let cache = self.cache.as_mut().expect("secondary extractor always carries a cache");
                cache.fetch(i, &view, |primary_pos, _pos, offset| {
                    let (values, _) = self.matrix.primary_slice(primaries[primary_pos]);
                    buffer[primary_pos] = values[offset];
                });
            }
        }
        &buffer[..self.len]
    }
}

struct CsSparseExtractor<'a, V> {
    matrix: &'a CompressedSparseMatrix<V>,
    extraction: Extraction,
    cache: Option<SecondaryTraversalCache>,
    len: usize,
    options: ExtractOptions,
}

impl<'a, V: Copy> SparseExtractor<V> for CsSparseExtractor<'a, V> {
    fn len(&self) -> usize {
        self.len
    }

    fn fetch<'b>(
        &mut self,
        i: usize,
        value_buffer: &'b mut [V],
        index_buffer: &'b mut [usize],
    ) -> SparseRange<'b, V>
    where
        V: 'b,
    {
        let mut n = 0usize;
        match &self.extraction {
            Extraction::Primary { secondary } => {
                let (values, indices) = self.matrix.primary_slice(i);
                match secondary {
                    Selection::Full => {
                        // Zero-copy: hand back pointers straight into backing storage.
                        return SparseRange::new(
                            self.options.sparse_extract_value.then_some(values),
                            self.options.sparse_extract_index.then_some(indices),
                        );
                    }
                    Selection::Block { start, length } => {
                        let lo = indices.partition_point(|&x| x < *start);
                        let hi = indices.partition_point(|&x| x < *start + *length);
                        for (&v, &idx) in values[lo..hi].iter().zip(&indices[lo..hi]) {
                            if self.options.sparse_extract_value {
                                value_buffer[n] = v;
                            }
                            if self.options.sparse_extract_index {
                                index_buffer[n] = idx - start;
                            }
                            n += 1;
                        }
                    }
                    Selection::Index(requested) => {
                        let mut a = 0usize;
                        let mut b = 0usize;
                        while a < indices.len() && b < requested.len() {
                            if indices[a] < requested[b] {
                                a += 1;
                            } else if indices[a] > requested[b] {
                                b += 1;
                            } else {
                                if self.options.sparse_extract_value {
                                    value_buffer[n] = values[a];
                                }
                                if self.options.sparse_extract_index {
                                    index_buffer[n] = b;
                                }
                                n += 1;
                                a += 1;
                                b += 1;
                            }
                        }
                    }
                }
            }
            Extraction::Secondary { primaries } => {
                let view = SelectedPrimaries { matrix: self.matrix, ids: primaries };
                let cache = self.cache.as_mut().expect("secondary extractor always carries a cache");
                let options = self.options;
                cache.fetch(i, &view, |primary_pos, _pos, offset| {
                    let (values, _) = self.matrix.primary_slice(primaries[primary_pos]);
                    if options.sparse_extract_value {
                        value_buffer[n] = values[offset];
                    }
                    if options.sparse_extract_index {
                        index_buffer[n] = primary_pos;
                    }
                    n += 1;
                });
            }
        }
        SparseRange::new(
            self.options.sparse_extract_value.then(|| &value_buffer[..n]),
            self.options.sparse_extract_index.then(|| &index_buffer[..n]),
        )
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for CompressedSparseMatrix<V> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn sparse_proportion(&self) -> f64 {
        1.0
    }

    fn prefer_rows_proportion(&self) -> f64 {
        if self.row_major { 1.0 } else { 0.0 }
    }

    fn uses_oracle(&self, _row: bool) -> bool {
        false
    }

    fn dense_extractor(
        &self,
        row: bool,
        selection: Selection,
        _options: ExtractOptions,
    ) -> Box<dyn DenseExtractor<V> + '_> {
        let full_len = if row { self.ncol } else { self.nrow };
        let len = selection.len(full_len);
        if self.is_primary(row) {
            Box::new(CsDenseExtractor {
                matrix: self,
                extraction: Extraction::Primary { secondary: selection },
                cache: None,
                len,
            })
        } else {
            let primary_full = full_len;
            let primaries = self.selection_ids(primary_full, &selection);
            let cache = SecondaryTraversalCache::new(primaries.len());
            Box::new(CsDenseExtractor {
                matrix: self,
                extraction: Extraction::Secondary { primaries },
                cache: Some(cache),
                len,
            })
        }
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_> {
        let full_len = if row { self.ncol } else { self.nrow };
        let len = selection.len(full_len);
        if self.is_primary(row) {
            Box::new(CsSparseExtractor {
                matrix: self,
                extraction: Extraction::Primary { secondary: selection },
                cache: None,
                len,
                options,
            })
        } else {
            let primary_full = full_len;
            let primaries = self.selection_ids(primary_full, &selection);
            let cache = SecondaryTraversalCache::new(primaries.len());
            Box::new(CsSparseExtractor {
                matrix: self,
                extraction: Extraction::Secondary { primaries },
                cache: Some(cache),
                len,
                options,
            })
        }
    }
}

/// Type alias matching the teacher's `CsrMatrix` naming for the common
/// row-major case.
pub type CsrMatrix<V> = CompressedSparseMatrix<V>;

impl<V: Copy> CompressedSparseMatrix<V> {
    pub fn csr(
        nrow: usize,
        ncol: usize,
        values: Vec<V>,
        indices: Vec<usize>,
        pointers: Vec<usize>,
        check: bool,
    ) -> Result<Self, MatrixError> {
        Self::new(nrow, ncol, values, indices, pointers, true, check)
    }

    pub fn csc(
        nrow: usize,
        ncol: usize,
        values: Vec<V>,
        indices: Vec<usize>,
        pointers: Vec<usize>,
        check: bool,
    ) -> Result<Self, MatrixError> {
        Self::new(nrow, ncol, values, indices, pointers, false, check)
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn row_major(&self) -> bool {
        self.row_major
    }
}

/// Builds row-major CSR storage from a dense matrix by walking its rows
/// through the public extractor API and dropping zero entries.
impl<V: Copy + PartialEq + Zero + Send + Sync> From<&DenseMatrix<V>> for CompressedSparseMatrix<V> {
    fn from(dense: &DenseMatrix<V>) -> Self {
        let nrow = dense.nrow();
        let ncol = dense.ncol();
        let mut values = Vec::new();
        let mut indices = Vec::new();
        let mut pointers = Vec::with_capacity(nrow + 1);
        pointers.push(0);

        let mut extractor = dense.dense_extractor(true, Selection::Full, ExtractOptions::new());
        let mut row_buf = vec![V::zero(); ncol];
        for r in 0..nrow {
            let row = extractor.fetch(r, &mut row_buf);
            for (c, &v) in row.iter().enumerate() {
                if !v.is_zero() {
                    values.push(v);
                    indices.push(c);
                }
            }
            pointers.push(values.len());
        }

        CompressedSparseMatrix::csr(nrow, ncol, values, indices, pointers, false)
            .expect("indices collected in ascending column order and within bounds by construction")
    }
}
