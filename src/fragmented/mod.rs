/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Fragmented-sparse storage: each primary element owns an independent
//! `(values, indices)` pair rather than sharing a single backing array.
//! Slower to build (no shared allocation), but cheap to build incrementally
//! one primary element at a time, unlike the compressed layout.

use num_traits::Zero;

use crate::error::MatrixError;
use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::sparse_range::SparseRange;
use crate::traits::{DenseExtractor, Matrix, SparseExtractor};
use crate::traversal_cache::{PrimaryIndices, SecondaryTraversalCache};

#[derive(Debug, Clone)]
pub struct FragmentedSparseMatrix<V> {
    nrow: usize,
    ncol: usize,
    row_major: bool,
    /// One `(values, indices)` pair per primary element, indices sorted
    /// ascending within each pair.
    primary: Vec<(Vec<V>, Vec<usize>)>,
}

impl<V: Copy> FragmentedSparseMatrix<V> {
    pub fn new(
        nrow: usize,
        ncol: usize,
        primary: Vec<(Vec<V>, Vec<usize>)>,
        row_major: bool,
        check: bool,
    ) -> Result<Self, MatrixError> {
        let primary_dim = if row_major { nrow } else { ncol };
        let secondary_dim = if row_major { ncol } else { nrow };

        if primary.len() != primary_dim {
            return Err(MatrixError::PointerLengthMismatch(primary_dim, primary.len()));
        }

        if check {
            for (p, (values, indices)) in primary.iter().enumerate() {
                if values.len() != indices.len() {
                    return Err(MatrixError::PointerLengthMismatch(values.len(), indices.len()));
                }
                for (pos, window) in indices.windows(2).enumerate() {
                    if window[0] >= window[1] {
                        return Err(MatrixError::UnsortedIndices(p, pos + 1));
                    }
                }
                if let Some(&last) = indices.last() {
                    if last >= secondary_dim {
                        return Err(MatrixError::IndexOutOfBounds(last, secondary_dim));
                    }
                }
            }
        }

        Ok(Self {
            nrow,
            ncol,
            row_major,
            primary,
        })
    }

    fn is_primary(&self, row: bool) -> bool {
        row == self.row_major
    }

    fn slice(&self, p: usize) -> (&[V], &[usize]) {
        let (values, indices) = &self.primary[p];
        (values, indices)
    }

    fn selection_ids(&self, full_len: usize, selection: &Selection) -> Vec<usize> {
        match selection {
            Selection::Full => (0..full_len).collect(),
            Selection::Block { start, length } => (*start..*start + *length).collect(),
            Selection::Index(idx) => idx.to_vec(),
        }
    }
}

struct SelectedPrimaries<'a, V> {
    matrix: &'a FragmentedSparseMatrix<V>,
    ids: &'a [usize],
}

impl<'a, V: Copy> PrimaryIndices for SelectedPrimaries<'a, V> {
    fn primary_len(&self) -> usize {
        self.ids.len()
    }

    fn indices(&self, p: usize) -> &[usize] {
        self.matrix.slice(self.ids[p]).1
    }
}

enum Extraction {
    Primary { secondary: Selection },
    Secondary { primaries: Vec<usize> },
}

struct FragDenseExtractor<'a, V> {
    matrix: &'a FragmentedSparseMatrix<V>,
    extraction: Extraction,
    cache: Option<SecondaryTraversalCache>,
    len: usize,
}

impl<'a, V: Copy + Zero> DenseExtractor<V> for FragDenseExtractor<'a, V> {
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
                let (values, indices) = self.matrix.slice(i);
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
                    let (values, _) = self.matrix.slice(primaries[primary_pos]);
                    buffer[primary_pos] = values[offset];
                });
            }
        }
        &buffer[..self.len]
    }
}

struct FragSparseExtractor<'a, V> {
    matrix: &'a FragmentedSparseMatrix<V>,
    extraction: Extraction,
    cache: Option<SecondaryTraversalCache>,
    len: usize,
    options: ExtractOptions,
}

impl<'a, V: Copy> SparseExtractor<V> for FragSparseExtractor<'a, V> {
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
                let (values, indices) = self.matrix.slice(i);
                match secondary {
                    Selection::Full => {
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
                    let (values, _) = self.matrix.slice(primaries[primary_pos]);
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

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for FragmentedSparseMatrix<V> {
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
            Box::new(FragDenseExtractor {
                matrix: self,
                extraction: Extraction::Primary { secondary: selection },
                cache: None,
                len,
            })
        } else {
            let primary_full = full_len;
            let primaries = self.selection_ids(primary_full, &selection);
            let cache = SecondaryTraversalCache::new(primaries.len());
            Box::new(FragDenseExtractor {
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
            Box::new(FragSparseExtractor {
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
            Box::new(FragSparseExtractor {
                matrix: self,
                extraction: Extraction::Secondary { primaries },
                cache: Some(cache),
                len,
                options,
            })
        }
    }
}
