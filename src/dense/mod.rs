/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::sync::Arc;

use num_traits::Zero;

use crate::compressed::CompressedSparseMatrix;
use crate::error::MatrixError;
use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::sparse_range::SparseRange;
use crate::traits::{DenseExtractor, Matrix, SparseExtractor};

/// A concrete dense matrix over a single contiguous buffer, row-major or
/// column-major.
///
/// Every delayed wrapper eventually bottoms out on a concrete leaf; this is
/// the simplest one, carrying no conversion machinery beyond the `From`
/// impls below.
#[derive(Debug, Clone)]
pub struct DenseMatrix<V> {
    nrow: usize,
    ncol: usize,
    buffer: Arc<[V]>,
    row_major: bool,
}

impl<V: Copy> DenseMatrix<V> {
    pub fn new(nrow: usize, ncol: usize, buffer: Vec<V>, row_major: bool) -> Result<Self, MatrixError> {
        let expected = nrow * ncol;
        if buffer.len() != expected {
            return Err(MatrixError::PointerLengthMismatch(expected, buffer.len()));
        }
        Ok(Self {
            nrow,
            ncol,
            buffer: buffer.into(),
            row_major,
        })
    }

    #[inline]
    fn index_of(&self, r: usize, c: usize) -> usize {
        if self.row_major {
            r * self.ncol + c
        } else {
            c * self.nrow + r
        }
    }

    #[inline]
    fn get(&self, r: usize, c: usize) -> V {
        self.buffer[self.index_of(r, c)]
    }

    fn secondary_len(&self, row: bool) -> usize {
        if row { self.ncol } else { self.nrow }
    }

    fn selection_indices(&self, row: bool, selection: &Selection) -> Vec<usize> {
        let full_len = self.secondary_len(row);
        match selection {
            Selection::Full => (0..full_len).collect(),
            Selection::Block { start, length } => (*start..*start + *length).collect(),
            Selection::Index(idx) => idx.to_vec(),
        }
    }

    /// The storage is contiguous along its primary dimension (rows when
    /// row-major, columns otherwise); a `Full` request along that same
    /// direction can therefore hand back a pointer into `buffer` instead of
    /// copying.
    fn is_primary_full(&self, row: bool, selection: &Selection) -> bool {
        matches!(selection, Selection::Full) && row == self.row_major
    }
}

struct DenseMatrixExtractor<'a, V> {
    matrix: &'a DenseMatrix<V>,
    row: bool,
    indices: Vec<usize>,
    primary_full: bool,
}

impl<'a, V: Copy> DenseExtractor<V> for DenseMatrixExtractor<'a, V> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        if self.primary_full {
            let stride = self.matrix.secondary_len(self.row);
            let start = i * stride;
            return &self.matrix.buffer[start..start + stride];
        }
        for (pos, &secondary) in self.indices.iter().enumerate() {
            let (r, c) = if self.row { (i, secondary) } else { (secondary, i) };
            buffer[pos] = self.matrix.get(r, c);
        }
        &buffer[..self.indices.len()]
    }
}

struct DenseMatrixSparseExtractor<'a, V> {
    matrix: &'a DenseMatrix<V>,
    row: bool,
    indices: Vec<usize>,
    options: ExtractOptions,
}

impl<'a, V: Copy + PartialEq + Zero> SparseExtractor<V> for DenseMatrixSparseExtractor<'a, V> {
    fn len(&self) -> usize {
        self.indices.len()
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
        let mut n = 0;
        for (pos, &secondary) in self.indices.iter().enumerate() {
            let (r, c) = if self.row { (i, secondary) } else { (secondary, i) };
            let value = self.matrix.get(r, c);
            if value.is_zero() {
                continue;
            }
            if self.options.sparse_extract_value {
                value_buffer[n] = value;
            }
            if self.options.sparse_extract_index {
                index_buffer[n] = pos;
            }
            n += 1;
        }
        SparseRange::new(
            self.options.sparse_extract_value.then(|| &value_buffer[..n]),
            self.options.sparse_extract_index.then(|| &index_buffer[..n]),
        )
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for DenseMatrix<V> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn sparse_proportion(&self) -> f64 {
        0.0
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
        let primary_full = self.is_primary_full(row, &selection);
        let indices = self.selection_indices(row, &selection);
        Box::new(DenseMatrixExtractor {
            matrix: self,
            row,
            indices,
            primary_full,
        })
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_> {
        let indices = self.selection_indices(row, &selection);
        Box::new(DenseMatrixSparseExtractor {
            matrix: self,
            row,
            indices,
            options,
        })
    }
}

/// Materializes a compressed-sparse matrix into row-major dense storage by
/// walking its rows through the public extractor API.
impl<V: Copy + PartialEq + Zero + Send + Sync> From<&CompressedSparseMatrix<V>> for DenseMatrix<V> {
    fn from(sparse: &CompressedSparseMatrix<V>) -> Self {
        let nrow = sparse.nrow();
        let ncol = sparse.ncol();
        let mut buffer = vec![V::zero(); nrow * ncol];
        let mut extractor = sparse.dense_extractor(true, Selection::Full, ExtractOptions::new());
        let mut row_buf = vec![V::zero(); ncol];
        for r in 0..nrow {
            let row = extractor.fetch(r, &mut row_buf);
            buffer[r * ncol..(r + 1) * ncol].copy_from_slice(row);
        }
        DenseMatrix::new(nrow, ncol, buffer, true).expect("buffer length matches nrow * ncol by construction")
    }
}
