/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Composition primitives: stacking matrices along an axis, casting element
//! types, transposing, and fabricating a constant-valued matrix.

use std::marker::PhantomData;
use std::sync::Arc;

use num_traits::{NumCast, Zero};

use crate::error::MatrixError;
use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::sparse_range::SparseRange;
use crate::traits::{DenseExtractor, Matrix, SparseExtractor};

/// Stacks matrices along one axis. All children must agree on the
/// perpendicular dimension; sparsity is reported as the weighted average of
/// the children's own proportions.
pub struct DelayedBind<V> {
    children: Vec<Arc<dyn Matrix<V>>>,
    along_row: bool,
    /// Cumulative offsets: child `c` owns along-indices
    /// `[offsets[c], offsets[c + 1])`.
    offsets: Vec<usize>,
}

impl<V> DelayedBind<V> {
    pub fn new(children: Vec<Arc<dyn Matrix<V>>>, along_row: bool) -> Result<Self, MatrixError> {
        if children.is_empty() {
            return Err(MatrixError::EmptyMatrix);
        }
        let perp = |m: &Arc<dyn Matrix<V>>| if along_row { m.ncol() } else { m.nrow() };
        let expected = perp(&children[0]);
        for child in &children[1..] {
            let actual = perp(child);
            if actual != expected {
                let shape_of = |m: &Arc<dyn Matrix<V>>| (m.nrow(), m.ncol());
                return Err(MatrixError::ShapeMismatch(shape_of(&children[0]), shape_of(child)));
            }
        }
        let along = |m: &Arc<dyn Matrix<V>>| if along_row { m.nrow() } else { m.ncol() };
        let mut offsets = Vec::with_capacity(children.len() + 1);
        offsets.push(0);
        for child in &children {
            offsets.push(offsets.last().unwrap() + along(child));
        }
        Ok(Self { children, along_row, offsets })
    }

    fn locate(&self, i: usize) -> (usize, usize) {
        let child = self.offsets.partition_point(|&o| o <= i) - 1;
        (child, i - self.offsets[child])
    }

    /// Restricts a selection over the full stacked (along) dimension to the
    /// window owned by child `c`, translating it into that child's own
    /// coordinates. Returns the child-local selection plus the position,
    /// within the combined output, where that child's contribution begins —
    /// `Full`/`Block` preserve the order of the stacked dimension, and
    /// `Index` relies on the same ascending-and-per-child-contiguous
    /// assumption the compressed backends already make about index lists.
    fn child_selection(&self, c: usize, selection: &Selection) -> (Selection, usize) {
        let start = self.offsets[c];
        let end = self.offsets[c + 1];
        match selection {
            Selection::Full => (Selection::Full, start),
            Selection::Block { start: bstart, length } => {
                let bend = bstart + length;
                let lo = start.max(*bstart);
                let hi = end.min(bend);
                let len = hi.saturating_sub(lo);
                (Selection::Block { start: lo - start, length: len }, lo - bstart)
            }
            Selection::Index(idx) => {
                let lo = idx.partition_point(|&x| x < start);
                let hi = idx.partition_point(|&x| x < end);
                let local: Vec<usize> = idx[lo..hi].iter().map(|&x| x - start).collect();
                (Selection::Index(local.into()), lo)
            }
        }
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for DelayedBind<V> {
    fn nrow(&self) -> usize {
        if self.along_row { *self.offsets.last().unwrap() } else { self.children[0].nrow() }
    }

    fn ncol(&self) -> usize {
        if self.along_row { self.children[0].ncol() } else { *self.offsets.last().unwrap() }
    }

    fn sparse_proportion(&self) -> f64 {
        let total: usize = *self.offsets.last().unwrap();
        if total == 0 {
            return 0.0;
        }
        self.children
            .iter()
            .zip(self.offsets.windows(2))
            .map(|(c, w)| c.sparse_proportion() * (w[1] - w[0]) as f64)
            .sum::<f64>()
            / total as f64
    }

    fn prefer_rows_proportion(&self) -> f64 {
        self.children.iter().map(|c| c.prefer_rows_proportion()).sum::<f64>() / self.children.len() as f64
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.children.iter().any(|c| c.uses_oracle(row))
    }

    fn dense_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn DenseExtractor<V> + '_> {
        if row == self.along_row {
            Box::new(BindAlongDenseExtractor {
                bind: self,
                selection,
                options,
            })
        } else {
            // The perpendicular dimension spans every child: a column (say)
            // of a row-stacked bind is the concatenation of each child's own
            // column, in stacking order.
            let total = *self.offsets.last().unwrap();
            let len = selection.len(total);
            Box::new(BindAcrossDenseExtractor {
                bind: self,
                row,
                selection,
                options,
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
        if row == self.along_row {
            Box::new(BindAlongSparseExtractor {
                bind: self,
                selection,
                options,
            })
        } else {
            let total = *self.offsets.last().unwrap();
            let len = selection.len(total);
            Box::new(BindAcrossSparseExtractor {
                bind: self,
                row,
                selection,
                options,
                len,
            })
        }
    }
}

struct BindAcrossDenseExtractor<'a, V> {
    bind: &'a DelayedBind<V>,
    row: bool,
    selection: Selection,
    options: ExtractOptions,
    len: usize,
}

impl<'a, V: Copy + PartialEq + Zero> DenseExtractor<V> for BindAcrossDenseExtractor<'a, V> {
    fn len(&self) -> usize {
        self.len
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        for c in 0..self.bind.children.len() {
            let (child_selection, out_offset) = self.bind.child_selection(c, &self.selection);
            let child_full = if self.row { self.bind.children[c].ncol() } else { self.bind.children[c].nrow() };
            let child_len = child_selection.len(child_full);
            if child_len == 0 {
                continue;
            }
            let mut extractor = self.bind.children[c].dense_extractor(self.row, child_selection, self.options);
            let mut scratch = vec![V::zero(); child_len];
            let result = extractor.fetch(i, &mut scratch);
            buffer[out_offset..out_offset + child_len].copy_from_slice(result);
        }
        &buffer[..self.len]
    }
}

struct BindAcrossSparseExtractor<'a, V> {
    bind: &'a DelayedBind<V>,
    row: bool,
    selection: Selection,
    options: ExtractOptions,
    len: usize,
}

impl<'a, V: Copy + PartialEq + Zero> SparseExtractor<V> for BindAcrossSparseExtractor<'a, V> {
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
        for c in 0..self.bind.children.len() {
            let (child_selection, out_offset) = self.bind.child_selection(c, &self.selection);
            let child_full = if self.row { self.bind.children[c].ncol() } else { self.bind.children[c].nrow() };
            let child_len = child_selection.len(child_full);
            if child_len == 0 {
                continue;
            }
            let mut extractor = self.bind.children[c].sparse_extractor(self.row, child_selection, self.options);
            let mut vscratch = vec![V::zero(); child_len];
            let mut iscratch = vec![0usize; child_len];
            let range = extractor.fetch(i, &mut vscratch, &mut iscratch);
            let count = range.number;
            if let Some(values) = range.value {
                value_buffer[n..n + count].copy_from_slice(values);
            }
            if let Some(idx) = range.index {
                for (k, &local_idx) in idx.iter().enumerate() {
                    index_buffer[n + k] = out_offset + local_idx;
                }
            }
            n += count;
        }
        SparseRange::new(
            self.options.sparse_extract_value.then(|| &value_buffer[..n]),
            self.options.sparse_extract_index.then(|| &index_buffer[..n]),
        )
    }
}

struct BindAlongDenseExtractor<'a, V> {
    bind: &'a DelayedBind<V>,
    selection: Selection,
    options: ExtractOptions,
}

impl<'a, V: Copy + PartialEq + Zero> DenseExtractor<V> for BindAlongDenseExtractor<'a, V> {
    fn len(&self) -> usize {
        let full = if self.bind.along_row { self.bind.children[0].ncol() } else { self.bind.children[0].nrow() };
        self.selection.len(full)
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        let (child_idx, local_i) = self.bind.locate(i);
        let mut extractor = self.bind.children[child_idx].dense_extractor(
            self.bind.along_row,
            self.selection.clone(),
            self.options,
        );
        let result = extractor.fetch(local_i, buffer);
        buffer[..result.len()].copy_from_slice(result);
        &buffer[..result.len()]
    }
}

struct BindAlongSparseExtractor<'a, V> {
    bind: &'a DelayedBind<V>,
    selection: Selection,
    options: ExtractOptions,
}

impl<'a, V: Copy + PartialEq> SparseExtractor<V> for BindAlongSparseExtractor<'a, V> {
    fn len(&self) -> usize {
        let full = if self.bind.along_row { self.bind.children[0].ncol() } else { self.bind.children[0].nrow() };
        self.selection.len(full)
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
        let (child_idx, local_i) = self.bind.locate(i);
        let mut extractor = self.bind.children[child_idx].sparse_extractor(
            self.bind.along_row,
            self.selection.clone(),
            self.options,
        );
        let range = extractor.fetch(local_i, value_buffer, index_buffer);
        let n = range.number;
        SparseRange::new(
            self.options.sparse_extract_value.then(|| &value_buffer[..n]),
            self.options.sparse_extract_index.then(|| &index_buffer[..n]),
        )
    }
}

/// Translates the value type of a child matrix element-wise through
/// `NumCast`, and reindexes nothing (shape is unchanged).
pub struct DelayedCast<V, W> {
    child: Arc<dyn Matrix<V>>,
    _marker: PhantomData<W>,
}

impl<V, W> DelayedCast<V, W> {
    pub fn new(child: Arc<dyn Matrix<V>>) -> Self {
        Self { child, _marker: PhantomData }
    }
}

struct CastDenseExtractor<'a, V, W> {
    child: Box<dyn DenseExtractor<V> + 'a>,
    _marker: PhantomData<W>,
}

impl<'a, V: Copy + NumCast, W: Copy + NumCast> DenseExtractor<W> for CastDenseExtractor<'a, V, W> {
    fn len(&self) -> usize {
        self.child.len()
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [W]) -> &'b [W]
    where
        W: 'b,
    {
        let mut scratch = vec![NumCast::from(0).unwrap(); buffer.len()];
        let result = self.child.fetch(i, &mut scratch);
        for (pos, &v) in result.iter().enumerate() {
            buffer[pos] = W::from(v).expect("value out of range for cast target type");
        }
        &buffer[..self.len()]
    }
}

struct CastSparseExtractor<'a, V, W> {
    child: Box<dyn SparseExtractor<V> + 'a>,
    _marker: PhantomData<W>,
}

impl<'a, V: Copy + NumCast, W: Copy + NumCast> SparseExtractor<W> for CastSparseExtractor<'a, V, W> {
    fn len(&self) -> usize {
        self.child.len()
    }

    fn fetch<'b>(
        &mut self,
        i: usize,
        value_buffer: &'b mut [W],
        index_buffer: &'b mut [usize],
    ) -> SparseRange<'b, W>
    where
        W: 'b,
    {
        let mut vscratch = vec![NumCast::from(0).unwrap(); value_buffer.len()];
        let range = self.child.fetch(i, &mut vscratch, index_buffer);
        let n = range.value.map(|v| v.len()).unwrap_or(0);
        if let Some(values) = range.value {
            for (pos, &v) in values.iter().enumerate() {
                value_buffer[pos] = W::from(v).expect("value out of range for cast target type");
            }
        }
        SparseRange::new(Some(&value_buffer[..n]), range.index)
    }
}

impl<V: Copy + PartialEq + Zero + NumCast + Send + Sync + 'static, W: Copy + PartialEq + Zero + NumCast + Send + Sync>
    Matrix<W> for DelayedCast<V, W>
{
    fn nrow(&self) -> usize {
        self.child.nrow()
    }

    fn ncol(&self) -> usize {
        self.child.ncol()
    }

    fn sparse_proportion(&self) -> f64 {
        self.child.sparse_proportion()
    }

    fn prefer_rows_proportion(&self) -> f64 {
        self.child.prefer_rows_proportion()
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.child.uses_oracle(row)
    }

    fn dense_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn DenseExtractor<W> + '_> {
        Box::new(CastDenseExtractor {
            child: self.child.dense_extractor(row, selection, options),
            _marker: PhantomData,
        })
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<W> + '_> {
        Box::new(CastSparseExtractor {
            child: self.child.sparse_extractor(row, selection, options),
            _marker: PhantomData,
        })
    }
}

/// Swaps the row and column extractors of its child: `transpose.nrow() ==
/// child.ncol()` and every `row` flag handed to the child is flipped.
pub struct DelayedTranspose<V> {
    child: Arc<dyn Matrix<V>>,
}

impl<V> DelayedTranspose<V> {
    pub fn new(child: Arc<dyn Matrix<V>>) -> Self {
        Self { child }
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for DelayedTranspose<V> {
    fn nrow(&self) -> usize {
        self.child.ncol()
    }

    fn ncol(&self) -> usize {
        self.child.nrow()
    }

    fn sparse_proportion(&self) -> f64 {
        self.child.sparse_proportion()
    }

    fn prefer_rows_proportion(&self) -> f64 {
        1.0 - self.child.prefer_rows_proportion()
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.child.uses_oracle(!row)
    }

    fn dense_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn DenseExtractor<V> + '_> {
        self.child.dense_extractor(!row, selection, options)
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_> {
        self.child.sparse_extractor(!row, selection, options)
    }
}

/// A matrix that returns the same scalar everywhere; sparse if the
/// constant is zero.
pub struct ConstantMatrix<V> {
    nrow: usize,
    ncol: usize,
    value: V,
}

impl<V> ConstantMatrix<V> {
    pub fn new(nrow: usize, ncol: usize, value: V) -> Self {
        Self { nrow, ncol, value }
    }
}

struct ConstantDenseExtractor<V> {
    value: V,
    len: usize,
}

impl<V: Copy> DenseExtractor<V> for ConstantDenseExtractor<V> {
    fn len(&self) -> usize {
        self.len
    }

    fn fetch<'b>(&mut self, _i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        for slot in buffer[..self.len].iter_mut() {
            *slot = self.value;
        }
        &buffer[..self.len]
    }
}

struct ConstantSparseExtractor<V> {
    value: V,
    len: usize,
    options: ExtractOptions,
}

impl<V: Copy + PartialEq + Zero> SparseExtractor<V> for ConstantSparseExtractor<V> {
    fn len(&self) -> usize {
        self.len
    }

    fn fetch<'b>(
        &mut self,
        _i: usize,
        value_buffer: &'b mut [V],
        index_buffer: &'b mut [usize],
    ) -> SparseRange<'b, V>
    where
        V: 'b,
    {
        if self.value.is_zero() {
            return SparseRange::empty();
        }
        for pos in 0..self.len {
            if self.options.sparse_extract_value {
                value_buffer[pos] = self.value;
            }
            if self.options.sparse_extract_index {
                index_buffer[pos] = pos;
            }
        }
        SparseRange::new(
            self.options.sparse_extract_value.then(|| &value_buffer[..self.len]),
            self.options.sparse_extract_index.then(|| &index_buffer[..self.len]),
        )
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for ConstantMatrix<V> {
    fn nrow(&self) -> usize {
        self.nrow
    }

    fn ncol(&self) -> usize {
        self.ncol
    }

    fn sparse_proportion(&self) -> f64 {
        if self.value.is_zero() { 1.0 } else { 0.0 }
    }

    fn prefer_rows_proportion(&self) -> f64 {
        0.5
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
        let full = if row { self.ncol } else { self.nrow };
        Box::new(ConstantDenseExtractor { value: self.value, len: selection.len(full) })
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_> {
        let full = if row { self.ncol } else { self.nrow };
        Box::new(ConstantSparseExtractor { value: self.value, len: selection.len(full), options })
    }
}
