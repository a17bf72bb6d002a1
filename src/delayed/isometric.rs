/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! Delayed unary and binary isometric operations: element-wise
//! transformations that preserve shape, evaluated lazily per extractor
//! fetch rather than materialised up front.

use std::sync::Arc;

use num_traits::Zero;

use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::sparse_range::SparseRange;
use crate::traits::{DenseExtractor, Matrix, SparseExtractor};

/// The contract an isometric operation supplies to the unary/binary
/// wrappers. Only the scalar kernel is mandatory; the sparsity-reasoning
/// methods default to the conservative "not sparse, no fast path" answer
/// so a minimal op is trivial to write, matching the concrete op families
/// below which override them precisely.
pub trait UnaryOp<V>: Send + Sync {
    fn apply(&self, row: bool, i: usize, secondary: usize, value: V) -> V;

    fn fill(&self, _row: bool, _i: usize) -> V
    where
        V: Zero,
    {
        V::zero()
    }

    fn is_sparse(&self) -> bool {
        false
    }

    fn zero_depends_on_row(&self) -> bool {
        false
    }

    fn zero_depends_on_column(&self) -> bool {
        false
    }
}

pub trait BinaryOp<V>: Send + Sync {
    fn apply(&self, left: V, right: V) -> V;

    fn fill(&self) -> V
    where
        V: Zero,
    {
        V::zero()
    }

    fn is_sparse(&self) -> bool {
        false
    }

    /// If `true`, a position present on only one side still contributes a
    /// call to `apply` (the absent side substituted with zero). If
    /// `false`, singleton positions are dropped from the sparse result
    /// outright (e.g. multiplication: anything times a structural zero is
    /// zero, so it need not even be visited).
    fn must_have_both(&self) -> bool {
        true
    }
}

/// `DelayedUnaryIsometric(child, op)`: presents a matrix of the same shape
/// as `child`, applying `op` element-wise.
pub struct DelayedUnaryIsometric<V, O> {
    child: Arc<dyn Matrix<V>>,
    op: O,
}

impl<V, O> DelayedUnaryIsometric<V, O> {
    pub fn new(child: Arc<dyn Matrix<V>>, op: O) -> Self {
        Self { child, op }
    }
}

struct UnaryDenseExtractor<'a, V, O> {
    child: Box<dyn DenseExtractor<V> + 'a>,
    op: &'a O,
    row: bool,
    secondary_offsets: Vec<usize>,
}

impl<'a, V: Copy, O: UnaryOp<V>> DenseExtractor<V> for UnaryDenseExtractor<'a, V, O> {
    fn len(&self) -> usize {
        self.child.len()
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        let mut scratch = Vec::with_capacity(buffer.len());
        scratch.extend_from_slice(self.child.fetch(i, buffer));
        for (pos, v) in scratch.into_iter().enumerate() {
            buffer[pos] = self.op.apply(self.row, i, self.secondary_offsets[pos], v);
        }
        &buffer[..self.len()]
    }
}

struct UnarySparseExtractor<'a, V, O> {
    child: Box<dyn SparseExtractor<V> + 'a>,
    op: &'a O,
    row: bool,
    sparse_preserving: bool,
    options: ExtractOptions,
}

impl<'a, V: Copy + PartialEq + Zero, O: UnaryOp<V>> SparseExtractor<V> for UnarySparseExtractor<'a, V, O> {
    fn len(&self) -> usize {
        self.child.len()
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
        let mut vbuf = vec![V::zero(); value_buffer.len()];
        let mut ibuf = vec![0usize; index_buffer.len()];
        let range = self.child.fetch(i, &mut vbuf, &mut ibuf);
        let values = range.value.unwrap_or(&[]);
        let indices = range.index.unwrap_or(&[]);

        if self.sparse_preserving {
            let mut n = 0;
            for (&v, &idx) in values.iter().zip(indices) {
                let out = self.op.apply(self.row, i, idx, v);
                if out.is_zero() {
                    continue;
                }
                value_buffer[n] = out;
                index_buffer[n] = idx;
                n += 1;
            }
            SparseRange::new(
                self.options.sparse_extract_value.then(|| &value_buffer[..n]),
                self.options.sparse_extract_index.then(|| &index_buffer[..n]),
            )
        } else {
            // Op does not preserve sparsity: every position in the
            // requested range is potentially non-zero after applying fill
            // to structural zeros, so a sparse view degenerates to the
            // dense one. Callers that need this path at scale should use
            // the dense extractor instead.
            let mut n = 0;
            let mut sparse_cursor = 0usize;
            for secondary in 0..self.len() {
                let stored = sparse_cursor < indices.len() && indices[sparse_cursor] == secondary;
                let out = if stored {
                    let v = values[sparse_cursor];
                    sparse_cursor += 1;
                    self.op.apply(self.row, i, secondary, v)
                } else {
                    self.op.fill(self.row, i)
                };
                value_buffer[n] = out;
                index_buffer[n] = secondary;
                n += 1;
            }
            SparseRange::new(
                self.options.sparse_extract_value.then(|| &value_buffer[..n]),
                self.options.sparse_extract_index.then(|| &index_buffer[..n]),
            )
        }
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync, O: UnaryOp<V> + 'static> Matrix<V> for DelayedUnaryIsometric<V, O> {
    fn nrow(&self) -> usize {
        self.child.nrow()
    }

    fn ncol(&self) -> usize {
        self.child.ncol()
    }

    fn sparse_proportion(&self) -> f64 {
        if self.op.is_sparse() { self.child.sparse_proportion() } else { 0.0 }
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
    ) -> Box<dyn DenseExtractor<V> + '_> {
        let full_len = if row { self.ncol() } else { self.nrow() };
        let secondary_offsets = match &selection {
            Selection::Full => (0..full_len).collect(),
            Selection::Block { start, length } => (*start..*start + *length).collect(),
            Selection::Index(idx) => idx.to_vec(),
        };
        Box::new(UnaryDenseExtractor {
            child: self.child.dense_extractor(row, selection, options),
            op: &self.op,
            row,
            secondary_offsets,
        })
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_> {
        // Both branches below place values by the child's reported index
        // (the preserving path zips them, the fallback path scans them
        // against every secondary position), so the child must always
        // return both regardless of what the caller asked for.
        let child_options = options.force_value().force_index();
        Box::new(UnarySparseExtractor {
            child: self.child.sparse_extractor(row, selection, child_options),
            op: &self.op,
            row,
            sparse_preserving: self.op.is_sparse(),
            options,
        })
    }
}

/// `DelayedBinaryIsometric(left, right, op)`: pairs corresponding entries
/// of two same-shaped matrices.
pub struct DelayedBinaryIsometric<V, O> {
    left: Arc<dyn Matrix<V>>,
    right: Arc<dyn Matrix<V>>,
    op: O,
}

impl<V, O> DelayedBinaryIsometric<V, O> {
    pub fn new(left: Arc<dyn Matrix<V>>, right: Arc<dyn Matrix<V>>, op: O) -> Self {
        Self { left, right, op }
    }
}

struct BinaryDenseExtractor<'a, V, O> {
    left: Box<dyn DenseExtractor<V> + 'a>,
    right: Box<dyn DenseExtractor<V> + 'a>,
    op: &'a O,
}

impl<'a, V: Copy + Zero, O: BinaryOp<V>> DenseExtractor<V> for BinaryDenseExtractor<'a, V, O> {
    fn len(&self) -> usize {
        self.left.len()
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        let mut left_buf = vec![V::zero(); buffer.len()];
        let left_result: Vec<V> = self.left.fetch(i, &mut left_buf).to_vec();
        let mut right_buf = vec![V::zero(); buffer.len()];
        let right_result = self.right.fetch(i, &mut right_buf);
        for (pos, (&l, &r)) in left_result.iter().zip(right_result.iter()).enumerate() {
            buffer[pos] = self.op.apply(l, r);
        }
        &buffer[..self.len()]
    }
}

/// Merges two sorted, unique index/value ranges for the same row/column,
/// producing one output element per distinct index (or per shared index
/// only, when `must_have_both` is false).
fn binary_sparse_merge<V: Copy + Zero>(
    left_values: &[V],
    left_indices: &[usize],
    right_values: &[V],
    right_indices: &[usize],
    must_have_both: bool,
    mut apply: impl FnMut(V, V) -> V,
    mut emit: impl FnMut(usize, V),
) {
    let (mut a, mut b) = (0usize, 0usize);
    while a < left_indices.len() || b < right_indices.len() {
        let (la, rb) = (left_indices.get(a), right_indices.get(b));
        match (la, rb) {
            (Some(&li), Some(&ri)) if li == ri => {
                emit(li, apply(left_values[a], right_values[b]));
                a += 1;
                b += 1;
            }
            (Some(&li), Some(&ri)) if li < ri => {
                if must_have_both {
                    emit(li, apply(left_values[a], V::zero()));
                }
                a += 1;
            }
            (Some(&li), _) if rb.is_none() => {
                if must_have_both {
                    emit(li, apply(left_values[a], V::zero()));
                }
                a += 1;
            }
            (_, Some(&ri)) => {
                if must_have_both {
                    emit(ri, apply(V::zero(), right_values[b]));
                }
                b += 1;
            }
            _ => unreachable!(),
        }
    }
}

struct BinarySparseExtractor<'a, V, O> {
    left: Box<dyn SparseExtractor<V> + 'a>,
    right: Box<dyn SparseExtractor<V> + 'a>,
    op: &'a O,
    options: ExtractOptions,
}

impl<'a, V: Copy + PartialEq + Zero, O: BinaryOp<V>> SparseExtractor<V> for BinarySparseExtractor<'a, V, O> {
    fn len(&self) -> usize {
        self.left.len()
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
        let mut lv = vec![V::zero(); self.left.len()];
        let mut li = vec![0usize; self.left.len()];
        let left_range = self.left.fetch(i, &mut lv, &mut li);
        let mut rv = vec![V::zero(); self.right.len()];
        let mut ri = vec![0usize; self.right.len()];
        let right_range = self.right.fetch(i, &mut rv, &mut ri);

        let mut n = 0;
        binary_sparse_merge(
            left_range.value.unwrap_or(&[]),
            left_range.index.unwrap_or(&[]),
            right_range.value.unwrap_or(&[]),
            right_range.index.unwrap_or(&[]),
            self.op.must_have_both(),
            |l, r| self.op.apply(l, r),
            |idx, v| {
                if v.is_zero() && self.op.is_sparse() {
                    return;
                }
                if self.options.sparse_extract_value {
                    value_buffer[n] = v;
                }
                if self.options.sparse_extract_index {
                    index_buffer[n] = idx;
                }
                n += 1;
            },
        );
        SparseRange::new(
            self.options.sparse_extract_value.then(|| &value_buffer[..n]),
            self.options.sparse_extract_index.then(|| &index_buffer[..n]),
        )
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync, O: BinaryOp<V> + 'static> Matrix<V> for DelayedBinaryIsometric<V, O> {
    fn nrow(&self) -> usize {
        self.left.nrow()
    }

    fn ncol(&self) -> usize {
        self.left.ncol()
    }

    fn sparse_proportion(&self) -> f64 {
        if self.op.is_sparse() {
            (self.left.sparse_proportion() + self.right.sparse_proportion()) / 2.0
        } else {
            0.0
        }
    }

    fn prefer_rows_proportion(&self) -> f64 {
        (self.left.prefer_rows_proportion() + self.right.prefer_rows_proportion()) / 2.0
    }

    fn uses_oracle(&self, row: bool) -> bool {
        self.left.uses_oracle(row) || self.right.uses_oracle(row)
    }

    fn dense_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn DenseExtractor<V> + '_> {
        Box::new(BinaryDenseExtractor {
            left: self.left.dense_extractor(row, selection.clone(), options),
            right: self.right.dense_extractor(row, selection, options),
            op: &self.op,
        })
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_> {
        let child_options = options.force_index();
        Box::new(BinarySparseExtractor {
            left: self.left.sparse_extractor(row, selection.clone(), child_options),
            right: self.right.sparse_extractor(row, selection, child_options),
            op: &self.op,
            options,
        })
    }
}
