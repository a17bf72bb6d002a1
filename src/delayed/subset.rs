/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! The delayed-subset family: reorders, restricts, or duplicates one
//! dimension of a child matrix without materialising anything.
//!
//! Four named constructors (`sorted_unique`, `sorted`, `unique`, `general`)
//! cover the cases a subset vector can fall into, but three of them — any
//! subset that is not already sorted-and-unique — reduce to the same
//! runtime shape: ask the child for the sorted, deduplicated *base* set of
//! requested indices, then expand and/or permute the child's answer back
//! into the caller's order. Only the base/`dup_lists` construction differs
//! per case, which is exactly the bookkeeping [`make_delayed_subset`]
//! performs once, up front. [`DelayedSubsetBlock`] is the separate,
//! genuinely zero-overhead specialisation for a contiguous run.

use std::collections::HashSet;
use std::sync::Arc;

use num_traits::Zero;

use crate::error::MatrixError;
use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::sparse_range::SparseRange;
use crate::traits::{DenseExtractor, Matrix, SparseExtractor};

enum AlongExtraction {
    /// `subset` is already sorted and unique: it equals its own base, so
    /// the child can be asked directly with no remapping at all.
    Identity,
    /// `base` is the sorted, deduplicated subset; `reverse_map[k]` gives
    /// the position of `subset[k]` within `base`; `dup_lists[u]` lists
    /// every output position `k` with `reverse_map[k] == u`, needed to
    /// expand one child hit into the (possibly several) output positions
    /// it feeds.
    Remap {
        base: Arc<[usize]>,
        reverse_map: Arc<[usize]>,
        dup_lists: Arc<[Arc<[usize]>]>,
    },
}

/// Reorders, restricts, or duplicates the row or column dimension of a
/// child matrix.
pub struct DelayedSubset<V> {
    child: Arc<dyn Matrix<V>>,
    along_row: bool,
    subset: Arc<[usize]>,
    extraction: AlongExtraction,
}

fn build_remap(subset: &[usize]) -> AlongExtraction {
    let mut base: Vec<usize> = subset.to_vec();
    base.sort_unstable();
    base.dedup();
    let reverse_map: Vec<usize> = subset
        .iter()
        .map(|&s| base.binary_search(&s).expect("base contains every subset element"))
        .collect();
    let mut dup_lists: Vec<Vec<usize>> = vec![Vec::new(); base.len()];
    for (k, &u) in reverse_map.iter().enumerate() {
        dup_lists[u].push(k);
    }
    AlongExtraction::Remap {
        base: base.into(),
        reverse_map: reverse_map.into(),
        dup_lists: dup_lists.into_iter().map(Arc::<[usize]>::from).collect(),
    }
}

impl<V> DelayedSubset<V> {
    fn new_checked(child: Arc<dyn Matrix<V>>, along_row: bool, subset: Vec<usize>) -> Result<Self, MatrixError> {
        let bound = if along_row { child.nrow() } else { child.ncol() };
        for &s in &subset {
            if s >= bound {
                return Err(MatrixError::IndexOutOfBounds(s, bound));
            }
        }
        let is_sorted_unique = subset.windows(2).all(|w| w[0] < w[1]);
        let extraction = if is_sorted_unique {
            AlongExtraction::Identity
        } else {
            build_remap(&subset)
        };
        Ok(Self {
            child,
            along_row,
            subset: subset.into(),
            extraction,
        })
    }

    /// Subset vector is already known sorted and duplicate-free.
    pub fn sorted_unique(child: Arc<dyn Matrix<V>>, along_row: bool, subset: Vec<usize>) -> Result<Self, MatrixError> {
        debug_assert!(subset.windows(2).all(|w| w[0] < w[1]));
        Self::new_checked(child, along_row, subset)
    }

    /// Subset vector is sorted but may repeat values.
    pub fn sorted(child: Arc<dyn Matrix<V>>, along_row: bool, subset: Vec<usize>) -> Result<Self, MatrixError> {
        debug_assert!(subset.windows(2).all(|w| w[0] <= w[1]));
        Self::new_checked(child, along_row, subset)
    }

    /// Subset vector has no repeats but is not sorted.
    pub fn unique(child: Arc<dyn Matrix<V>>, along_row: bool, subset: Vec<usize>) -> Result<Self, MatrixError> {
        Self::new_checked(child, along_row, subset)
    }

    /// Subset vector may repeat values and need not be sorted.
    pub fn general(child: Arc<dyn Matrix<V>>, along_row: bool, subset: Vec<usize>) -> Result<Self, MatrixError> {
        Self::new_checked(child, along_row, subset)
    }

    fn full_len(&self) -> usize {
        self.subset.len()
    }
}

/// Inspects a subset vector and builds the cheapest variant that is
/// correct for it: a contiguous run becomes [`DelayedSubsetBlock`];
/// otherwise a [`DelayedSubset`] in sorted-unique, sorted, unique, or
/// general form, detected by a single scan.
pub fn make_delayed_subset<V: Copy + PartialEq + Zero + Send + Sync + 'static>(
    child: Arc<dyn Matrix<V>>,
    along_row: bool,
    subset: Vec<usize>,
) -> Result<Arc<dyn Matrix<V>>, MatrixError> {
    if let Some((start, length)) = contiguous_block(&subset) {
        return Ok(Arc::new(DelayedSubsetBlock::new(child, along_row, start, length)?));
    }

    let sorted = subset.windows(2).all(|w| w[0] <= w[1]);
    let unique = {
        let mut seen = HashSet::with_capacity(subset.len());
        subset.iter().all(|s| seen.insert(*s))
    };

    let wrapper = match (sorted, unique) {
        (true, true) => DelayedSubset::sorted_unique(child, along_row, subset)?,
        (true, false) => DelayedSubset::sorted(child, along_row, subset)?,
        (false, true) => DelayedSubset::unique(child, along_row, subset)?,
        (false, false) => DelayedSubset::general(child, along_row, subset)?,
    };
    Ok(Arc::new(wrapper))
}

fn contiguous_block(subset: &[usize]) -> Option<(usize, usize)> {
    if subset.is_empty() {
        return None;
    }
    let start = subset[0];
    if subset.iter().enumerate().all(|(k, &v)| v == start + k) {
        Some((start, subset.len()))
    } else {
        None
    }
}

struct AlongExtractor<'a, V> {
    child: Box<dyn DenseExtractor<V> + 'a>,
    subset: &'a [usize],
}

impl<'a, V> DenseExtractor<V> for AlongExtractor<'a, V> {
    fn len(&self) -> usize {
        self.child.len()
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        self.child.fetch(self.subset[i], buffer)
    }
}

struct AlongSparseExtractor<'a, V> {
    child: Box<dyn SparseExtractor<V> + 'a>,
    subset: &'a [usize],
}

impl<'a, V> SparseExtractor<V> for AlongSparseExtractor<'a, V> {
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
        self.child.fetch(self.subset[i], value_buffer, index_buffer)
    }
}

struct PerpendicularExtractor<'a, V> {
    delayed: &'a DelayedSubset<V>,
    child: Box<dyn DenseExtractor<V> + 'a>,
    outer: Selection,
}

impl<'a, V: Copy + Zero> DenseExtractor<V> for PerpendicularExtractor<'a, V> {
    fn len(&self) -> usize {
        self.outer.len(self.delayed.full_len())
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        let full_len = self.delayed.full_len();
        let mut full = vec![V::zero(); full_len];
        match &self.delayed.extraction {
            AlongExtraction::Identity => {
                self.child.fetch(i, &mut full);
            }
            AlongExtraction::Remap { base, reverse_map, .. } => {
                let mut base_buf = vec![V::zero(); base.len()];
                let base_result = self.child.fetch(i, &mut base_buf);
                for (k, &u) in reverse_map.iter().enumerate() {
                    full[k] = base_result[u];
                }
            }
        }
        match &self.outer {
            Selection::Full => buffer[..full_len].copy_from_slice(&full),
            Selection::Block { start, length } => {
                buffer[..*length].copy_from_slice(&full[*start..*start + *length]);
            }
            Selection::Index(idx) => {
                for (pos, &k) in idx.iter().enumerate() {
                    buffer[pos] = full[k];
                }
            }
        }
        &buffer[..self.len()]
    }
}

struct PerpendicularSparseExtractor<'a, V> {
    delayed: &'a DelayedSubset<V>,
    child: Box<dyn SparseExtractor<V> + 'a>,
    outer: Selection,
    options: ExtractOptions,
}

impl<'a, V: Copy + PartialEq + Zero> SparseExtractor<V> for PerpendicularSparseExtractor<'a, V> {
    fn len(&self) -> usize {
        self.outer.len(self.delayed.full_len())
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
        // Collect the full, wrapper-space (value, position) pairs first,
        // then apply the outer block/index selection on top — matching
        // DelayedSubsetBlock's own convention of cascading selections
        // rather than fusing them.
        let mut pairs: Vec<(usize, V)> = Vec::new();
        match &self.delayed.extraction {
            AlongExtraction::Identity => {
                let base_len = self.delayed.full_len();
                let mut vbuf = vec![V::zero(); base_len];
                let mut ibuf = vec![0usize; base_len];
                let range = self.child.fetch(i, &mut vbuf, &mut ibuf);
                let values = range.value.unwrap_or(&[]);
                let indices = range.index.unwrap_or(&[]);
                for (v, &k) in values.iter().zip(indices) {
                    pairs.push((k, *v));
                }
            }
            AlongExtraction::Remap { base, dup_lists, .. } => {
                let mut vbuf = vec![V::zero(); base.len()];
                let mut ibuf = vec![0usize; base.len()];
                let range = self.child.fetch(i, &mut vbuf, &mut ibuf);
                let values = range.value.unwrap_or(&[]);
                let indices = range.index.unwrap_or(&[]);
                for (v, &u) in values.iter().zip(indices) {
                    for &k in dup_lists[u].iter() {
                        pairs.push((k, *v));
                    }
                }
                if self.options.sparse_ordered_index {
                    pairs.sort_by_key(|(k, _)| *k);
                }
            }
        }

        let selected: Vec<(usize, V)> = match &self.outer {
            Selection::Full => pairs,
            Selection::Block { start, length } => pairs
                .into_iter()
                .filter(|(k, _)| *k >= *start && *k < *start + *length)
                .map(|(k, v)| (k - start, v))
                .collect(),
            Selection::Index(idx) => {
                let mut out = Vec::new();
                for (pos, &target) in idx.iter().enumerate() {
                    if let Some((_, v)) = pairs.iter().find(|(k, _)| *k == target) {
                        out.push((pos, *v));
                    }
                }
                out
            }
        };

        let mut n = 0;
        for (k, v) in selected {
            if self.options.sparse_extract_value {
                value_buffer[n] = v;
            }
            if self.options.sparse_extract_index {
                index_buffer[n] = k;
            }
            n += 1;
        }
        SparseRange::new(
            self.options.sparse_extract_value.then(|| &value_buffer[..n]),
            self.options.sparse_extract_index.then(|| &index_buffer[..n]),
        )
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for DelayedSubset<V> {
    fn nrow(&self) -> usize {
        if self.along_row { self.subset.len() } else { self.child.nrow() }
    }

    fn ncol(&self) -> usize {
        if self.along_row { self.child.ncol() } else { self.subset.len() }
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
    ) -> Box<dyn DenseExtractor<V> + '_> {
        if row == self.along_row {
            let child_extractor = self.child.dense_extractor(row, selection, options);
            Box::new(AlongExtractor {
                child: child_extractor,
                subset: &self.subset,
            })
        } else {
            let child_selection = match &self.extraction {
                AlongExtraction::Identity => Selection::Index(self.subset.clone()),
                AlongExtraction::Remap { base, .. } => Selection::Index(base.clone()),
            };
            let child_extractor = self.child.dense_extractor(row, child_selection, options);
            Box::new(PerpendicularExtractor {
                delayed: self,
                child: child_extractor,
                outer: selection,
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
            let child_extractor = self.child.sparse_extractor(row, selection, options);
            Box::new(AlongSparseExtractor {
                child: child_extractor,
                subset: &self.subset,
            })
        } else {
            let child_selection = match &self.extraction {
                AlongExtraction::Identity => Selection::Index(self.subset.clone()),
                AlongExtraction::Remap { base, .. } => Selection::Index(base.clone()),
            };
            // Both branches place each returned value by the child's own
            // index (see the `Identity` zip above and the `Remap` dup-list
            // lookup), so both need the child's indices regardless of
            // whether the caller asked for them back.
            let child_options = options.force_index();
            let child_extractor = self.child.sparse_extractor(row, child_selection, child_options);
            Box::new(PerpendicularSparseExtractor {
                delayed: self,
                child: child_extractor,
                outer: selection,
                options,
            })
        }
    }
}

/// Contiguous-range subsetting: along-direction access just translates `i`
/// to `i + start`, and perpendicular access reuses the child's own
/// `Selection::Block` path directly. No reverse-map or duplicate
/// bookkeeping is ever built.
pub struct DelayedSubsetBlock<V> {
    child: Arc<dyn Matrix<V>>,
    along_row: bool,
    start: usize,
    length: usize,
    _marker: std::marker::PhantomData<V>,
}

impl<V> DelayedSubsetBlock<V> {
    pub fn new(child: Arc<dyn Matrix<V>>, along_row: bool, start: usize, length: usize) -> Result<Self, MatrixError> {
        let bound = if along_row { child.nrow() } else { child.ncol() };
        if start + length > bound {
            return Err(MatrixError::IndexOutOfBounds(start + length, bound));
        }
        Ok(Self {
            child,
            along_row,
            start,
            length,
            _marker: std::marker::PhantomData,
        })
    }
}

struct BlockAlongExtractor<'a, V> {
    child: Box<dyn DenseExtractor<V> + 'a>,
    start: usize,
}

impl<'a, V> DenseExtractor<V> for BlockAlongExtractor<'a, V> {
    fn len(&self) -> usize {
        self.child.len()
    }

    fn fetch<'b>(&mut self, i: usize, buffer: &'b mut [V]) -> &'b [V]
    where
        V: 'b,
    {
        self.child.fetch(i + self.start, buffer)
    }
}

struct BlockAlongSparseExtractor<'a, V> {
    child: Box<dyn SparseExtractor<V> + 'a>,
    start: usize,
}

impl<'a, V> SparseExtractor<V> for BlockAlongSparseExtractor<'a, V> {
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
        self.child.fetch(i + self.start, value_buffer, index_buffer)
    }
}

impl<V: Copy + PartialEq + Zero + Send + Sync> Matrix<V> for DelayedSubsetBlock<V> {
    fn nrow(&self) -> usize {
        if self.along_row { self.length } else { self.child.nrow() }
    }

    fn ncol(&self) -> usize {
        if self.along_row { self.child.ncol() } else { self.length }
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
    ) -> Box<dyn DenseExtractor<V> + '_> {
        if row == self.along_row {
            Box::new(BlockAlongExtractor {
                child: self.child.dense_extractor(row, selection, options),
                start: self.start,
            })
        } else {
            let shifted = shift_selection(selection, self.start, self.length);
            self.child.dense_extractor(row, shifted, options)
        }
    }

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_> {
        if row == self.along_row {
            Box::new(BlockAlongSparseExtractor {
                child: self.child.sparse_extractor(row, selection, options),
                start: self.start,
            })
        } else {
            let shifted = shift_selection(selection, self.start, self.length);
            self.child.sparse_extractor(row, shifted, options)
        }
    }
}

fn shift_selection(selection: Selection, start: usize, length: usize) -> Selection {
    match selection {
        Selection::Full => Selection::Block { start, length },
        Selection::Block { start: s, length: l } => Selection::Block { start: start + s, length: l },
        Selection::Index(idx) => {
            Selection::Index(idx.iter().map(|&i| i + start).collect::<Vec<_>>().into())
        }
    }
}
