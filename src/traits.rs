/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::sync::Arc;

use crate::oracle::Oracle;
use crate::options::ExtractOptions;
use crate::selection::Selection;
use crate::sparse_range::SparseRange;

/// A myopic dense extractor: the caller supplies the row or column index on
/// every call.
///
/// Implementations own whatever scratch buffers they need (scatter targets,
/// traversal cache state); they are single-threaded state machines and must
/// not be shared across threads.
pub trait DenseExtractor<V> {
    /// Number of positions this extractor writes per fetch (the selection's
    /// length along the secondary dimension).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills `buffer[0..self.len()]` with the requested row/column and
    /// returns a slice to read back. The returned slice may borrow `buffer`
    /// or may point into the backend's own storage instead — callers must
    /// never write through it.
    fn fetch<'a>(&mut self, i: usize, buffer: &'a mut [V]) -> &'a [V]
    where
        V: 'a;
}

/// A myopic sparse extractor, mirroring [`DenseExtractor`] but returning a
/// [`SparseRange`].
pub trait SparseExtractor<V> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills the value/index scratch buffers (as directed by the
    /// [`ExtractOptions`] the extractor was constructed with) and returns a
    /// view over the populated portion.
    fn fetch<'a>(
        &mut self,
        i: usize,
        value_buffer: &'a mut [V],
        index_buffer: &'a mut [usize],
    ) -> SparseRange<'a, V>
    where
        V: 'a;
}

/// An oracular dense extractor: the index comes from an attached oracle
/// rather than the caller.
pub trait OracularDenseExtractor<V> {
    fn len(&self) -> usize;
    fn fetch<'a>(&mut self, buffer: &'a mut [V]) -> &'a [V]
    where
        V: 'a;
}

pub trait OracularSparseExtractor<V> {
    fn len(&self) -> usize;
    fn fetch<'a>(
        &mut self,
        value_buffer: &'a mut [V],
        index_buffer: &'a mut [usize],
    ) -> SparseRange<'a, V>
    where
        V: 'a;
}

/// Blanket adapter: any myopic extractor wrapped in [`crate::oracle::Oracular`]
/// becomes oracular by sourcing its index from the attached oracle instead
/// of a caller argument. This is the single generic bridge backing every
/// `*_oracular` factory method on [`Matrix`], so backends implement only
/// the twelve myopic factories and get their oracular counterparts for
/// free.
impl<V, E: DenseExtractor<V>> OracularDenseExtractor<V> for crate::oracle::Oracular<E> {
    fn len(&self) -> usize {
        self.inner().len()
    }

    fn fetch<'a>(&mut self, buffer: &'a mut [V]) -> &'a [V]
    where
        V: 'a,
    {
        let i = self.next_index();
        self.inner_mut().fetch(i, buffer)
    }
}

impl<V, E: SparseExtractor<V>> OracularSparseExtractor<V> for crate::oracle::Oracular<E> {
    fn len(&self) -> usize {
        self.inner().len()
    }

    fn fetch<'a>(
        &mut self,
        value_buffer: &'a mut [V],
        index_buffer: &'a mut [usize],
    ) -> SparseRange<'a, V>
    where
        V: 'a,
    {
        let i = self.next_index();
        self.inner_mut().fetch(i, value_buffer, index_buffer)
    }
}

/// The uniform, read-only matrix contract implemented by every concrete
/// backend and every delayed wrapper.
///
/// All twelve extractor factories are collapsed into two methods
/// (`dense_extractor`, `sparse_extractor`) parameterised by `row: bool` and
/// a [`Selection`], covering the {dense,sparse} x {row,column} x
/// {full,block,index} cross product from the dense/sparse split already
/// being expressed in the method name. The oracular half of the contract is
/// provided by default methods wrapping the myopic factory in
/// [`crate::oracle::Oracular`], matching the spec's requirement that
/// attaching an oracle never changes returned data, only latency.
pub trait Matrix<V>: Send + Sync {
    fn nrow(&self) -> usize;
    fn ncol(&self) -> usize;

    /// Fraction of stored elements that are structurally absent (zero),
    /// in `[0, 1]`. `1.0` for a fully sparse matrix, `0.0` for dense.
    fn sparse_proportion(&self) -> f64;

    fn is_sparse(&self) -> bool {
        self.sparse_proportion() > 0.0
    }

    /// Fraction in `[0, 1]` expressing how strongly row-major iteration is
    /// preferred over column-major; `1.0` means "always prefer rows."
    fn prefer_rows_proportion(&self) -> f64;

    fn prefer_rows(&self) -> bool {
        self.prefer_rows_proportion() >= 0.5
    }

    /// Whether this matrix's extractors along `row` consult an attached
    /// oracle. Core backends always report `false`.
    fn uses_oracle(&self, row: bool) -> bool;

    fn dense_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn DenseExtractor<V> + '_>;

    fn sparse_extractor(
        &self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
    ) -> Box<dyn SparseExtractor<V> + '_>;

    /// Default oracular dense factory: wraps the myopic extractor so the
    /// index comes from `oracle` instead of the caller. Delayed wrappers
    /// that benefit from remapping the oracle (e.g. a subset wrapping it in
    /// [`crate::oracle::SubsetOracle`]) may override this.
    fn dense_extractor_oracular<'a>(
        &'a self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
        oracle: Arc<dyn Oracle>,
    ) -> crate::oracle::Oracular<Box<dyn DenseExtractor<V> + 'a>> {
        crate::oracle::Oracular::new(self.dense_extractor(row, selection, options), oracle)
    }

    fn sparse_extractor_oracular<'a>(
        &'a self,
        row: bool,
        selection: Selection,
        options: ExtractOptions,
        oracle: Arc<dyn Oracle>,
    ) -> crate::oracle::Oracular<Box<dyn SparseExtractor<V> + 'a>> {
        crate::oracle::Oracular::new(self.sparse_extractor(row, selection, options), oracle)
    }
}

impl<V> DenseExtractor<V> for Box<dyn DenseExtractor<V> + '_> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn fetch<'a>(&mut self, i: usize, buffer: &'a mut [V]) -> &'a [V]
    where
        V: 'a,
    {
        (**self).fetch(i, buffer)
    }
}

impl<V> SparseExtractor<V> for Box<dyn SparseExtractor<V> + '_> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn fetch<'a>(
        &mut self,
        i: usize,
        value_buffer: &'a mut [V],
        index_buffer: &'a mut [usize],
    ) -> SparseRange<'a, V>
    where
        V: 'a,
    {
        (**self).fetch(i, value_buffer, index_buffer)
    }
}
