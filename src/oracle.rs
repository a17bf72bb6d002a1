/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::sync::Arc;

/// A caller-supplied prediction of the sequence of indices an extractor is
/// about to be fetched with.
///
/// An oracle promises that the forthcoming requests are exactly
/// `get(0), get(1), ..., get(total() - 1)`. Core backends never consult an
/// oracle (they advertise `uses_oracle(..) == false`); it exists so a future
/// backend with expensive random access has somewhere to plug in
/// prefetching without changing the extractor contract. Attaching an oracle
/// must never change the data an extractor returns, only its latency.
pub trait Oracle: Send + Sync {
    fn total(&self) -> usize;
    fn get(&self, position: usize) -> usize;
}

/// An oracle backed by a plain index sequence, the common case when a
/// caller already knows its full access pattern up front.
#[derive(Debug, Clone)]
pub struct SequenceOracle {
    sequence: Arc<[usize]>,
}

impl SequenceOracle {
    pub fn new(sequence: impl Into<Arc<[usize]>>) -> Self {
        Self {
            sequence: sequence.into(),
        }
    }
}

impl Oracle for SequenceOracle {
    fn total(&self) -> usize {
        self.sequence.len()
    }

    fn get(&self, position: usize) -> usize {
        self.sequence[position]
    }
}

/// Remaps an oracle's predictions through a subset vector, so a delayed
/// subset can hand its child an oracle expressed in child-space while
/// itself being driven by one expressed in subset-space.
#[derive(Debug, Clone)]
pub struct SubsetOracle<O> {
    inner: O,
    subset: Arc<[usize]>,
}

impl<O: Oracle> SubsetOracle<O> {
    pub fn new(inner: O, subset: impl Into<Arc<[usize]>>) -> Self {
        Self {
            inner,
            subset: subset.into(),
        }
    }
}

impl<O: Oracle> Oracle for SubsetOracle<O> {
    fn total(&self) -> usize {
        self.inner.total()
    }

    fn get(&self, position: usize) -> usize {
        self.subset[self.inner.get(position)]
    }
}

/// Adapts any myopic extractor `E` into an oracular one by sourcing the
/// index from an attached [`Oracle`] instead of from the caller.
///
/// This is the one generic decorator used to provide the oracular half of
/// every extractor factory pair, rather than every backend hand-rolling an
/// oracular sibling for each of its myopic extractors.
pub struct Oracular<E> {
    inner: E,
    oracle: Arc<dyn Oracle>,
    position: usize,
}

impl<E> Oracular<E> {
    pub fn new(inner: E, oracle: Arc<dyn Oracle>) -> Self {
        Self {
            inner,
            oracle,
            position: 0,
        }
    }

    /// Returns the next index predicted by the oracle, advancing the
    /// internal cursor. Panics if the oracle's promised total has been
    /// exceeded, which indicates a caller violating the oracle contract.
    pub fn next_index(&mut self) -> usize {
        let idx = self.oracle.get(self.position);
        self.position += 1;
        idx
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }
}
