/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! The secondary traversal cache: efficient sorted walks across a secondary
//! dimension for a set of K primary elements, without redoing binary
//! searches from scratch when the request pattern is near-sequential.
//!
//! This is the hot kernel behind every secondary-direction extractor (CSR
//! column access, CSC row access, and the fragmented-sparse equivalents).
//! Direction reversals never invalidate state; they only reinterpret the
//! stored hints under the new direction's meaning.

const PAST_END: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
}

/// Gives the cache read access to the sorted index slice owned by each
/// primary element in the current selection, without caring whether that
/// slice comes from a compressed-sparse `pointers` range or a
/// fragmented-sparse owned vector.
pub trait PrimaryIndices {
    /// Number of primary elements participating in this traversal (the
    /// selection size, not necessarily the whole primary dimension).
    fn primary_len(&self) -> usize;

    /// Sorted secondary-index slice for primary element `p` (`p` indexes
    /// into the selection, not necessarily the backend's own numbering).
    fn indices(&self, p: usize) -> &[usize];
}

/// Per-extractor traversal state for one secondary-dimension walk.
pub struct SecondaryTraversalCache {
    ptr: Vec<usize>,
    hint: Vec<usize>,
    last_request: Option<usize>,
    last_direction: Direction,
    closest: usize,
}

impl SecondaryTraversalCache {
    pub fn new(primary_count: usize) -> Self {
        Self {
            ptr: vec![0; primary_count],
            hint: vec![0; primary_count],
            last_request: None,
            last_direction: Direction::Ascending,
            closest: 0,
        }
    }

    fn ascending_hint_at(slice: &[usize], ptr: usize) -> usize {
        if ptr < slice.len() {
            slice[ptr]
        } else {
            PAST_END
        }
    }

    fn descending_hint_at(slice: &[usize], ptr: usize) -> usize {
        if ptr == 0 {
            0
        } else {
            slice[ptr - 1] + 1
        }
    }

    fn reinit_all(&mut self, direction: Direction, slices: &dyn PrimaryIndices) {
        for p in 0..self.ptr.len() {
            let slice = slices.indices(p);
            self.hint[p] = match direction {
                Direction::Ascending => Self::ascending_hint_at(slice, self.ptr[p]),
                Direction::Descending => Self::descending_hint_at(slice, self.ptr[p]),
            };
        }
    }

    fn recompute_closest(&mut self, direction: Direction) {
        self.closest = match direction {
            Direction::Ascending => self.hint.iter().copied().min().unwrap_or(PAST_END),
            Direction::Descending => self.hint.iter().copied().max().unwrap_or(0),
        };
    }

    fn update_ascending(&mut self, p: usize, s: usize, slice: &[usize]) -> Option<usize> {
        if self.hint[p] > s {
            return None;
        }
        if self.hint[p] == s {
            return Some(self.ptr[p]);
        }
        // hint[p] < s: advance by one and peek, falling back to a binary
        // search over the remainder for the first index >= s.
        let mut ptr = self.ptr[p] + 1;
        let mut hint = Self::ascending_hint_at(slice, ptr);
        if hint < s {
            ptr += slice[ptr.min(slice.len())..].partition_point(|&v| v < s);
            hint = Self::ascending_hint_at(slice, ptr);
        }
        self.ptr[p] = ptr;
        self.hint[p] = hint;
        if hint == s { Some(ptr) } else { None }
    }

    fn update_descending(&mut self, p: usize, s: usize, slice: &[usize]) -> Option<usize> {
        let target = s + 1;
        if self.hint[p] < target {
            return None;
        }
        if self.hint[p] == target {
            return Some(self.ptr[p] - 1);
        }
        // hint[p] > target: step back by one and peek, falling back to a
        // binary search over the prefix for the last index <= s.
        let mut ptr = self.ptr[p].saturating_sub(1);
        let mut hint = Self::descending_hint_at(slice, ptr);
        if hint > target && ptr > 0 {
            ptr = slice[..ptr - 1].partition_point(|&v| v < target);
            hint = Self::descending_hint_at(slice, ptr);
        }
        self.ptr[p] = ptr;
        self.hint[p] = hint;
        if hint == target { Some(ptr - 1) } else { None }
    }

    /// Advances the cache to secondary index `s`, invoking `store(primary,
    /// index_in_selection, value_offset)` once per primary element with a
    /// non-zero at `s`, in increasing `index_in_selection` order. No calls
    /// are made when the short-circuit fires.
    pub fn fetch(&mut self, s: usize, slices: &dyn PrimaryIndices, mut store: impl FnMut(usize, usize, usize)) {
        let direction = match self.last_request {
            None => Direction::Ascending,
            Some(last) if s > last => Direction::Ascending,
            Some(last) if s < last => Direction::Descending,
            _ => self.last_direction,
        };

        let direction_changed = self.last_request.is_none() || direction != self.last_direction;
        if direction_changed {
            self.reinit_all(direction, slices);
        }
        self.last_direction = direction;

        let short_circuit = match direction {
            Direction::Ascending => s < self.closest,
            Direction::Descending => s + 1 > self.closest,
        };

        if !short_circuit && Some(s) != self.last_request {
            for p in 0..self.ptr.len() {
                let slice = slices.indices(p);
                let hit = match direction {
                    Direction::Ascending => self.update_ascending(p, s, slice),
                    Direction::Descending => self.update_descending(p, s, slice),
                };
                if let Some(offset) = hit {
                    store(p, p, offset);
                }
            }
            self.recompute_closest(direction);
        } else if !short_circuit {
            for p in 0..self.ptr.len() {
                let slice = slices.indices(p);
                let hit = match direction {
                    Direction::Ascending if self.hint[p] == s => Some(self.ptr[p]),
                    Direction::Descending if self.hint[p] == s + 1 => Some(self.ptr[p].wrapping_sub(1)),
                    _ => None,
                };
                if slice.is_empty() {
                    continue;
                }
                if let Some(offset) = hit {
                    store(p, p, offset);
                }
            }
        }

        self.last_request = Some(s);
    }
}
