/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

/// Flags threaded through every sparse extractor constructor.
///
/// Dense extractors only consult `cache_for_reuse`; the other three flags
/// are meaningless once a row or column has been fully densified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// If `false`, sparse extractors may leave `value` unset and skip value
    /// loads entirely.
    pub sparse_extract_value: bool,
    /// If `false`, sparse extractors may leave `index` unset and skip index
    /// loads entirely.
    pub sparse_extract_index: bool,
    /// If `false`, returned indices need not be ascending (but are still
    /// unique). Setting this to `false` lets the secondary traversal cache
    /// skip a sort it would otherwise have to perform.
    pub sparse_ordered_index: bool,
    /// Hint: the same row/column may be re-requested; backends may memoise.
    /// Core backends ignore this hint.
    pub cache_for_reuse: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sparse_extract_value: true,
            sparse_extract_index: true,
            sparse_ordered_index: true,
            cache_for_reuse: false,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values_only() -> Self {
        Self {
            sparse_extract_index: false,
            ..Self::default()
        }
    }

    pub fn with_indices_only() -> Self {
        Self {
            sparse_extract_value: false,
            ..Self::default()
        }
    }

    /// A variant that silently forces index extraction on, used internally
    /// by delayed wrappers that need indices to drive bookkeeping (subset
    /// duplication, isometric sparse merges) regardless of what the caller
    /// asked for.
    pub fn force_index(mut self) -> Self {
        self.sparse_extract_index = true;
        self
    }

    /// Forces value extraction on, the `force_index` counterpart for
    /// wrappers that read back a child's values rather than just its
    /// positions (e.g. the unary isometric non-preserving fallback, which
    /// needs both to rebuild the dense-equivalent sparse row).
    pub fn force_value(mut self) -> Self {
        self.sparse_extract_value = true;
        self
    }

    pub fn unordered(mut self) -> Self {
        self.sparse_ordered_index = false;
        self
    }
}
