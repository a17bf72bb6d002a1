/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */
use std::fmt;

/// Errors raised while constructing a matrix or a delayed wrapper.
///
/// Only construction-time invariant violations are represented here; the
/// extractor hot path never returns a `Result` (see the crate-level docs on
/// precondition handling).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Two matrices were combined (bind, binary isometric op) but their
    /// shapes are incompatible. Carries `(left_shape, right_shape)`.
    ShapeMismatch((usize, usize), (usize, usize)),
    /// Reserved for multiplication-style consumers built on top of the core
    /// (the core itself performs no linear algebra). Carries
    /// `(left_cols, right_rows)`.
    DimensionMismatch(usize, usize),
    /// A stored index or pointer fell outside `[0, bound)`. Carries
    /// `(index, bound)`.
    IndexOutOfBounds(usize, usize),
    /// `pointers[p] > pointers[p + 1]` for some `p`.
    NonMonotonicPointers(usize),
    /// `pointers.len() != primary_dim + 1`. Carries `(expected, actual)`.
    PointerLengthMismatch(usize, usize),
    /// Indices within one primary slice were not strictly increasing.
    /// Carries `(primary, position)`.
    UnsortedIndices(usize, usize),
    /// A subset vector did not hold the sorted/unique property its
    /// constructor assumed.
    SubsetInvariantViolation(&'static str),
    /// An operation that requires at least one stored element was called on
    /// an empty matrix.
    EmptyMatrix,
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::ShapeMismatch(left, right) => write!(
                f,
                "Shape mismatch: Cannot perform operation on matrices with different shapes. Left: {:?}, Right: {:?}",
                left, right
            ),
            MatrixError::DimensionMismatch(left_cols, right_rows) => write!(
                f,
                "Dimension mismatch: Incompatible dimensions for matrix multiplication. Left columns: {}, Right rows: {}",
                left_cols, right_rows
            ),
            MatrixError::IndexOutOfBounds(index, bound) => write!(
                f,
                "Index out of bounds: Index {} is out of bounds for dimension of size {}.",
                index, bound
            ),
            MatrixError::NonMonotonicPointers(position) => write!(
                f,
                "Non-monotonic pointers: pointers[{}] exceeds pointers[{}].",
                position,
                position + 1
            ),
            MatrixError::PointerLengthMismatch(expected, actual) => write!(
                f,
                "Pointer length mismatch: expected {} entries, found {}.",
                expected, actual
            ),
            MatrixError::UnsortedIndices(primary, position) => write!(
                f,
                "Unsorted indices: primary element {} is not strictly increasing at position {}.",
                primary, position
            ),
            MatrixError::SubsetInvariantViolation(expected) => write!(
                f,
                "Subset invariant violation: subset vector is not {}.",
                expected
            ),
            MatrixError::EmptyMatrix => {
                write!(f, "Empty matrix: Operation not supported on empty matrix.")
            }
        }
    }
}

impl std::error::Error for MatrixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}
