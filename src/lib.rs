/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
 */

//! A uniform, read-only abstraction over two-dimensional numeric matrices
//! stored in dense, compressed-sparse, or fragmented-sparse layouts, with
//! delayed composition of element-wise operations and row/column
//! subsetting.
//!
//! The entry point is [`Matrix`], implemented by the concrete backends
//! ([`DenseMatrix`], [`CompressedSparseMatrix`], [`FragmentedSparseMatrix`])
//! and by every wrapper in [`delayed`]. A consumer never needs to know
//! which layout, or how many layers of delayed operations, sit behind a
//! `&dyn Matrix<V>` — the extractor protocol in [`traits`] is identical in
//! every case.

pub mod compressed;
pub mod delayed;
pub mod dense;
pub mod error;
pub mod fragmented;
pub mod oracle;
pub mod options;
pub mod selection;
pub mod sparse_range;
pub mod stats;
pub mod traits;
pub mod traversal_cache;

pub use compressed::{CompressedSparseMatrix, CsrMatrix};
pub use dense::DenseMatrix;
pub use error::MatrixError;
pub use fragmented::FragmentedSparseMatrix;
pub use oracle::{Oracle, Oracular, SequenceOracle, SubsetOracle};
pub use options::ExtractOptions;
pub use selection::Selection;
pub use sparse_range::SparseRange;
pub use traits::{DenseExtractor, Matrix, OracularDenseExtractor, OracularSparseExtractor, SparseExtractor};
