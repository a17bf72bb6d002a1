// SPDX-License-Identifier: MIT
// Copyright (c) "2025" . The DeepCausality Authors and Contributors. All Rights Reserved.
use deep_causality_matrix::{
    CompressedSparseMatrix, DenseExtractor, ExtractOptions, Matrix, MatrixError, Selection, SparseExtractor,
};

/// A consumer built entirely on top of the public extractor API: no
/// multiplication lives in the core itself (see `MatrixError::DimensionMismatch`).
fn vec_mult(m: &dyn Matrix<f64>, v: &[f64]) -> Result<Vec<f64>, MatrixError> {
    if m.ncol() != v.len() {
        return Err(MatrixError::DimensionMismatch(m.ncol(), v.len()));
    }
    let mut extractor = m.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; m.ncol()];
    let mut out = Vec::with_capacity(m.nrow());
    for r in 0..m.nrow() {
        let row = extractor.fetch(r, &mut buf);
        out.push(row.iter().zip(v).map(|(a, b)| a * b).sum());
    }
    Ok(out)
}

pub fn main() {
    // Build a 4x4 CSR matrix by hand. Row 0 has two non-zeros, row 1 is
    // empty, row 2 has one, row 3 has two.
    //
    //     [ 1  0  2  0 ]
    //     [ 0  0  0  0 ]
    //     [ 0  3  0  0 ]
    //     [ 0  0  4  5 ]
    let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let indices = vec![0, 2, 1, 2, 3];
    let pointers = vec![0, 2, 2, 3, 5];
    let m = CompressedSparseMatrix::csr(4, 4, values, indices, pointers, true).unwrap();

    assert_eq!(m.nrow(), 4);
    assert_eq!(m.ncol(), 4);
    assert!(m.is_sparse());

    // Myopic dense access: walk every row and materialize it densely.
    let mut dense = m.dense_extractor(true, Selection::Full, ExtractOptions::new());
    let mut buf = vec![0.0; 4];
    assert_eq!(dense.fetch(0, &mut buf), &[1.0, 0.0, 2.0, 0.0]);
    assert_eq!(dense.fetch(1, &mut buf), &[0.0, 0.0, 0.0, 0.0]);
    assert_eq!(dense.fetch(2, &mut buf), &[0.0, 3.0, 0.0, 0.0]);
    assert_eq!(dense.fetch(3, &mut buf), &[0.0, 0.0, 4.0, 5.0]);

    // Myopic sparse access: only the stored values and their column
    // indices come back, nothing materialized for the zero entries.
    let mut sparse = m.sparse_extractor(true, Selection::Full, ExtractOptions::new());
    let mut vbuf = vec![0.0; 4];
    let mut ibuf = vec![0usize; 4];
    let row0 = sparse.fetch(0, &mut vbuf, &mut ibuf);
    assert_eq!(row0.number, 2);
    assert_eq!(row0.value.unwrap(), &[1.0, 2.0]);
    assert_eq!(row0.index.unwrap(), &[0, 2]);

    // Column access on a CSR matrix runs against the grain: the
    // traversal cache turns each column fetch into a binary-search-backed
    // scan over the row pointers rather than a native column walk.
    let mut columns = m.dense_extractor(false, Selection::Full, ExtractOptions::new());
    let mut col_buf = vec![0.0; 4];
    assert_eq!(columns.fetch(2, &mut col_buf), &[2.0, 0.0, 0.0, 4.0]);

    // A secondary-dimension selection narrows every row fetch to an
    // ascending list of columns, with no need to touch the backend itself.
    let narrowed = Selection::Index(std::sync::Arc::from(vec![0usize, 2]));
    let mut narrow_dense = m.dense_extractor(true, narrowed, ExtractOptions::new());
    let mut narrow_buf = vec![0.0; 2];
    assert_eq!(narrow_dense.fetch(0, &mut narrow_buf), &[1.0, 2.0]);
    assert_eq!(narrow_dense.fetch(3, &mut narrow_buf), &[0.0, 4.0]);

    // Matrix-vector multiplication is a consumer, not core functionality:
    // `vec_mult` above is built entirely from the extractor contract.
    let row_sums_via_ones = vec_mult(&m, &[1.0, 1.0, 1.0, 1.0]).unwrap();
    assert_eq!(row_sums_via_ones, vec![3.0, 0.0, 3.0, 9.0]);

    let err = vec_mult(&m, &[1.0, 2.0]).unwrap_err();
    assert_eq!(err, MatrixError::DimensionMismatch(4, 2));
}
