// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Eigendecomposition of Hermitian matrices.
//!
//! Operators live in ndarray; the decomposition itself runs on nalgebra's
//! `SymmetricEigen`, which handles complex Hermitian input. Matrices are
//! converted at this boundary only.

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// Iteration cap handed to the QR sweeps.
const MAX_ITERATIONS: usize = 10_000;

/// Eigenvalues (ascending) and eigenvectors (columns) of a Hermitian matrix.
#[derive(Debug, Clone)]
pub struct HermitianEigen {
    pub values: Vec<f64>,
    pub vectors: Array2<Complex64>,
}

/// Diagonalise a Hermitian matrix, A = V · diag(λ) · V†.
///
/// Only the lower triangle of `a` is read; callers check Hermiticity
/// beforehand.
///
/// # Errors
/// `Dimension` if `a` is not square, `Numerical` if the input holds
/// non-finite values or the decomposition does not converge.
pub fn eigh(a: &Array2<Complex64>) -> Result<HermitianEigen> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(Error::Dimension {
            expected: n,
            actual: a.ncols(),
        });
    }
    if a.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(Error::Numerical(
            "matrix holds non-finite entries".into(),
        ));
    }
    if n == 0 {
        return Ok(HermitianEigen {
            values: Vec::new(),
            vectors: Array2::zeros((0, 0)),
        });
    }

    let m = DMatrix::from_fn(n, n, |i, j| a[[i, j]]);
    let eigen = SymmetricEigen::try_new(m, f64::EPSILON, MAX_ITERATIONS).ok_or_else(|| {
        Error::Numerical(format!(
            "Hermitian eigendecomposition of a {n}x{n} matrix did not converge"
        ))
    })?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]));

    let values = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
    let vectors = Array2::from_shape_fn((n, n), |(i, j)| eigen.eigenvectors[(i, order[j])]);
    Ok(HermitianEigen { values, vectors })
}
