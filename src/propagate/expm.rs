// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Unitary exponentials of Hermitian generators.
//!
//! exp(−i·φ·H) = V · diag(e^{−iφλ_k}) · V† with H = V · diag(λ) · V†.
//! Every eigenphase has unit modulus, so the result stays unitary to
//! rounding for arbitrarily large φ·‖H‖, which a truncated series does not.

use ndarray::Array2;
use num_complex::Complex64;

use super::eigh::{eigh, HermitianEigen};
use crate::error::Result;

/// exp(−i·phase·H) for Hermitian `h`.
pub fn hermitian_exp(h: &Array2<Complex64>, phase: f64) -> Result<Array2<Complex64>> {
    let eigen = eigh(h)?;
    Ok(exp_from_eigen(&eigen, phase))
}

/// exp(−i·phase·H) from a precomputed eigendecomposition of H.
pub fn exp_from_eigen(eigen: &HermitianEigen, phase: f64) -> Array2<Complex64> {
    let v = &eigen.vectors;
    let mut scaled = v.clone();
    for (j, &lambda) in eigen.values.iter().enumerate() {
        let factor = Complex64::from_polar(1.0, -phase * lambda);
        scaled.column_mut(j).mapv_inplace(|z| z * factor);
    }
    scaled.dot(&v.t().mapv(|z| z.conj()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_matrix_close, c, pauli_x, pauli_y};
    use std::f64::consts::PI;

    #[test]
    fn test_exp_zero_phase_is_identity() {
        let u = hermitian_exp(&pauli_y(), 0.0).unwrap();
        let eye = Array2::from_diag_elem(2, c(1.0));
        assert_matrix_close(&u, &eye, 1e-14);
    }

    #[test]
    fn test_exp_pauli_x_produces_rotation() {
        // exp(−i·θ/2·σx) = [[cos θ/2, −i sin θ/2], [−i sin θ/2, cos θ/2]]
        let theta = PI / 2.0;
        let u = hermitian_exp(&pauli_x(), theta / 2.0).unwrap();
        let (s, co) = (theta / 2.0).sin_cos();
        let mut expected = Array2::zeros((2, 2));
        expected[[0, 0]] = c(co);
        expected[[1, 1]] = c(co);
        expected[[0, 1]] = Complex64::new(0.0, -s);
        expected[[1, 0]] = Complex64::new(0.0, -s);
        assert_matrix_close(&u, &expected, 1e-14);
    }

    #[test]
    fn test_exp_diagonal() {
        let mut h = Array2::zeros((2, 2));
        h[[0, 0]] = c(3.0);
        h[[1, 1]] = c(-1.0);
        let u = hermitian_exp(&h, 0.25).unwrap();
        assert!((u[[0, 0]] - Complex64::from_polar(1.0, -0.75)).norm() < 1e-15);
        assert!((u[[1, 1]] - Complex64::from_polar(1.0, 0.25)).norm() < 1e-15);
        assert!(u[[0, 1]].norm() < 1e-15);
    }

    #[test]
    fn test_exp_large_phase_stays_unitary() {
        // 1 kHz generator over a 10 s phase: far outside any series' radius
        let h = pauli_x().mapv(|z| z * 1000.0) + pauli_y().mapv(|z| z * 250.0);
        let u = hermitian_exp(&h, 2.0 * PI * 10.0).unwrap();
        let product = u.dot(&u.t().mapv(|z| z.conj()));
        let eye = Array2::from_diag_elem(2, c(1.0));
        assert_matrix_close(&product, &eye, 1e-12);
    }
}
