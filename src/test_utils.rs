// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for simulator tests.

use ndarray::Array2;
use num_complex::Complex64;

use crate::operator::Operator;
use crate::spin::SpinSystem;

/// Real number as a complex value.
pub fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

/// Pauli σx.
pub fn pauli_x() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 1]] = c(1.0);
    m[[1, 0]] = c(1.0);
    m
}

/// Pauli σy.
pub fn pauli_y() -> Array2<Complex64> {
    let mut m = Array2::zeros((2, 2));
    m[[0, 1]] = Complex64::new(0.0, -1.0);
    m[[1, 0]] = Complex64::new(0.0, 1.0);
    m
}

/// Assert element-wise closeness of two matrices.
pub fn assert_matrix_close(a: &Array2<Complex64>, b: &Array2<Complex64>, tol: f64) {
    assert_eq!(a.dim(), b.dim(), "shape mismatch");
    for ((idx, x), y) in a.indexed_iter().zip(b.iter()) {
        assert!(
            (x - y).norm() <= tol,
            "element {:?}: {} vs {} (|diff| = {:.3e}, tol {:.1e})",
            idx,
            x,
            y,
            (x - y).norm(),
            tol
        );
    }
}

/// Assert element-wise closeness of two operators, ignoring their roles.
pub fn assert_operator_close(a: &Operator, b: &Operator, tol: f64) {
    assert_matrix_close(a.matrix(), b.matrix(), tol);
}

/// One uncoupled proton at `shift_hz`.
pub fn single_spin(shift_hz: f64) -> SpinSystem {
    SpinSystem::protons("single", &[shift_hz]).unwrap()
}

/// Two protons with scalar coupling `j_hz`.
pub fn coupled_pair(shift_a: f64, shift_b: f64, j_hz: f64) -> SpinSystem {
    let mut system = SpinSystem::protons("pair", &[shift_a, shift_b]).unwrap();
    system.set_coupling(0, 1, j_hz).unwrap();
    system
}
