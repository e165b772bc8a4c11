// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operators on a spin system's Hilbert space.

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Error, Result};

/// What an operator stands for. Carried for diagnostics; arithmetic does
/// not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorRole {
    Hamiltonian,
    Density,
    AngularMomentum,
    Detection,
    Propagator,
    General,
}

impl fmt::Display for OperatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperatorRole::Hamiltonian => "hamiltonian",
            OperatorRole::Density => "density",
            OperatorRole::AngularMomentum => "angular momentum",
            OperatorRole::Detection => "detection",
            OperatorRole::Propagator => "propagator",
            OperatorRole::General => "general",
        };
        f.write_str(name)
    }
}

/// A square complex matrix tagged with its role.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    matrix: Array2<Complex64>,
    role: OperatorRole,
}

impl Operator {
    /// Wrap a matrix. Fails if it is not square.
    pub fn new(matrix: Array2<Complex64>, role: OperatorRole) -> Result<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(Error::Dimension {
                expected: matrix.nrows(),
                actual: matrix.ncols(),
            });
        }
        Ok(Self { matrix, role })
    }

    /// Wrap a matrix already known to be square.
    pub(crate) fn from_parts(matrix: Array2<Complex64>, role: OperatorRole) -> Self {
        debug_assert_eq!(matrix.nrows(), matrix.ncols());
        Self { matrix, role }
    }

    pub fn identity(dim: usize, role: OperatorRole) -> Self {
        Self {
            matrix: Array2::from_diag_elem(dim, Complex64::new(1.0, 0.0)),
            role,
        }
    }

    pub fn zeros(dim: usize, role: OperatorRole) -> Self {
        Self {
            matrix: Array2::zeros((dim, dim)),
            role,
        }
    }

    /// Side length of the matrix.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn role(&self) -> OperatorRole {
        self.role
    }

    pub fn with_role(mut self, role: OperatorRole) -> Self {
        self.role = role;
        self
    }

    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    pub fn into_matrix(self) -> Array2<Complex64> {
        self.matrix
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Self {
        Self {
            matrix: conjugate_transpose(&self.matrix),
            role: self.role,
        }
    }

    /// Matrix product `self · other`, keeping `self`'s role.
    pub fn product(&self, other: &Operator) -> Result<Self> {
        self.check_dim(other)?;
        Ok(Self {
            matrix: self.matrix.dot(&other.matrix),
            role: self.role,
        })
    }

    /// `self + weight · other`.
    pub fn scaled_add(&self, weight: Complex64, other: &Operator) -> Result<Self> {
        self.check_dim(other)?;
        Ok(Self {
            matrix: &self.matrix + &(&other.matrix * weight),
            role: self.role,
        })
    }

    /// `weight · self`.
    pub fn scale(&self, weight: Complex64) -> Self {
        Self {
            matrix: &self.matrix * weight,
            role: self.role,
        }
    }

    pub fn trace(&self) -> Complex64 {
        self.matrix.diag().sum()
    }

    /// Largest element of |A − A†|.
    pub fn hermiticity_error(&self) -> f64 {
        let n = self.dim();
        let mut worst = 0.0f64;
        for i in 0..n {
            for j in i..n {
                let diff = (self.matrix[[i, j]] - self.matrix[[j, i]].conj()).norm();
                worst = worst.max(diff);
            }
        }
        worst
    }

    /// Hermitian within `tol`, relative to the largest element when that
    /// exceeds one.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.hermiticity_error() <= tol * self.max_abs().max(1.0)
    }

    /// Largest element of |U·U† − I|.
    pub fn unitarity_error(&self) -> f64 {
        let product = self.matrix.dot(&conjugate_transpose(&self.matrix));
        let mut worst = 0.0f64;
        for ((i, j), z) in product.indexed_iter() {
            let target = if i == j { 1.0 } else { 0.0 };
            worst = worst.max((z - Complex64::new(target, 0.0)).norm());
        }
        worst
    }

    /// Largest element magnitude.
    pub fn max_abs(&self) -> f64 {
        self.matrix.iter().fold(0.0f64, |m, z| m.max(z.norm()))
    }

    /// Largest element of |self − other|.
    pub fn max_abs_diff(&self, other: &Operator) -> Result<f64> {
        self.check_dim(other)?;
        Ok(self
            .matrix
            .iter()
            .zip(other.matrix.iter())
            .fold(0.0f64, |m, (a, b)| m.max((a - b).norm())))
    }

    fn check_dim(&self, other: &Operator) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(Error::Dimension {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }
}

/// Sum of weighted operators, Σ w_k · O_k, tagged with `role`.
pub fn weighted_sum(terms: &[(Complex64, &Operator)], role: OperatorRole) -> Result<Operator> {
    let dim = match terms.first() {
        Some((_, op)) => op.dim(),
        None => return Err(Error::Dimension { expected: 1, actual: 0 }),
    };
    let mut acc = Operator::zeros(dim, role);
    for (w, op) in terms {
        acc = acc.scaled_add(*w, op)?;
    }
    Ok(acc)
}

/// `U · σ · U†`, tagged with `sigma`'s role.
pub fn sandwich(u: &Operator, sigma: &Operator) -> Result<Operator> {
    u.check_dim(sigma)?;
    let u_dag = conjugate_transpose(&u.matrix);
    Ok(Operator {
        matrix: u.matrix.dot(&sigma.matrix).dot(&u_dag),
        role: sigma.role,
    })
}

/// Expectation value `Tr(O† · σ)`.
///
/// Computed element-wise as Σ conj(O_ij) σ_ij without forming the product.
pub fn expectation(sigma: &Operator, observable: &Operator) -> Result<Complex64> {
    observable.check_dim(sigma)?;
    Ok(observable
        .matrix
        .iter()
        .zip(sigma.matrix.iter())
        .map(|(o, s)| o.conj() * s)
        .sum())
}

/// Conjugate transpose (dagger) of a matrix.
pub(crate) fn conjugate_transpose(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}
