// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Propagators, pulse rotations and density-matrix evolution.
//!
//! All exponentials go through an eigendecomposition of a Hermitian
//! generator:
//!
//! - [`eigh`]: Hermitian eigendecomposition
//! - [`hermitian_exp`]: exp(−i·φ·H) from the eigenpairs
//! - [`prop`] / [`FreeEvolution`]: exp(−i·2π·H·t) for H in Hz, t in s
//! - [`rotation`] / [`PulseGenerator`]: ideal hard pulses about a transverse axis
//! - [`evolve`]: σ → U·σ·U†

pub mod eigh;
pub mod evolve;
pub mod expm;
pub mod pulse;

pub use eigh::{eigh, HermitianEigen};
pub use evolve::evolve;
pub use expm::{exp_from_eigen, hermitian_exp};
pub use pulse::{rotation, PulseGenerator};

use crate::error::{Error, Result};
use crate::operator::{Operator, OperatorRole};
use crate::units::evolution_phase;

/// Largest tolerated element of |H − H†|, relative to the largest element
/// of H when that exceeds one.
pub const HERMITIAN_TOL: f64 = 1e-9;

/// Free-evolution propagator exp(−i·2π·H·t).
///
/// # Errors
/// `Numerical` if `h` is not Hermitian, `t` is not finite, or the
/// eigendecomposition fails.
pub fn prop(h: &Operator, t: f64) -> Result<Operator> {
    FreeEvolution::new(h)?.propagator(t)
}

/// A Hamiltonian diagonalised once, producing propagators for any duration.
#[derive(Debug, Clone)]
pub struct FreeEvolution {
    eigen: HermitianEigen,
}

impl FreeEvolution {
    pub fn new(h: &Operator) -> Result<Self> {
        check_hermitian(h, "Hamiltonian")?;
        Ok(Self {
            eigen: eigh(h.matrix())?,
        })
    }

    /// Propagator for `t` seconds. `t == 0` gives the exact identity.
    pub fn propagator(&self, t: f64) -> Result<Operator> {
        if !t.is_finite() {
            return Err(Error::Numerical(format!("evolution time {t} is not finite")));
        }
        let dim = self.eigen.values.len();
        if t == 0.0 {
            return Ok(Operator::identity(dim, OperatorRole::Propagator));
        }
        Ok(Operator::from_parts(
            exp_from_eigen(&self.eigen, evolution_phase(t)),
            OperatorRole::Propagator,
        ))
    }

    /// Eigenvalues of the Hamiltonian in Hz, ascending.
    pub fn energies(&self) -> &[f64] {
        &self.eigen.values
    }

    pub fn dim(&self) -> usize {
        self.eigen.values.len()
    }
}

pub(crate) fn check_hermitian(op: &Operator, what: &str) -> Result<()> {
    if !op.is_hermitian(HERMITIAN_TOL) {
        return Err(Error::Numerical(format!(
            "{what} is not Hermitian (max |A - A†| = {:.3e})",
            op.hermiticity_error()
        )));
    }
    Ok(())
}
