// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Angular-momentum operators and the standard system operators built from
//! them.
//!
//! Single-spin matrices use the Zeeman basis ordered m = I, I−1, …, −I.
//! A spin's operator is embedded into the full space as
//! 1 ⊗ … ⊗ O_k ⊗ … ⊗ 1, with spin 0 as the most significant factor.

use ndarray::{linalg::kron, Array2};
use num_complex::Complex64;

use super::types::{Operator, OperatorRole};
use crate::spin::SpinSystem;

/// Ix, Iy, Iz for one spin in its own (2I+1)-dimensional space.
#[derive(Debug, Clone)]
pub struct SingleSpinMatrices {
    pub ix: Array2<Complex64>,
    pub iy: Array2<Complex64>,
    pub iz: Array2<Complex64>,
}

impl SingleSpinMatrices {
    /// Build the matrices for spin quantum number `twice_spin / 2`.
    pub fn new(twice_spin: u32) -> Self {
        let n = twice_spin as usize + 1;
        let j = twice_spin as f64 / 2.0;

        let mut iz = Array2::zeros((n, n));
        let mut iplus = Array2::<Complex64>::zeros((n, n));
        for k in 0..n {
            let m = j - k as f64;
            iz[[k, k]] = Complex64::new(m, 0.0);
            if k > 0 {
                // ⟨m+1| I+ |m⟩ = sqrt(j(j+1) − m(m+1))
                iplus[[k - 1, k]] = Complex64::new((j * (j + 1.0) - m * (m + 1.0)).sqrt(), 0.0);
            }
        }
        let iminus = iplus.t().to_owned();

        let half = Complex64::new(0.5, 0.0);
        let minus_half_i = Complex64::new(0.0, -0.5);
        let ix = (&iplus + &iminus) * half;
        let iy = (&iplus - &iminus) * minus_half_i;

        Self { ix, iy, iz }
    }
}

/// Embedded Ix, Iy, Iz for every spin of a system.
///
/// Built once and reused for every composite operator.
#[derive(Debug, Clone)]
pub struct SpinOperators {
    dim: usize,
    ix: Vec<Array2<Complex64>>,
    iy: Vec<Array2<Complex64>>,
    iz: Vec<Array2<Complex64>>,
}

impl SpinOperators {
    pub fn new(system: &SpinSystem) -> Self {
        let mults: Vec<usize> = system
            .spins()
            .iter()
            .map(|s| s.isotope.multiplicity())
            .collect();

        let mut ix = Vec::with_capacity(mults.len());
        let mut iy = Vec::with_capacity(mults.len());
        let mut iz = Vec::with_capacity(mults.len());
        for (k, spin) in system.spins().iter().enumerate() {
            let local = SingleSpinMatrices::new(spin.isotope.twice_spin());
            let left: usize = mults[..k].iter().product();
            let right: usize = mults[k + 1..].iter().product();
            ix.push(embed(&local.ix, left, right));
            iy.push(embed(&local.iy, left, right));
            iz.push(embed(&local.iz, left, right));
        }

        Self {
            dim: system.dimension(),
            ix,
            iy,
            iz,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_spins(&self) -> usize {
        self.iz.len()
    }

    pub fn ix(&self, spin: usize) -> Operator {
        angular(self.ix[spin].clone())
    }

    pub fn iy(&self, spin: usize) -> Operator {
        angular(self.iy[spin].clone())
    }

    pub fn iz(&self, spin: usize) -> Operator {
        angular(self.iz[spin].clone())
    }

    /// Raising operator Ix + i·Iy of one spin.
    pub fn iplus(&self, spin: usize) -> Operator {
        angular(&self.ix[spin] + &(&self.iy[spin] * Complex64::i()))
    }

    /// Lowering operator Ix − i·Iy of one spin.
    pub fn iminus(&self, spin: usize) -> Operator {
        angular(&self.ix[spin] - &(&self.iy[spin] * Complex64::i()))
    }

    /// Fx = Σ Ix_k.
    pub fn fx(&self) -> Operator {
        angular(self.total(&self.ix))
    }

    /// Fy = Σ Iy_k.
    pub fn fy(&self) -> Operator {
        angular(self.total(&self.iy))
    }

    /// Fz = Σ Iz_k.
    pub fn fz(&self) -> Operator {
        angular(self.total(&self.iz))
    }

    /// F− = Σ (Ix_k − i·Iy_k).
    pub fn fminus(&self) -> Operator {
        let fx = self.total(&self.ix);
        let fy = self.total(&self.iy);
        angular(&fx - &(&fy * Complex64::i()))
    }

    /// F+ = Σ (Ix_k + i·Iy_k).
    pub fn fplus(&self) -> Operator {
        let fx = self.total(&self.ix);
        let fy = self.total(&self.iy);
        angular(&fx + &(&fy * Complex64::i()))
    }

    /// Free-evolution Hamiltonian in Hz:
    /// Σ_i ν_i Iz_i + Σ_{i<j} J_ij (Ix_i Ix_j + Iy_i Iy_j + Iz_i Iz_j).
    pub fn hamiltonian(&self, system: &SpinSystem) -> Operator {
        let mut h = Array2::<Complex64>::zeros((self.dim, self.dim));
        for (i, spin) in system.spins().iter().enumerate() {
            h.scaled_add(Complex64::new(spin.shift_hz, 0.0), &self.iz[i]);
        }

        let n = self.num_spins();
        for i in 0..n {
            for j in (i + 1)..n {
                let j_hz = system.coupling(i, j);
                if j_hz == 0.0 {
                    continue;
                }
                let scalar = self.ix[i].dot(&self.ix[j])
                    + self.iy[i].dot(&self.iy[j])
                    + self.iz[i].dot(&self.iz[j]);
                h.scaled_add(Complex64::new(j_hz, 0.0), &scalar);
            }
        }

        Operator::from_parts(h, OperatorRole::Hamiltonian)
    }

    fn total(&self, ops: &[Array2<Complex64>]) -> Array2<Complex64> {
        let mut acc = Array2::<Complex64>::zeros((self.dim, self.dim));
        for op in ops {
            acc += op;
        }
        acc
    }
}

/// High-temperature equilibrium deviation density matrix, σ_eq = Fz.
///
/// The identity part is dropped and no Boltzmann factor is applied, so
/// σ_eq is traceless and Tr(σ_eq · Fz) counts one unit per spin-½.
pub fn sigma_eq(system: &SpinSystem) -> Operator {
    SpinOperators::new(system)
        .fz()
        .with_role(OperatorRole::Density)
}

/// Free-evolution Hamiltonian of the system, in Hz.
pub fn hamiltonian(system: &SpinSystem) -> Operator {
    SpinOperators::new(system).hamiltonian(system)
}

/// Receiver detection operator F− = Σ (Ix − i·Iy).
pub fn detection_operator(system: &SpinSystem) -> Operator {
    SpinOperators::new(system)
        .fminus()
        .with_role(OperatorRole::Detection)
}

fn angular(m: Array2<Complex64>) -> Operator {
    Operator::from_parts(m, OperatorRole::AngularMomentum)
}

fn embed(local: &Array2<Complex64>, left: usize, right: usize) -> Array2<Complex64> {
    let one = Complex64::new(1.0, 0.0);
    let eye_left = Array2::from_diag_elem(left, one);
    let eye_right = Array2::from_diag_elem(right, one);
    kron(&kron(&eye_left, local), &eye_right)
}
