// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Density-matrix evolution under a propagator.

use crate::error::{Error, Result};
use crate::operator::{sandwich, Operator};

/// σ' = U · σ · U†.
///
/// The returned operator keeps σ's role. Dimension mismatches are reported
/// with σ's dimension as the expected value.
pub fn evolve(sigma: &Operator, u: &Operator) -> Result<Operator> {
    if sigma.dim() != u.dim() {
        return Err(Error::Dimension {
            expected: sigma.dim(),
            actual: u.dim(),
        });
    }
    sandwich(u, sigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{expectation, hamiltonian, sigma_eq, OperatorRole, SpinOperators};
    use crate::propagate::{prop, rotation};
    use crate::test_utils::{assert_operator_close, coupled_pair, single_spin};
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_leaves_sigma_unchanged() {
        let sys = coupled_pair(12.0, -8.0, 6.0);
        let sigma = sigma_eq(&sys);
        let out = evolve(&sigma, &prop(&hamiltonian(&sys), 0.0).unwrap()).unwrap();
        assert_eq!(out, sigma);
    }

    #[test]
    fn test_evolution_preserves_trace_and_hermiticity() {
        let sys = coupled_pair(-210.0, 140.0, 7.3);
        let mut sigma = sigma_eq(&sys);
        sigma = evolve(&sigma, &rotation(90.0, 90.0, &sys).unwrap()).unwrap();
        let u = prop(&hamiltonian(&sys), 0.0137).unwrap();
        let before = expectation(&sigma, &sigma).unwrap().re;
        for _ in 0..10 {
            sigma = evolve(&sigma, &u).unwrap();
        }
        assert_eq!(sigma.role(), OperatorRole::Density);
        assert!(sigma.trace().norm() < 1e-12);
        assert!(sigma.is_hermitian(1e-12));
        // Tr(σ²) is invariant under unitary evolution
        assert_relative_eq!(expectation(&sigma, &sigma).unwrap().re, before, epsilon = 1e-10);
    }

    #[test]
    fn test_free_precession_of_transverse_magnetisation() {
        // Ix → Ix cos(2πνt) + Iy sin(2πνt)
        let nu = 40.0;
        let t = 0.003;
        let sys = single_spin(nu);
        let ops = SpinOperators::new(&sys);
        let out = evolve(&ops.ix(0), &prop(&hamiltonian(&sys), t).unwrap()).unwrap();
        let angle = 2.0 * std::f64::consts::PI * nu * t;
        let expected = ops
            .ix(0)
            .scale(num_complex::Complex64::new(angle.cos(), 0.0))
            .scaled_add(num_complex::Complex64::new(angle.sin(), 0.0), &ops.iy(0))
            .unwrap();
        assert_operator_close(&out, &expected, 1e-13);
    }

    #[test]
    fn test_dimension_mismatch() {
        let sigma = sigma_eq(&single_spin(0.0));
        let u = Operator::identity(4, OperatorRole::Propagator);
        assert!(matches!(
            evolve(&sigma, &u),
            Err(Error::Dimension { expected: 2, actual: 4 })
        ));
    }
}
