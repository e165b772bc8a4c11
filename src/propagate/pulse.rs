// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ideal instantaneous RF pulses.
//!
//! A pulse of flip angle θ about the transverse axis at phase φ
//! (0° = x, 90° = y) acting on every spin is
//!
//!   U = exp(−i·θ·(cos φ·Fx + sin φ·Fy)) = Rz(φ) · exp(−i·θ·Fx) · Rz(−φ)
//!
//! with Rz(φ) = exp(−i·φ·Fz), which is diagonal in the Zeeman basis.

use ndarray::Array2;
use num_complex::Complex64;

use super::eigh::{eigh, HermitianEigen};
use super::expm::{exp_from_eigen, hermitian_exp};
use super::check_hermitian;
use crate::error::{Error, Result};
use crate::operator::{Operator, OperatorRole, SpinOperators};
use crate::spin::SpinSystem;
use crate::units::deg_to_rad;

/// One-shot pulse propagator for `system`.
///
/// `phase_deg` selects the rotation axis in the transverse plane and
/// `flip_deg` the rotation angle, both in degrees.
pub fn rotation(phase_deg: f64, flip_deg: f64, system: &SpinSystem) -> Result<Operator> {
    check_angles(phase_deg, flip_deg)?;
    let ops = SpinOperators::new(system);
    let phi = deg_to_rad(phase_deg);
    let generator = ops
        .fx()
        .scale(Complex64::new(phi.cos(), 0.0))
        .scaled_add(Complex64::new(phi.sin(), 0.0), &ops.fy())?;
    check_hermitian(&generator, "pulse generator")?;
    let u = hermitian_exp(generator.matrix(), deg_to_rad(flip_deg))?;
    Ok(Operator::from_parts(u, OperatorRole::Propagator))
}

/// Pulse propagators for one system with Fx diagonalised once.
///
/// Shaped pulses need one rotation per waveform sample; this keeps each of
/// them at two diagonal scalings and one matrix product.
#[derive(Debug, Clone)]
pub struct PulseGenerator {
    fx_eigen: HermitianEigen,
    fz_diag: Vec<f64>,
}

impl PulseGenerator {
    pub fn new(system: &SpinSystem) -> Result<Self> {
        let ops = SpinOperators::new(system);
        let fx_eigen = eigh(ops.fx().matrix())?;
        let fz_diag = ops.fz().matrix().diag().iter().map(|z| z.re).collect();
        Ok(Self { fx_eigen, fz_diag })
    }

    pub fn dim(&self) -> usize {
        self.fz_diag.len()
    }

    /// Propagator of a pulse with the given phase and flip angle (degrees).
    pub fn rotation(&self, phase_deg: f64, flip_deg: f64) -> Result<Operator> {
        check_angles(phase_deg, flip_deg)?;
        let ux = exp_from_eigen(&self.fx_eigen, deg_to_rad(flip_deg));
        if phase_deg == 0.0 {
            return Ok(Operator::from_parts(ux, OperatorRole::Propagator));
        }

        // (Rz(φ)·Ux·Rz(−φ))_jk = e^{−iφ m_j} · Ux_jk · e^{+iφ m_k}
        let phi = deg_to_rad(phase_deg);
        let rz: Vec<Complex64> = self
            .fz_diag
            .iter()
            .map(|&m| Complex64::from_polar(1.0, -phi * m))
            .collect();
        let n = self.dim();
        let u = Array2::from_shape_fn((n, n), |(j, k)| rz[j] * ux[[j, k]] * rz[k].conj());
        Ok(Operator::from_parts(u, OperatorRole::Propagator))
    }

    /// Hard pulse about x.
    pub fn x(&self, flip_deg: f64) -> Result<Operator> {
        self.rotation(0.0, flip_deg)
    }

    /// Hard pulse about y.
    pub fn y(&self, flip_deg: f64) -> Result<Operator> {
        self.rotation(90.0, flip_deg)
    }
}

fn check_angles(phase_deg: f64, flip_deg: f64) -> Result<()> {
    if !phase_deg.is_finite() || !flip_deg.is_finite() {
        return Err(Error::Numerical(format!(
            "pulse angles must be finite (phase {phase_deg}, flip {flip_deg})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{expectation, sandwich, SpinOperators};
    use crate::test_utils::{assert_operator_close, coupled_pair, single_spin};
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_flip_is_identity() {
        let sys = coupled_pair(10.0, -20.0, 4.0);
        for phase in [0.0, 45.0, 90.0, 217.0] {
            let u = rotation(phase, 0.0, &sys).unwrap();
            assert_operator_close(&u, &Operator::identity(4, OperatorRole::Propagator), 1e-14);
        }
    }

    #[test]
    fn test_full_turn_leaves_observables_unchanged() {
        // exp(−i·2π·Fx) is ±1 per spin-½, so U·σ·U† = σ
        let sys = single_spin(0.0);
        let ops = SpinOperators::new(&sys);
        let sigma = ops.ix(0).scaled_add(Complex64::new(0.3, 0.0), &ops.iz(0)).unwrap();
        for phase in [0.0, 30.0, 90.0] {
            let u = rotation(phase, 360.0, &sys).unwrap();
            assert!(u.unitarity_error() < 1e-13);
            let out = sandwich(&u, &sigma).unwrap();
            assert_operator_close(&out, &sigma, 1e-13);
        }
    }

    #[test]
    fn test_y_pulse_takes_z_to_x() {
        let sys = single_spin(0.0);
        let ops = SpinOperators::new(&sys);
        let u = rotation(90.0, 90.0, &sys).unwrap();
        let out = sandwich(&u, &ops.iz(0)).unwrap();
        assert_operator_close(&out, &ops.ix(0), 1e-14);
    }

    #[test]
    fn test_x_pulse_takes_z_to_minus_y() {
        let sys = single_spin(0.0);
        let ops = SpinOperators::new(&sys);
        let u = rotation(0.0, 90.0, &sys).unwrap();
        let out = sandwich(&u, &ops.iz(0)).unwrap();
        assert_operator_close(&out, &ops.iy(0).scale(Complex64::new(-1.0, 0.0)), 1e-14);
    }

    #[test]
    fn test_inversion_pulse() {
        let sys = coupled_pair(0.0, 0.0, 0.0);
        let ops = SpinOperators::new(&sys);
        let u = rotation(90.0, 180.0, &sys).unwrap();
        let out = sandwich(&u, &ops.fz()).unwrap();
        assert_operator_close(&out, &ops.fz().scale(Complex64::new(-1.0, 0.0)), 1e-13);
    }

    #[test]
    fn test_generator_matches_one_shot_rotation() {
        let sys = coupled_pair(100.0, -40.0, 7.0);
        let gen = PulseGenerator::new(&sys).unwrap();
        for (phase, flip) in [(0.0, 3.7), (90.0, 180.0), (33.0, 72.5), (270.0, 90.0)] {
            let fast = gen.rotation(phase, flip).unwrap();
            let slow = rotation(phase, flip, &sys).unwrap();
            assert_operator_close(&fast, &slow, 1e-12);
        }
    }

    #[test]
    fn test_generator_pulses_are_unitary() {
        let sys = coupled_pair(0.0, 0.0, 0.0);
        let gen = PulseGenerator::new(&sys).unwrap();
        assert!(gen.x(0.57).unwrap().unitarity_error() < 1e-13);
        assert!(gen.y(180.0).unwrap().unitarity_error() < 1e-13);
    }

    #[test]
    fn test_small_angle_rotation_tips_magnetisation() {
        let sys = single_spin(0.0);
        let ops = SpinOperators::new(&sys);
        let gen = PulseGenerator::new(&sys).unwrap();
        let out = sandwich(&gen.x(10.0).unwrap(), &ops.iz(0)).unwrap();
        let z = expectation(&out, &ops.iz(0)).unwrap().re / 0.5;
        assert_relative_eq!(z, deg_to_rad(10.0).cos(), epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_angle_rejected() {
        let sys = single_spin(0.0);
        assert!(matches!(rotation(0.0, f64::INFINITY, &sys), Err(Error::Numerical(_))));
    }
}
