// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Unit conventions.
//!
//! Hamiltonians are stored in Hz and times in seconds. Flip angles and pulse
//! phases are given in degrees at every public entry point. All conversions
//! to the dimensionless exponent of a propagator go through this module.

use std::f64::consts::PI;

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Phase accumulated by a Hamiltonian in Hz over `seconds`, i.e. the factor
/// multiplying H in exp(-i · 2π · H · t).
#[inline]
pub fn evolution_phase(seconds: f64) -> f64 {
    2.0 * PI * seconds
}

/// Flip angle in degrees for one waveform sample.
///
/// The sample amplitude is read as a rotation in radians, scaled by the
/// amplitude calibration factor.
#[inline]
pub fn sample_flip_angle(amplitude: f64, angle_factor: f64) -> f64 {
    rad_to_deg(amplitude * angle_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degree_radian_roundtrip() {
        assert_relative_eq!(deg_to_rad(180.0), PI, epsilon = 1e-15);
        assert_relative_eq!(rad_to_deg(PI / 2.0), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_evolution_phase_one_hz_one_second() {
        assert_relative_eq!(evolution_phase(1.0), 2.0 * PI, epsilon = 1e-15);
    }

    #[test]
    fn test_sample_flip_angle() {
        assert_relative_eq!(sample_flip_angle(PI, 1.0), 180.0, epsilon = 1e-12);
        assert_relative_eq!(sample_flip_angle(0.01, 2.0), 0.02 * 180.0 / PI, epsilon = 1e-12);
    }
}
