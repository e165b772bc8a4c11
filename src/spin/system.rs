// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Coupled spin-system model.

use std::fmt;

use ndarray::Array2;

use super::isotope::Isotope;
use crate::error::{Error, Result};

/// One spin of the system.
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    /// Nucleus type.
    pub isotope: Isotope,
    /// Chemical shift as an offset from the transmitter, in Hz.
    pub shift_hz: f64,
}

/// An ordered set of spins with chemical shifts and scalar couplings.
///
/// The coupling matrix is symmetric with a zero diagonal. Spin order fixes
/// the tensor-product layout of every operator built from the system.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSystem {
    name: String,
    spins: Vec<Spin>,
    couplings: Array2<f64>,
    spectrometer_mhz: Option<f64>,
}

impl SpinSystem {
    /// Create a spin system, checking the coupling matrix invariants.
    pub fn new(name: impl Into<String>, spins: Vec<Spin>, couplings: Array2<f64>) -> Result<Self> {
        let n = spins.len();
        if n == 0 {
            return Err(Error::Format("spin system has no spins".into()));
        }
        if couplings.nrows() != n || couplings.ncols() != n {
            return Err(Error::Dimension {
                expected: n,
                actual: couplings.nrows().max(couplings.ncols()),
            });
        }
        for (i, spin) in spins.iter().enumerate() {
            if !spin.shift_hz.is_finite() {
                return Err(Error::Format(format!("shift of spin {i} is not finite")));
            }
        }
        for i in 0..n {
            if couplings[[i, i]] != 0.0 {
                return Err(Error::Format(format!("spin {i} is coupled to itself")));
            }
            for j in (i + 1)..n {
                let (a, b) = (couplings[[i, j]], couplings[[j, i]]);
                if !a.is_finite() || !b.is_finite() {
                    return Err(Error::Format(format!("J({i},{j}) is not finite")));
                }
                if a != b {
                    return Err(Error::Format(format!(
                        "coupling matrix is not symmetric: J({i},{j})={a}, J({j},{i})={b}"
                    )));
                }
            }
        }

        Ok(Self {
            name: name.into(),
            spins,
            couplings,
            spectrometer_mhz: None,
        })
    }

    /// Uncoupled spin-½ protons at the given shifts.
    pub fn protons(name: impl Into<String>, shifts_hz: &[f64]) -> Result<Self> {
        let spins = shifts_hz
            .iter()
            .map(|&shift_hz| Spin {
                isotope: Isotope::H1,
                shift_hz,
            })
            .collect::<Vec<_>>();
        let n = spins.len();
        Self::new(name, spins, Array2::zeros((n, n)))
    }

    /// Attach the 1H spectrometer frequency the shifts were referenced to.
    pub fn with_spectrometer_mhz(mut self, mhz: f64) -> Self {
        self.spectrometer_mhz = Some(mhz);
        self
    }

    /// Set a symmetric coupling constant in Hz.
    pub fn set_coupling(&mut self, i: usize, j: usize, j_hz: f64) -> Result<()> {
        let n = self.spins.len();
        if i >= n || j >= n {
            return Err(Error::Dimension {
                expected: n,
                actual: i.max(j) + 1,
            });
        }
        if i == j {
            return Err(Error::Format(format!("spin {i} cannot couple to itself")));
        }
        if !j_hz.is_finite() {
            return Err(Error::Format(format!("J({i},{j}) is not finite")));
        }
        self.couplings[[i, j]] = j_hz;
        self.couplings[[j, i]] = j_hz;
        Ok(())
    }

    /// Copy of the system with every chemical shift moved by `delta_hz`.
    ///
    /// Emulates moving the transmitter by `-delta_hz`.
    pub fn offset_shift(&self, delta_hz: f64) -> Self {
        let mut shifted = self.clone();
        for spin in &mut shifted.spins {
            spin.shift_hz += delta_hz;
        }
        shifted
    }

    /// Hilbert-space dimension, the product of the spin multiplicities.
    pub fn dimension(&self) -> usize {
        self.spins.iter().map(|s| s.isotope.multiplicity()).product()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    pub fn len(&self) -> usize {
        self.spins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    pub fn couplings(&self) -> &Array2<f64> {
        &self.couplings
    }

    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        self.couplings[[i, j]]
    }

    pub fn spectrometer_mhz(&self) -> Option<f64> {
        self.spectrometer_mhz
    }
}

impl fmt::Display for SpinSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Spin system '{}' ({} spins)", self.name, self.spins.len())?;
        for (i, spin) in self.spins.iter().enumerate() {
            writeln!(f, "  {:>3} {:<4} {:>12.4} Hz", i, spin.isotope, spin.shift_hz)?;
        }
        let n = self.spins.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let j_hz = self.couplings[[i, j]];
                if j_hz != 0.0 {
                    writeln!(f, "  J({},{}) = {:.4} Hz", i, j, j_hz)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimension_spin_half() {
        let sys = SpinSystem::protons("abc", &[0.0, 10.0, 20.0]).unwrap();
        assert_eq!(sys.dimension(), 8);
        assert_eq!(sys.len(), 3);
    }

    #[test]
    fn test_dimension_mixed_spins() {
        let spins = vec![
            Spin {
                isotope: Isotope::H1,
                shift_hz: 0.0,
            },
            Spin {
                isotope: Isotope::H2,
                shift_hz: 0.0,
            },
        ];
        let sys = SpinSystem::new("hd", spins, Array2::zeros((2, 2))).unwrap();
        assert_eq!(sys.dimension(), 6);
    }

    #[test]
    fn test_offset_shift_moves_every_spin() {
        let sys = SpinSystem::protons("ab", &[-100.0, 250.0]).unwrap();
        let shifted = sys.offset_shift(30.0);
        assert_relative_eq!(shifted.spins()[0].shift_hz, -70.0);
        assert_relative_eq!(shifted.spins()[1].shift_hz, 280.0);
        // the source system is untouched
        assert_relative_eq!(sys.spins()[0].shift_hz, -100.0);
    }

    #[test]
    fn test_offset_shift_keeps_couplings() {
        let mut sys = SpinSystem::protons("ab", &[0.0, 50.0]).unwrap();
        sys.set_coupling(0, 1, 7.3).unwrap();
        let shifted = sys.offset_shift(-12.0);
        assert_eq!(shifted.couplings(), sys.couplings());
    }

    #[test]
    fn test_set_coupling_symmetric() {
        let mut sys = SpinSystem::protons("ab", &[0.0, 50.0]).unwrap();
        sys.set_coupling(1, 0, 7.0).unwrap();
        assert_eq!(sys.coupling(0, 1), 7.0);
        assert_eq!(sys.coupling(1, 0), 7.0);
    }

    #[test]
    fn test_self_coupling_rejected() {
        let mut sys = SpinSystem::protons("a", &[0.0]).unwrap();
        assert!(sys.set_coupling(0, 0, 1.0).is_err());
    }

    #[test]
    fn test_asymmetric_couplings_rejected() {
        let mut j = Array2::zeros((2, 2));
        j[[0, 1]] = 5.0;
        j[[1, 0]] = 4.0;
        let spins = vec![
            Spin {
                isotope: Isotope::H1,
                shift_hz: 0.0,
            };
            2
        ];
        assert!(SpinSystem::new("x", spins, j).is_err());
    }

    #[test]
    fn test_empty_system_rejected() {
        assert!(SpinSystem::protons("none", &[]).is_err());
    }

    #[test]
    fn test_display_lists_couplings() {
        let mut sys = SpinSystem::protons("ab", &[0.0, 50.0]).unwrap();
        sys.set_coupling(0, 1, 7.0).unwrap();
        let text = sys.to_string();
        assert!(text.contains("'ab'"));
        assert!(text.contains("J(0,1) = 7.0000 Hz"));
    }
}
