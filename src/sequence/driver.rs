// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Executes a [`SequenceProgram`] against a density matrix.
//!
//! Every free-evolution propagator the program needs depends only on the
//! Hamiltonian and a fixed duration, so they are built up front and in
//! parallel. The steps themselves run strictly in order.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info};

use super::program::{SequenceProgram, Step};
use crate::error::{Error, Result};
use crate::operator::Operator;
use crate::propagate::{evolve, FreeEvolution, PulseGenerator};
use crate::spin::SpinSystem;
use crate::units::sample_flip_angle;

/// Free-evolution propagators keyed by duration.
#[derive(Debug, Clone, Default)]
pub struct PropagatorCache {
    by_duration: HashMap<u64, Operator>,
}

impl PropagatorCache {
    /// Propagator for `duration`, which must have been precomputed.
    pub fn get(&self, duration: f64) -> Result<&Operator> {
        self.by_duration.get(&duration.to_bits()).ok_or_else(|| {
            Error::Numerical(format!("no propagator prepared for {duration:.6e} s"))
        })
    }

    pub fn len(&self) -> usize {
        self.by_duration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_duration.is_empty()
    }
}

/// Runs sequence programs for one spin system and Hamiltonian.
#[derive(Debug, Clone)]
pub struct SequenceDriver {
    free: FreeEvolution,
    pulses: PulseGenerator,
}

impl SequenceDriver {
    /// Diagonalise `hamiltonian` and Fx of `system` once for every program
    /// this driver runs.
    pub fn new(system: &SpinSystem, hamiltonian: &Operator) -> Result<Self> {
        let free = FreeEvolution::new(hamiltonian)?;
        let pulses = PulseGenerator::new(system)?;
        if free.dim() != pulses.dim() {
            return Err(Error::Dimension {
                expected: pulses.dim(),
                actual: free.dim(),
            });
        }
        Ok(Self { free, pulses })
    }

    pub fn free_evolution(&self) -> &FreeEvolution {
        &self.free
    }

    /// Build every free-evolution propagator `program` uses.
    pub fn prepare(&self, program: &SequenceProgram) -> Result<PropagatorCache> {
        let times = program.evolution_times();
        let built: Result<Vec<(u64, Operator)>> = times
            .par_iter()
            .map(|&t| Ok((t.to_bits(), self.free.propagator(t)?)))
            .collect();
        let cache = PropagatorCache {
            by_duration: built?.into_iter().collect(),
        };
        debug!(propagators = cache.len(), "Prepared delay propagators");
        Ok(cache)
    }

    /// Run `program` from `sigma`, returning the final density matrix.
    pub fn run(&self, program: &SequenceProgram, sigma: Operator) -> Result<Operator> {
        if sigma.dim() != self.free.dim() {
            return Err(Error::Dimension {
                expected: self.free.dim(),
                actual: sigma.dim(),
            });
        }
        let cache = self.prepare(program)?;
        info!(
            steps = program.len(),
            duration = program.duration(),
            dim = sigma.dim(),
            "Running pulse sequence"
        );

        let mut sigma = sigma;
        for (index, step) in program.steps().iter().enumerate() {
            debug!(index, step = %step, "Sequence step");
            sigma = self.apply(step, &sigma, &cache)?;
        }
        Ok(sigma)
    }

    /// Apply one step to `sigma`.
    pub fn apply(&self, step: &Step, sigma: &Operator, cache: &PropagatorCache) -> Result<Operator> {
        match step {
            Step::Pulse { phase_deg, flip_deg } => {
                evolve(sigma, &self.pulses.rotation(*phase_deg, *flip_deg)?)
            }
            Step::Delay { duration, .. } => evolve(sigma, cache.get(*duration)?),
            Step::PulseTrain {
                phase_deg,
                dwell,
                angle_factor,
                waveform,
            } => {
                let mut sigma = sigma.clone();
                if waveform.is_empty() {
                    return Ok(sigma);
                }
                let free = cache.get(*dwell)?;
                for &amplitude in waveform.samples() {
                    let flip = sample_flip_angle(amplitude, *angle_factor);
                    sigma = evolve(&sigma, &self.pulses.rotation(*phase_deg, flip)?)?;
                    sigma = evolve(&sigma, free)?;
                }
                Ok(sigma)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::{expectation, hamiltonian, sigma_eq, OperatorRole, SpinOperators};
    use crate::propagate::{prop, rotation};
    use crate::sequence::program::{PHASE_X, PHASE_Y};
    use crate::sequence::timing::SequenceTiming;
    use crate::test_utils::{assert_operator_close, coupled_pair, single_spin};
    use crate::waveform::Waveform;
    use approx::assert_relative_eq;
    use num_complex::Complex64;
    use std::sync::Arc;

    fn driver_for(system: &SpinSystem) -> SequenceDriver {
        SequenceDriver::new(system, &hamiltonian(system)).unwrap()
    }

    #[test]
    fn test_empty_pulse_train_leaves_sigma_unchanged() {
        let sys = coupled_pair(30.0, -70.0, 7.0);
        let driver = driver_for(&sys);
        let program = SequenceProgram::new()
            .pulse(PHASE_Y, 90.0)
            .pulse_train(Arc::new(Waveform::from_samples(vec![]).unwrap()), 32e-6, 1.0);
        let cache = driver.prepare(&program).unwrap();
        assert!(cache.is_empty());

        let before = driver
            .apply(&program.steps()[0], &sigma_eq(&sys), &cache)
            .unwrap();
        let after = driver.apply(&program.steps()[1], &before, &cache).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_run_matches_hand_composed_steps() {
        let sys = coupled_pair(-120.0, 45.0, 7.4);
        let h = hamiltonian(&sys);
        let driver = driver_for(&sys);
        let program = SequenceProgram::new()
            .pulse(PHASE_Y, 90.0)
            .delay("a", 0.003)
            .pulse(PHASE_Y, 180.0)
            .delay("b", 0.003);
        let got = driver.run(&program, sigma_eq(&sys)).unwrap();

        let mut expected = sigma_eq(&sys);
        expected = evolve(&expected, &rotation(90.0, 90.0, &sys).unwrap()).unwrap();
        expected = evolve(&expected, &prop(&h, 0.003).unwrap()).unwrap();
        expected = evolve(&expected, &rotation(90.0, 180.0, &sys).unwrap()).unwrap();
        expected = evolve(&expected, &prop(&h, 0.003).unwrap()).unwrap();
        assert_operator_close(&got, &expected, 1e-12);
    }

    #[test]
    fn test_pulse_train_accumulates_flip_angle() {
        // On resonance with no coupling, N samples of amplitude a rotate by N·a rad.
        let sys = single_spin(0.0);
        let driver = driver_for(&sys);
        let n = 16;
        let amplitude = std::f64::consts::FRAC_PI_2 / n as f64;
        let wf = Arc::new(Waveform::from_samples(vec![amplitude; n]).unwrap());
        let program = SequenceProgram::new().pulse_train(wf, 32e-6, 1.0);
        let out = driver.run(&program, sigma_eq(&sys)).unwrap();

        // 90° about x: Iz → −Iy
        let ops = SpinOperators::new(&sys);
        let expected = ops.iy(0).scale(Complex64::new(-1.0, 0.0));
        assert_operator_close(&out, &expected, 1e-12);
    }

    #[test]
    fn test_angle_factor_scales_train() {
        let sys = single_spin(0.0);
        let driver = driver_for(&sys);
        let wf = Arc::new(Waveform::from_samples(vec![0.1; 5]).unwrap());
        let doubled = SequenceProgram::new().pulse_train(Arc::clone(&wf), 1e-5, 2.0);
        let twice = SequenceProgram::new()
            .pulse_train(Arc::clone(&wf), 1e-5, 1.0)
            .pulse_train(wf, 1e-5, 1.0);
        let a = driver.run(&doubled, sigma_eq(&sys)).unwrap();
        let b = driver.run(&twice, sigma_eq(&sys)).unwrap();
        assert_operator_close(&a, &b, 1e-12);
    }

    #[test]
    fn test_editing_sequence_preserves_trace_and_hermiticity() {
        let sys = coupled_pair(-60.0, 85.0, 7.0);
        let driver = driver_for(&sys);
        let wf = Arc::new(Waveform::from_samples(vec![0.02; 50]).unwrap());
        let timing = SequenceTiming::new(0.068, 0.006, 32e-6, 0);
        let program = SequenceProgram::editing(&timing, wf, 1.0).unwrap();

        let sigma0 = sigma_eq(&sys);
        let norm0 = expectation(&sigma0, &sigma0).unwrap().re;
        let out = driver.run(&program, sigma0).unwrap();
        assert_eq!(out.role(), OperatorRole::Density);
        assert!(out.trace().norm() < 1e-10);
        assert!(out.is_hermitian(1e-10));
        assert_relative_eq!(expectation(&out, &out).unwrap().re, norm0, epsilon = 1e-9);
    }

    #[test]
    fn test_run_is_deterministic() {
        let sys = coupled_pair(10.0, 20.0, 5.0);
        let driver = driver_for(&sys);
        let wf = Arc::new(Waveform::from_samples(vec![0.05, 0.1, 0.05]).unwrap());
        let program = SequenceProgram::editing(&SequenceTiming::new(0.068, 0.006, 32e-6, 0), wf, 1.0)
            .unwrap();
        let a = driver.run(&program, sigma_eq(&sys)).unwrap();
        let b = driver.run(&program, sigma_eq(&sys)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let sys = single_spin(0.0);
        let driver = driver_for(&sys);
        let program = SequenceProgram::new().pulse(PHASE_X, 90.0);
        let sigma = sigma_eq(&coupled_pair(0.0, 0.0, 0.0));
        assert!(matches!(
            driver.run(&program, sigma),
            Err(Error::Dimension { expected: 2, actual: 4 })
        ));
    }

    #[test]
    fn test_missing_propagator_is_an_error() {
        let sys = single_spin(0.0);
        let driver = driver_for(&sys);
        let step = Step::Delay {
            label: "x",
            duration: 0.001,
        };
        let err = driver
            .apply(&step, &sigma_eq(&sys), &PropagatorCache::default())
            .unwrap_err();
        assert!(matches!(err, Error::Numerical(_)));
    }
}
