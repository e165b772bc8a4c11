// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Free-induction-decay acquisition.
//!
//! Sample k is Tr(D† · σ(k·dwell)) with σ advanced by one dwell-time
//! propagator between samples. Sample 0 is taken before any evolution.

use num_complex::Complex64;
use tracing::debug;

use crate::error::{Error, Result};
use crate::operator::{expectation, Operator};
use crate::propagate::{evolve, FreeEvolution};

/// A detected time-domain signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<Complex64>,
    dwell_time: f64,
}

impl Signal {
    pub fn new(samples: Vec<Complex64>, dwell_time: f64) -> Self {
        Self {
            samples,
            dwell_time,
        }
    }

    pub fn samples(&self) -> &[Complex64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Complex64> {
        self.samples
    }

    /// Sampling interval in seconds.
    pub fn dwell_time(&self) -> f64 {
        self.dwell_time
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn real(&self) -> Vec<f64> {
        self.samples.iter().map(|z| z.re).collect()
    }

    pub fn imag(&self) -> Vec<f64> {
        self.samples.iter().map(|z| z.im).collect()
    }

    /// Acquisition time of each sample, starting at zero.
    pub fn times(&self) -> Vec<f64> {
        (0..self.samples.len())
            .map(|k| k as f64 * self.dwell_time)
            .collect()
    }
}

/// Acquire `points` samples of `detect_op` while σ evolves under `h`.
///
/// # Errors
/// `Numerical` if `h` is not Hermitian or `dwell_time` is not a finite
/// positive time; `Dimension` if the operators disagree in size.
pub fn detect(
    sigma: &Operator,
    detect_op: &Operator,
    h: &Operator,
    dwell_time: f64,
    points: usize,
) -> Result<Signal> {
    detect_with(&FreeEvolution::new(h)?, sigma, detect_op, dwell_time, points)
}

/// [`detect`] with a Hamiltonian that is already diagonalised.
pub fn detect_with(
    free: &FreeEvolution,
    sigma: &Operator,
    detect_op: &Operator,
    dwell_time: f64,
    points: usize,
) -> Result<Signal> {
    if !dwell_time.is_finite() || dwell_time <= 0.0 {
        return Err(Error::Numerical(format!(
            "dwell time must be a positive finite time, got {dwell_time}"
        )));
    }
    if free.dim() != sigma.dim() {
        return Err(Error::Dimension {
            expected: free.dim(),
            actual: sigma.dim(),
        });
    }

    let u = free.propagator(dwell_time)?;
    let mut samples = Vec::with_capacity(points);
    let mut sigma = sigma.clone();
    for k in 0..points {
        samples.push(expectation(&sigma, detect_op)?);
        if k + 1 < points {
            sigma = evolve(&sigma, &u)?;
        }
    }

    debug!(points, dwell_time, "Acquired FID");
    Ok(Signal::new(samples, dwell_time))
}
