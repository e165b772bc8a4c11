// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Frequency-domain view of a detected signal.

use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::detect::Signal;
use crate::error::{Error, Result};

/// FFT of a signal, reordered so zero frequency sits in the middle.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Bin frequencies in Hz, ascending.
    pub frequencies: Vec<f64>,
    pub values: Vec<Complex64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.values.iter().map(|z| z.norm()).collect()
    }

    /// Frequency of the largest-magnitude bin.
    pub fn peak_frequency(&self) -> Option<f64> {
        self.values
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
            .map(|(i, _)| self.frequencies[i])
    }
}

/// Unnormalised forward FFT of `signal`.
///
/// With N points and dwell Δt the bins are k/(N·Δt) Hz for
/// k = −⌊N/2⌋ … ⌈N/2⌉−1. A component e^{+i·2πνt} peaks at +ν.
pub fn spectrum(signal: &Signal) -> Result<Spectrum> {
    let n = signal.len();
    if n == 0 {
        return Err(Error::Numerical("cannot transform an empty signal".into()));
    }

    let mut buffer = signal.samples().to_vec();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let half = n / 2;
    let resolution = 1.0 / (n as f64 * signal.dwell_time());
    let mut frequencies = Vec::with_capacity(n);
    let mut values = Vec::with_capacity(n);
    for j in 0..n {
        frequencies.push((j as f64 - half as f64) * resolution);
        values.push(buffer[(j + n - half) % n]);
    }
    Ok(Spectrum {
        frequencies,
        values,
    })
}

/// Frequency in Hz of the strongest spectral component of `signal`.
pub fn peak_frequency(signal: &Signal) -> Result<f64> {
    spectrum(signal)?
        .peak_frequency()
        .ok_or_else(|| Error::Numerical("spectrum has no bins".into()))
}
