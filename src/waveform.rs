// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shaped-pulse waveform loading.
//!
//! A waveform file is a flat stream of little-endian IEEE-754 single
//! precision samples with no header. The sample count is the byte length
//! divided by four and is the authoritative length of every pulse train
//! driven by the waveform.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Width in bytes of one stored sample.
pub const SAMPLE_WIDTH: usize = std::mem::size_of::<f32>();

/// An ordered, immutable sequence of RF amplitude samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
}

impl Waveform {
    /// Build a waveform from in-memory samples.
    ///
    /// An empty sample list is allowed here and yields a pulse train that
    /// does nothing; loaded sources must be non-empty.
    pub fn from_samples(samples: Vec<f64>) -> Result<Self> {
        if let Some(idx) = samples.iter().position(|s| !s.is_finite()) {
            return Err(Error::Format(format!("sample {idx} is not finite")));
        }
        Ok(Self { samples })
    }

    /// Decode a raw byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::Format("waveform source is empty".into()));
        }
        if bytes.len() % SAMPLE_WIDTH != 0 {
            return Err(Error::Format(format!(
                "waveform length {} bytes is not a multiple of {}",
                bytes.len(),
                SAMPLE_WIDTH
            )));
        }

        let samples = bytes
            .chunks_exact(SAMPLE_WIDTH)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) as f64)
            .collect();
        Self::from_samples(samples)
    }

    /// Read every byte from `reader` and decode it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Load a waveform file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let waveform = Self::from_reader(file)?;
        debug!(
            path = %path.display(),
            samples = waveform.len(),
            "Loaded waveform"
        );
        Ok(waveform)
    }

    /// Encode samples in the on-disk layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.samples
            .iter()
            .flat_map(|&s| (s as f32).to_le_bytes())
            .collect()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Duration of a pulse train playing every sample for `dwell` seconds.
    pub fn duration(&self, dwell: f64) -> f64 {
        self.samples.len() as f64 * dwell
    }
}
