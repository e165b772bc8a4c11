// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Destinations for finished signals.
//!
//! A sink receives one complete [`Signal`] under a label. Callers only hand
//! a signal over once the whole simulation has succeeded.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::detect::Signal;
use crate::error::Result;

/// Something that stores a labelled signal.
pub trait SignalSink {
    fn write(&mut self, label: &str, signal: &Signal) -> Result<()>;
}

/// On-disk layout written by [`JsonSink`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub label: String,
    pub dwell_time: f64,
    pub points: usize,
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

impl SignalRecord {
    pub fn from_signal(label: &str, signal: &Signal) -> Self {
        Self {
            label: label.to_string(),
            dwell_time: signal.dwell_time(),
            points: signal.len(),
            real: signal.real(),
            imag: signal.imag(),
        }
    }
}

/// Writes each signal as a JSON document to a file.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
    pretty: bool,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back a file written by this sink.
    pub fn read(path: &Path) -> Result<SignalRecord> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}

impl SignalSink for JsonSink {
    fn write(&mut self, label: &str, signal: &Signal) -> Result<()> {
        let record = SignalRecord::from_signal(label, signal);
        let mut writer = BufWriter::new(File::create(&self.path)?);
        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, &record)?;
        } else {
            serde_json::to_writer(&mut writer, &record)?;
        }
        writer.flush()?;
        info!(
            path = %self.path.display(),
            label,
            points = record.points,
            "Wrote signal"
        );
        Ok(())
    }
}

/// Keeps signals in memory, in write order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    signals: Vec<(String, Signal)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> &[(String, Signal)] {
        &self.signals
    }

    /// Most recent signal stored under `label`.
    pub fn get(&self, label: &str) -> Option<&Signal> {
        self.signals
            .iter()
            .rev()
            .find(|(l, _)| l == label)
            .map(|(_, s)| s)
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl SignalSink for MemorySink {
    fn write(&mut self, label: &str, signal: &Signal) -> Result<()> {
        self.signals.push((label.to_string(), signal.clone()));
        Ok(())
    }
}
