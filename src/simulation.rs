// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end simulation of the editing sequence.
//!
//! [`Simulation`] ties the pieces together: load the waveform and spin
//! system, apply the transmitter offset, validate, build σ_eq, Ho and F−,
//! compile the sequence, run it and acquire the FID.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::Config;
use crate::detect::{detect_with, Signal};
use crate::error::Result;
use crate::operator::{detection_operator, sigma_eq, SpinOperators};
use crate::output::SignalSink;
use crate::sequence::{SequenceDriver, SequenceProgram, SequenceTiming};
use crate::spin::{parse, SpinSystem};
use crate::validation::{validate_acquisition, validate_spin_system, validate_waveform};
use crate::waveform::Waveform;

/// A configured simulation.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: Config,
}

impl Simulation {
    /// Wrap a configuration after validating it.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured inputs and simulate with every shift moved by
    /// `offset_hz`.
    pub fn run(&self, offset_hz: f64) -> Result<Signal> {
        let waveform = Waveform::load(&self.config.input.waveform)?;
        let system = parse::load(&self.config.input.spin_system)?;
        self.run_with(&system, waveform, offset_hz)
    }

    /// Simulate with inputs already in memory.
    pub fn run_with(&self, system: &SpinSystem, waveform: Waveform, offset_hz: f64) -> Result<Signal> {
        let started = Instant::now();
        let limits = &self.config.limits;
        let seq = &self.config.sequence;
        let acq = &self.config.acquisition;

        let system = system.offset_shift(offset_hz);
        info!(
            system = system.name(),
            spins = system.len(),
            dim = system.dimension(),
            offset_hz,
            "Spin system ready"
        );
        validate_spin_system(&system, limits)?;
        validate_waveform(&waveform, limits)?;
        validate_acquisition(acq.dwell_time, acq.points, limits)?;
        if waveform.is_empty() {
            warn!("Editing waveform has no samples; editing pulses will be skipped");
        }

        let timing = SequenceTiming::new(
            seq.echo_time,
            seq.excitation_delay,
            seq.pulse_dwell,
            waveform.len(),
        );
        let delays = timing.delays()?;
        info!(
            samples = waveform.len(),
            pulse_duration = timing.pulse_duration(),
            t_2g1 = delays.to_first_edit,
            t_g13 = delays.first_edit_to_refocus,
            t_3g2 = delays.to_second_edit,
            t_g2r = delays.to_acquisition,
            "Sequence timing"
        );
        let program = SequenceProgram::editing(&timing, Arc::new(waveform), seq.angle_factor)?;

        let ops = SpinOperators::new(&system);
        let h = ops.hamiltonian(&system);
        let driver = SequenceDriver::new(&system, &h)?;
        let sigma = driver.run(&program, sigma_eq(&system))?;
        let signal = detect_with(
            driver.free_evolution(),
            &sigma,
            &detection_operator(&system),
            acq.dwell_time,
            acq.points,
        )?;

        info!(
            points = signal.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Simulation complete"
        );
        Ok(signal)
    }

    /// Run and hand the signal to `sink` under the configured label.
    ///
    /// Nothing reaches the sink unless the whole run succeeds.
    pub fn run_to_sink(&self, offset_hz: f64, sink: &mut dyn SignalSink) -> Result<Signal> {
        let signal = self.run(offset_hz)?;
        sink.write(&self.config.output.label, &signal)?;
        Ok(signal)
    }
}
