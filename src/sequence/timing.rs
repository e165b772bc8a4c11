// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Delay arithmetic for the double-echo editing sequence.
//!
//! The first echo has length TE1 = 2·t12: the 90° excitation, t12, then the
//! first 180°. The second echo fills the rest of the echo time TE. The
//! editing pulses, each of duration P = samples·dwell, sit at the same
//! offset after their preceding 180° pulse:
//!
//! ```text
//! 90y  t12  180y  t_2g1  [edit P]  t_g13  180y  t_3g2  [edit P]  t_g2r  acq
//!
//! t_2g1 = (t12 + TE/2)/2 − t12 − P/2
//! t_g13 = TE/2 − t_2g1 − P
//! t_3g2 = (TE/2 − t12)/2 − P/2
//! t_g2r = (TE/2 − t12) − t_3g2 − P
//! ```

use tracing::debug;

use crate::error::{Result, ValidationError};

/// Named timing constants of one sequence run, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceTiming {
    pub echo_time: f64,
    pub excitation_delay: f64,
    pub pulse_dwell: f64,
    /// Number of waveform samples in each editing pulse.
    pub pulse_samples: usize,
}

/// Derived free-evolution delays, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceDelays {
    /// 90° → first 180°.
    pub excitation: f64,
    /// First 180° → first editing pulse.
    pub to_first_edit: f64,
    /// First editing pulse → second 180°.
    pub first_edit_to_refocus: f64,
    /// Second 180° → second editing pulse.
    pub to_second_edit: f64,
    /// Second editing pulse → acquisition.
    pub to_acquisition: f64,
}

impl SequenceTiming {
    pub fn new(echo_time: f64, excitation_delay: f64, pulse_dwell: f64, pulse_samples: usize) -> Self {
        Self {
            echo_time,
            excitation_delay,
            pulse_dwell,
            pulse_samples,
        }
    }

    /// Duration of one editing pulse.
    pub fn pulse_duration(&self) -> f64 {
        self.pulse_samples as f64 * self.pulse_dwell
    }

    /// Derive every fixed delay of the sequence.
    ///
    /// # Errors
    /// `PhysicsConstraint` if an input is non-finite or negative, or if the
    /// editing pulses do not fit in their half-echoes so that a derived
    /// delay would be negative.
    pub fn delays(&self) -> Result<SequenceDelays> {
        for (name, value) in [
            ("echo_time", self.echo_time),
            ("excitation_delay", self.excitation_delay),
            ("pulse_dwell", self.pulse_dwell),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::PhysicsConstraint(format!(
                    "{name} must be a finite non-negative time, got {value}"
                ))
                .into());
            }
        }

        let te_half = self.echo_time / 2.0;
        let t12 = self.excitation_delay;
        let pulse = self.pulse_duration();

        let to_first_edit = (t12 + te_half) / 2.0 - t12 - pulse / 2.0;
        let first_edit_to_refocus = te_half - to_first_edit - pulse;
        let to_second_edit = (te_half - t12) / 2.0 - pulse / 2.0;
        let to_acquisition = (te_half - t12) - to_second_edit - pulse;

        let delays = SequenceDelays {
            excitation: t12,
            to_first_edit,
            first_edit_to_refocus,
            to_second_edit,
            to_acquisition,
        };
        for (name, value) in delays.named() {
            if value < 0.0 {
                return Err(ValidationError::PhysicsConstraint(format!(
                    "delay {name} is negative ({value:.6e} s); editing pulse of {pulse:.6e} s \
                     does not fit echo time {} s with excitation delay {t12} s",
                    self.echo_time
                ))
                .into());
            }
        }

        debug!(
            t12 = delays.excitation,
            t_2g1 = delays.to_first_edit,
            t_g13 = delays.first_edit_to_refocus,
            t_3g2 = delays.to_second_edit,
            t_g2r = delays.to_acquisition,
            "Derived sequence delays"
        );
        Ok(delays)
    }
}

impl SequenceDelays {
    /// Delays in sequence order with their names.
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("excitation", self.excitation),
            ("to_first_edit", self.to_first_edit),
            ("first_edit_to_refocus", self.first_edit_to_refocus),
            ("to_second_edit", self.to_second_edit),
            ("to_acquisition", self.to_acquisition),
        ]
    }

    /// Sum of the free-evolution delays.
    pub fn total(&self) -> f64 {
        self.named().iter().map(|(_, v)| v).sum()
    }
}
