// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Compiled pulse-sequence programs.
//!
//! A [`SequenceProgram`] is an ordered list of [`Step`]s built once from the
//! sequence timing and the editing waveform. The driver executes it
//! verbatim; nothing downstream reorders or merges steps.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::timing::{SequenceDelays, SequenceTiming};
use crate::error::Result;
use crate::waveform::Waveform;

/// Phase of a pulse about x, in degrees.
pub const PHASE_X: f64 = 0.0;
/// Phase of a pulse about y, in degrees.
pub const PHASE_Y: f64 = 90.0;

/// One instruction of a sequence program.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Instantaneous hard pulse.
    Pulse { phase_deg: f64, flip_deg: f64 },
    /// Free evolution under the system Hamiltonian.
    Delay { label: &'static str, duration: f64 },
    /// Amplitude-modulated pulse train: for each waveform sample a rotation
    /// of `amplitude · angle_factor` radians about `phase_deg`, followed by
    /// `dwell` seconds of free evolution.
    PulseTrain {
        phase_deg: f64,
        dwell: f64,
        angle_factor: f64,
        waveform: Arc<Waveform>,
    },
}

impl Step {
    /// Time the step occupies, in seconds.
    pub fn duration(&self) -> f64 {
        match self {
            Step::Pulse { .. } => 0.0,
            Step::Delay { duration, .. } => *duration,
            Step::PulseTrain { dwell, waveform, .. } => waveform.duration(*dwell),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Pulse { phase_deg, flip_deg } => {
                write!(f, "pulse {flip_deg}° phase {phase_deg}°")
            }
            Step::Delay { label, duration } => write!(f, "delay {label} {duration:.6e} s"),
            Step::PulseTrain {
                phase_deg,
                dwell,
                waveform,
                ..
            } => write!(
                f,
                "pulse train phase {phase_deg}° ({} samples, dwell {dwell:.3e} s)",
                waveform.len()
            ),
        }
    }
}

/// An ordered, immutable list of sequence steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceProgram {
    steps: Vec<Step>,
}

impl SequenceProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hard pulse.
    pub fn pulse(mut self, phase_deg: f64, flip_deg: f64) -> Self {
        self.steps.push(Step::Pulse { phase_deg, flip_deg });
        self
    }

    /// Append a free-evolution delay.
    pub fn delay(mut self, label: &'static str, duration: f64) -> Self {
        self.steps.push(Step::Delay { label, duration });
        self
    }

    /// Append a waveform-driven pulse train about x.
    pub fn pulse_train(mut self, waveform: Arc<Waveform>, dwell: f64, angle_factor: f64) -> Self {
        self.steps.push(Step::PulseTrain {
            phase_deg: PHASE_X,
            dwell,
            angle_factor,
            waveform,
        });
        self
    }

    /// Double-echo editing sequence:
    ///
    /// 90y, t12, 180y, t_2g1, edit, t_g13, 180y, t_3g2, edit, t_g2r.
    ///
    /// Both editing pulse trains share `waveform`, whose sample count fixes
    /// the pulse duration used in the delay arithmetic.
    pub fn editing(timing: &SequenceTiming, waveform: Arc<Waveform>, angle_factor: f64) -> Result<Self> {
        let timing = SequenceTiming {
            pulse_samples: waveform.len(),
            ..*timing
        };
        let SequenceDelays {
            excitation,
            to_first_edit,
            first_edit_to_refocus,
            to_second_edit,
            to_acquisition,
        } = timing.delays()?;
        let dwell = timing.pulse_dwell;

        let program = Self::new()
            .pulse(PHASE_Y, 90.0)
            .delay("t_12", excitation)
            .pulse(PHASE_Y, 180.0)
            .delay("t_2g1", to_first_edit)
            .pulse_train(Arc::clone(&waveform), dwell, angle_factor)
            .delay("t_g13", first_edit_to_refocus)
            .pulse(PHASE_Y, 180.0)
            .delay("t_3g2", to_second_edit)
            .pulse_train(waveform, dwell, angle_factor)
            .delay("t_g2r", to_acquisition);

        debug!(
            steps = program.len(),
            duration = program.duration(),
            "Compiled editing sequence"
        );
        Ok(program)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Total time from the first step to the end of the last.
    pub fn duration(&self) -> f64 {
        self.steps.iter().map(Step::duration).sum()
    }

    /// Distinct free-evolution durations the program needs propagators for,
    /// in first-use order. Pulse-train dwells are included only when the
    /// train has samples.
    pub fn evolution_times(&self) -> Vec<f64> {
        let mut times: Vec<f64> = Vec::new();
        for step in &self.steps {
            let t = match step {
                Step::Pulse { .. } => continue,
                Step::Delay { duration, .. } => *duration,
                Step::PulseTrain { dwell, waveform, .. } => {
                    if waveform.is_empty() {
                        continue;
                    }
                    *dwell
                }
            };
            if !times.iter().any(|&seen| seen.to_bits() == t.to_bits()) {
                times.push(t);
            }
        }
        times
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn waveform(n: usize) -> Arc<Waveform> {
        Arc::new(Waveform::from_samples(vec![0.01; n]).unwrap())
    }

    fn reference_timing() -> SequenceTiming {
        SequenceTiming::new(0.068, 0.006, 32e-6, 0)
    }

    #[test]
    fn test_editing_step_order() {
        let program = SequenceProgram::editing(&reference_timing(), waveform(500), 1.0).unwrap();
        let kinds: Vec<String> = program
            .steps()
            .iter()
            .map(|s| match s {
                Step::Pulse { phase_deg, flip_deg } => format!("P{phase_deg}/{flip_deg}"),
                Step::Delay { label, .. } => label.to_string(),
                Step::PulseTrain { .. } => "train".to_string(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "P90/90", "t_12", "P90/180", "t_2g1", "train", "t_g13", "P90/180", "t_3g2",
                "train", "t_g2r"
            ]
        );
    }

    #[test]
    fn test_editing_uses_waveform_length_for_timing() {
        // pulse_samples on the input is ignored in favour of the waveform
        let mut timing = reference_timing();
        timing.pulse_samples = 12_345;
        let program = SequenceProgram::editing(&timing, waveform(500), 1.0).unwrap();
        match &program.steps()[3] {
            Step::Delay { duration, .. } => assert_relative_eq!(*duration, 0.006, epsilon = 1e-12),
            other => panic!("expected delay, got {other}"),
        }
    }

    #[test]
    fn test_editing_duration_is_echo_time() {
        let program = SequenceProgram::editing(&reference_timing(), waveform(200), 1.0).unwrap();
        assert_relative_eq!(program.duration(), 0.068, epsilon = 1e-12);
    }

    #[test]
    fn test_editing_rejects_overlong_waveform() {
        assert!(SequenceProgram::editing(&reference_timing(), waveform(2000), 1.0).is_err());
    }

    #[test]
    fn test_evolution_times_are_distinct() {
        let program = SequenceProgram::new()
            .delay("a", 0.006)
            .pulse(PHASE_X, 90.0)
            .delay("b", 0.006)
            .pulse_train(waveform(3), 32e-6, 1.0)
            .delay("c", 0.012)
            .pulse_train(waveform(0), 1e-3, 1.0);
        assert_eq!(program.evolution_times(), vec![0.006, 32e-6, 0.012]);
    }

    #[test]
    fn test_step_display() {
        let step = Step::Pulse {
            phase_deg: 90.0,
            flip_deg: 180.0,
        };
        assert_eq!(step.to_string(), "pulse 180° phase 90°");
    }
}
