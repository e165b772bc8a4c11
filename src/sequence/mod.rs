// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pulse-sequence timing, compilation and execution.
//!
//! - [`SequenceTiming`] derives the fixed delays from echo time, excitation
//!   delay and editing-pulse length
//! - [`SequenceProgram`] is the ordered list of [`Step`]s
//! - [`SequenceDriver`] threads a density matrix through a program

pub mod driver;
pub mod program;
pub mod timing;

pub use driver::{PropagatorCache, SequenceDriver};
pub use program::{SequenceProgram, Step, PHASE_X, PHASE_Y};
pub use timing::{SequenceDelays, SequenceTiming};
