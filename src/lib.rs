// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Spin-dynamics simulator for J-difference editing sequences.
//!
//! This crate simulates a coupled nuclear spin system through a double-echo
//! pulse sequence with shaped editing pulses and returns the detected
//! free-induction decay.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Simulation (config, CLI)          │
//! ├──────────────────┬──────────────────────┤
//! │ Sequence driver  │  Detector → Sink     │
//! ├──────────────────┴──────────────────────┤
//! │   Propagators · Pulses · Evolution       │
//! ├────────────────┬────────────────────────┤
//! │ Operator       │  Spin system /         │
//! │ algebra        │  waveform loaders      │
//! └────────────────┴────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`waveform`]: Shaped-pulse waveform loader
//! - [`spin`]: Spin-system model and parameter-file reader
//! - [`operator`]: Operators, σ_eq, Hamiltonian and detection operator
//! - [`propagate`]: Propagators, pulse rotations and evolution
//! - [`sequence`]: Sequence timing, programs and driver
//! - [`detect`]: FID acquisition
//! - [`spectrum`]: FFT of a detected signal
//! - [`output`]: Signal sinks
//! - [`simulation`]: End-to-end facade
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod config;
pub mod detect;
pub mod error;
pub mod operator;
pub mod output;
pub mod propagate;
pub mod sequence;
pub mod simulation;
pub mod spectrum;
pub mod spin;
pub mod units;
pub mod validation;
pub mod waveform;

pub use config::Config;
pub use detect::{detect, Signal};
pub use error::{Error, Result};
pub use operator::{Operator, OperatorRole};
pub use propagate::{evolve, prop, rotation};
pub use simulation::Simulation;
pub use spin::SpinSystem;
pub use waveform::Waveform;

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
