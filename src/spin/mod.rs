// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Spin-system model.
//!
//! - [`Isotope`]: nucleus type, spin quantum number and gyromagnetic ratio
//! - [`SpinSystem`]: ordered spins with shifts (Hz) and J-couplings (Hz)
//! - [`parse`]: reader for line-oriented spin-system parameter files

pub mod isotope;
pub mod parse;
pub mod system;

pub use isotope::Isotope;
pub use system::{Spin, SpinSystem};
