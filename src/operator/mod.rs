// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operator algebra on the spin system's Hilbert space.
//!
//! - [`Operator`]: square complex matrix tagged with an [`OperatorRole`]
//! - [`sandwich`] / [`expectation`]: U·σ·U† and Tr(O†·σ)
//! - [`SpinOperators`]: embedded single-spin Ix, Iy, Iz and their totals
//! - [`sigma_eq`], [`hamiltonian`], [`detection_operator`]: the three
//!   operators every simulation starts from

pub mod spin_ops;
pub mod types;

pub use spin_ops::{detection_operator, hamiltonian, sigma_eq, SingleSpinMatrices, SpinOperators};
pub use types::{expectation, sandwich, weighted_sum, Operator, OperatorRole};
