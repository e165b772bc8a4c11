// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for simulation runs.

use crate::config::ResourceLimits;
use crate::error::{Result, ValidationError};
use crate::spin::SpinSystem;
use crate::waveform::Waveform;

/// Validate a spin system against the size limits.
pub fn validate_spin_system(system: &SpinSystem, limits: &ResourceLimits) -> Result<()> {
    if system.is_empty() {
        return Err(ValidationError::Field {
            field: "spin_system".into(),
            message: "must contain at least one spin".into(),
        }
        .into());
    }

    if system.len() > limits.max_spins {
        return Err(ValidationError::ResourceLimit {
            resource: "spins".into(),
            limit: limits.max_spins as u64,
            requested: system.len() as u64,
        }
        .into());
    }

    let dim = system.dimension();
    if dim > limits.max_hilbert_dim {
        return Err(ValidationError::ResourceLimit {
            resource: "hilbert_dim".into(),
            limit: limits.max_hilbert_dim as u64,
            requested: dim as u64,
        }
        .into());
    }

    Ok(())
}

/// Validate acquisition parameters.
pub fn validate_acquisition(dwell_time: f64, points: usize, limits: &ResourceLimits) -> Result<()> {
    if !dwell_time.is_finite() || dwell_time <= 0.0 {
        return Err(ValidationError::Field {
            field: "dwell_time".into(),
            message: format!("must be a positive time, got {}", dwell_time),
        }
        .into());
    }

    if points == 0 {
        return Err(ValidationError::Field {
            field: "points".into(),
            message: "must be greater than 0".into(),
        }
        .into());
    }

    if points > limits.max_points {
        return Err(ValidationError::ResourceLimit {
            resource: "points".into(),
            limit: limits.max_points as u64,
            requested: points as u64,
        }
        .into());
    }

    Ok(())
}

/// Validate an editing waveform.
pub fn validate_waveform(waveform: &Waveform, limits: &ResourceLimits) -> Result<()> {
    if waveform.len() > limits.max_waveform_samples {
        return Err(ValidationError::ResourceLimit {
            resource: "waveform_samples".into(),
            limit: limits.max_waveform_samples as u64,
            requested: waveform.len() as u64,
        }
        .into());
    }

    Ok(())
}
