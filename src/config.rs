// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulation configuration.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. spin-sim.yaml file (or the file given with `--config`)
//! 3. Environment variables (SPINSIM_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Files tried, in order, when no config path is given.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["spin-sim.yaml", "spin-sim.yml"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sequence timing
    #[serde(default)]
    pub sequence: SequenceConfig,

    /// Acquisition settings
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Input files
    #[serde(default)]
    pub input: InputConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Resource limits
    #[serde(default)]
    pub limits: ResourceLimits,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// An explicit `config_path` must exist. Without one, the default file
    /// names are tried in the working directory and built-in defaults are
    /// used when none is present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            config = Self::from_file(path)?;
        } else {
            for path in &DEFAULT_CONFIG_FILES {
                let path = Path::new(path);
                if path.exists() {
                    config = Self::from_file(path)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `SPINSIM_*` overrides resolved through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("SPINSIM_WAVEFORM") {
            self.input.waveform = PathBuf::from(val);
        }
        if let Some(val) = lookup("SPINSIM_SPIN_SYSTEM") {
            self.input.spin_system = PathBuf::from(val);
        }
        if let Some(val) = lookup("SPINSIM_ANGLE_FACTOR") {
            if let Ok(factor) = val.parse() {
                self.sequence.angle_factor = factor;
            }
        }
        if let Some(val) = lookup("SPINSIM_ECHO_TIME") {
            if let Ok(te) = val.parse() {
                self.sequence.echo_time = te;
            }
        }
        if let Some(val) = lookup("SPINSIM_POINTS") {
            if let Ok(points) = val.parse() {
                self.acquisition.points = points;
            }
        }
        if let Some(val) = lookup("SPINSIM_DWELL_TIME") {
            if let Ok(dwell) = val.parse() {
                self.acquisition.dwell_time = dwell;
            }
        }
        if let Some(val) = lookup("SPINSIM_OUTPUT_LABEL") {
            self.output.label = val;
        }
        if let Some(val) = lookup("SPINSIM_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("SPINSIM_LOG_FORMAT") {
            self.logging.format = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        let seq = &self.sequence;
        positive_time("sequence.echo_time", seq.echo_time)?;
        positive_time("sequence.pulse_dwell", seq.pulse_dwell)?;
        if !seq.excitation_delay.is_finite() || seq.excitation_delay < 0.0 {
            return Err(Error::Config(format!(
                "sequence.excitation_delay must be non-negative, got {}",
                seq.excitation_delay
            )));
        }
        if !seq.angle_factor.is_finite() {
            return Err(Error::Config(format!(
                "sequence.angle_factor must be finite, got {}",
                seq.angle_factor
            )));
        }

        positive_time("acquisition.dwell_time", self.acquisition.dwell_time)?;
        if self.acquisition.points == 0 {
            return Err(Error::Config("acquisition.points cannot be 0".into()));
        }

        if self.output.label.trim().is_empty() {
            return Err(Error::Config("output.label cannot be empty".into()));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(Error::Config(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                self.logging.format
            )));
        }

        let l = &self.limits;
        if l.max_spins == 0 || l.max_hilbert_dim == 0 || l.max_points == 0 || l.max_waveform_samples == 0 {
            return Err(Error::Config("resource limits must be positive".into()));
        }
        if self.acquisition.points > l.max_points {
            tracing::warn!(
                points = self.acquisition.points,
                limit = l.max_points,
                "Acquisition points exceed limits.max_points; the run will be rejected"
            );
        }
        Ok(())
    }
}

fn positive_time(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Config(format!("{name} must be positive, got {value}")));
    }
    Ok(())
}

/// Pulse-sequence timing, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Echo time TE
    #[serde(default = "default_echo_time")]
    pub echo_time: f64,

    /// Delay between excitation and the first refocusing pulse
    #[serde(default = "default_excitation_delay")]
    pub excitation_delay: f64,

    /// Duration of one editing-pulse waveform sample
    #[serde(default = "default_pulse_dwell")]
    pub pulse_dwell: f64,

    /// Scale from waveform amplitude to flip angle in radians
    #[serde(default = "default_angle_factor")]
    pub angle_factor: f64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            echo_time: default_echo_time(),
            excitation_delay: default_excitation_delay(),
            pulse_dwell: default_pulse_dwell(),
            angle_factor: default_angle_factor(),
        }
    }
}

fn default_echo_time() -> f64 {
    0.068
}

fn default_excitation_delay() -> f64 {
    0.006
}

fn default_pulse_dwell() -> f64 {
    32e-6
}

fn default_angle_factor() -> f64 {
    1.0
}

/// FID acquisition settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Sampling interval in seconds
    #[serde(default = "default_dwell_time")]
    pub dwell_time: f64,

    /// Number of complex points
    #[serde(default = "default_points")]
    pub points: usize,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            dwell_time: default_dwell_time(),
            points: default_points(),
        }
    }
}

fn default_dwell_time() -> f64 {
    0.0002
}

fn default_points() -> usize {
    2048
}

/// Input file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Editing-pulse waveform (raw little-endian f32 samples)
    #[serde(default = "default_waveform")]
    pub waveform: PathBuf,

    /// Spin-system parameter file
    #[serde(default = "default_spin_system")]
    pub spin_system: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            waveform: default_waveform(),
            spin_system: default_spin_system(),
        }
    }
}

fn default_waveform() -> PathBuf {
    PathBuf::from("gaba_gauss_gamma.wav")
}

fn default_spin_system() -> PathBuf {
    PathBuf::from("gaba_gauss_on1.sys")
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Name the signal is stored under
    #[serde(default = "default_label")]
    pub label: String,

    /// Indent the JSON output
    #[serde(default)]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            pretty: false,
        }
    }
}

fn default_label() -> String {
    "test_fid".into()
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Resource limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Maximum number of spins
    #[serde(default = "default_max_spins")]
    pub max_spins: usize,

    /// Maximum Hilbert space dimension
    #[serde(default = "default_max_hilbert_dim")]
    pub max_hilbert_dim: usize,

    /// Maximum acquisition points
    #[serde(default = "default_max_points")]
    pub max_points: usize,

    /// Maximum samples in an editing waveform
    #[serde(default = "default_max_waveform_samples")]
    pub max_waveform_samples: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_spins: default_max_spins(),
            max_hilbert_dim: default_max_hilbert_dim(),
            max_points: default_max_points(),
            max_waveform_samples: default_max_waveform_samples(),
        }
    }
}

fn default_max_spins() -> usize {
    10
}

fn default_max_hilbert_dim() -> usize {
    1024
}

fn default_max_points() -> usize {
    1_048_576
}

fn default_max_waveform_samples() -> usize {
    100_000
}
