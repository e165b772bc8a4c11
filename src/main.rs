// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Spin-sim command line
//!
//! Runs the editing-sequence simulation and writes the FID to a JSON file.
//!
//! # Usage
//!
//! ```bash
//! # Simulate with the transmitter 12 Hz off resonance
//! spin-sim fid_on.json 12
//!
//! # Custom configuration and more logging
//! spin-sim fid_off.json -8 --config edit.yaml --log-level debug
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spin_sim::{config::Config, output::JsonSink, Result, Simulation, VERSION};

/// Spin-dynamics simulator for J-difference editing
#[derive(Parser)]
#[command(name = "spin-sim")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Simulate an editing pulse sequence and write the detected FID")]
struct Cli {
    /// Output file for the signal
    output: PathBuf,

    /// Frequency offset added to every chemical shift, in Hz
    #[arg(allow_negative_numbers = true)]
    offset: i64,

    /// Path to configuration file
    #[arg(short, long, env = "SPINSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!(error = %e, "Simulation failed");
        eprintln!("spin-sim: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    let simulation = Simulation::new(config)?;
    info!(
        version = VERSION,
        output = %cli.output.display(),
        offset_hz = cli.offset,
        "Starting simulation"
    );

    let mut sink = JsonSink::new(&cli.output).pretty(simulation.config().output.pretty);
    simulation.run_to_sink(cli.offset as f64, &mut sink)?;
    Ok(())
}

/// Initialize logging with tracing.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
